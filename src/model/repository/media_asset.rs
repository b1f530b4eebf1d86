use std::borrow::Cow;

use chrono::Utc;
use diesel::prelude::*;
use eyre::{Context, Result};
use tracing::instrument;

use crate::model::{
    util::{bool_to_int, datetime_to_db_repr},
    CreateMediaAsset, MediaAsset, MediaAssetId, MediaAssetSpe, MediaAssetType,
};

use super::db::DbConn;
use super::db_entity::{to_db_media_asset_ty, DbInsertMediaAsset, DbMediaAsset};
use super::schema;

#[instrument(skip(conn))]
pub fn get_media_asset(conn: &mut DbConn, id: MediaAssetId) -> Result<MediaAsset> {
    use schema::MediaAsset::dsl::*;
    let db_asset: DbMediaAsset = MediaAsset
        .select(DbMediaAsset::as_select())
        .find(id.0)
        .first(conn)?;
    db_asset.try_into()
}

/// Images owned by `owner`, newest first.
#[instrument(skip(conn))]
pub fn get_images_by_owner(conn: &mut DbConn, owner: &str) -> Result<Vec<MediaAsset>> {
    use schema::MediaAsset::dsl::*;
    let db_assets: Vec<DbMediaAsset> = MediaAsset
        .filter(
            ty.eq(to_db_media_asset_ty(MediaAssetType::Image))
                .and(owner_email.eq(owner)),
        )
        .order((created_at.desc(), asset_id.desc()))
        .select(DbMediaAsset::as_select())
        .load(conn)?;
    db_assets
        .into_iter()
        .map(|a| a.try_into())
        .collect::<Result<Vec<_>>>()
}

/// All videos regardless of owner, newest first. The missing ownership
/// filter mirrors the image listing's sibling endpoint in the original
/// system and is kept as observed behavior.
#[instrument(skip(conn))]
pub fn get_all_videos(conn: &mut DbConn) -> Result<Vec<MediaAsset>> {
    use schema::MediaAsset::dsl::*;
    let db_assets: Vec<DbMediaAsset> = MediaAsset
        .filter(ty.eq(to_db_media_asset_ty(MediaAssetType::Video)))
        .order((created_at.desc(), asset_id.desc()))
        .select(DbMediaAsset::as_select())
        .load(conn)?;
    db_assets
        .into_iter()
        .map(|a| a.try_into())
        .collect::<Result<Vec<_>>>()
}

#[instrument(skip(conn))]
pub fn insert_media_asset(conn: &mut DbConn, create: &CreateMediaAsset) -> Result<MediaAsset> {
    use schema::MediaAsset;
    let now = datetime_to_db_repr(&Utc::now());
    let insert = match &create.spe {
        MediaAssetSpe::Image(image) => DbInsertMediaAsset {
            ty: to_db_media_asset_ty(create.ty()),
            title: Cow::Borrowed(create.title.as_str()),
            description: Cow::Borrowed(create.description.as_str()),
            owner_email: Cow::Borrowed(create.owner_email.as_str()),
            media_url: Cow::Borrowed(create.media_url.as_str()),
            alt_text: Some(Cow::Borrowed(image.alt_text.as_str())),
            format: Some(image.format.to_string()),
            transform_crop: Some(bool_to_int(image.transformations.crop)),
            transform_fit: Some(image.transformations.fit.to_string()),
            thumbnail_url: None,
            duration_secs: None,
            controls: None,
            transform_width: image.transformations.width,
            transform_height: image.transformations.height,
            transform_quality: image.transformations.quality,
            created_at: now,
            updated_at: now,
        },
        MediaAssetSpe::Video(video) => DbInsertMediaAsset {
            ty: to_db_media_asset_ty(create.ty()),
            title: Cow::Borrowed(create.title.as_str()),
            description: Cow::Borrowed(create.description.as_str()),
            owner_email: Cow::Borrowed(create.owner_email.as_str()),
            media_url: Cow::Borrowed(create.media_url.as_str()),
            alt_text: None,
            format: None,
            transform_crop: None,
            transform_fit: None,
            thumbnail_url: Some(Cow::Borrowed(video.thumbnail_url.as_str())),
            duration_secs: Some(video.duration),
            controls: Some(bool_to_int(video.controls)),
            transform_width: video.transformations.width,
            transform_height: video.transformations.height,
            transform_quality: video.transformations.quality,
            created_at: now,
            updated_at: now,
        },
    };
    let id: i64 = diesel::insert_into(MediaAsset::table)
        .values(insert)
        .returning(MediaAsset::asset_id)
        .get_result(conn)
        .wrap_err("error inserting into table MediaAsset")?;
    get_media_asset(conn, MediaAssetId(id))
}

/// Deletes an image only when both id and owner match, returning the
/// deleted record. `None` covers both a missing record and a record owned
/// by someone else so that callers can not probe ownership.
#[instrument(skip(conn))]
pub fn delete_image_by_owner(
    conn: &mut DbConn,
    id: MediaAssetId,
    owner: &str,
) -> Result<Option<MediaAsset>> {
    use schema::MediaAsset::dsl::*;
    let db_asset: Option<DbMediaAsset> = diesel::delete(
        MediaAsset.filter(
            asset_id
                .eq(id.0)
                .and(ty.eq(to_db_media_asset_ty(MediaAssetType::Image)))
                .and(owner_email.eq(owner)),
        ),
    )
    .returning(DbMediaAsset::as_returning())
    .get_result(conn)
    .optional()
    .wrap_err("error deleting from table MediaAsset")?;
    db_asset.map(|a| a.try_into()).transpose()
}
