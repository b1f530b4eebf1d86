use std::borrow::Cow;
use std::str::FromStr;

use diesel::prelude::Insertable;
use diesel::{Queryable, Selectable};
use eyre::{eyre, Context, Result};

use crate::model::{
    util::datetime_from_db_repr, CropFit, ImageFormat, ImageSpe, ImageTransformations, MediaAsset,
    MediaAssetBase, MediaAssetId, MediaAssetSpe, MediaAssetType, VideoSpe, VideoTransformations,
};

#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = super::super::schema::MediaAsset)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DbMediaAsset {
    pub asset_id: i64,
    pub ty: i32,
    pub title: String,
    pub description: String,
    pub owner_email: String,
    pub media_url: String,
    pub alt_text: Option<String>,
    pub format: Option<String>,
    pub transform_crop: Option<i32>,
    pub transform_fit: Option<String>,
    pub thumbnail_url: Option<String>,
    pub duration_secs: Option<f64>,
    pub controls: Option<i32>,
    pub transform_width: i32,
    pub transform_height: i32,
    pub transform_quality: i32,
    pub created_at: i64,
    pub updated_at: i64,
}

impl TryFrom<DbMediaAsset> for MediaAsset {
    type Error = eyre::Report;

    fn try_from(value: DbMediaAsset) -> Result<Self, Self::Error> {
        let ty = from_db_media_asset_ty(value.ty)?;
        let spe = match ty {
            MediaAssetType::Image => {
                let format = value
                    .format
                    .as_deref()
                    .ok_or(eyre!("image MediaAsset row must have format set"))?;
                let fit = value
                    .transform_fit
                    .as_deref()
                    .ok_or(eyre!("image MediaAsset row must have transform_fit set"))?;
                MediaAssetSpe::Image(ImageSpe {
                    alt_text: value.alt_text.clone().unwrap_or_default(),
                    format: ImageFormat::from_str(format)
                        .wrap_err("invalid column format in MediaAsset row")?,
                    transformations: ImageTransformations {
                        width: value.transform_width,
                        height: value.transform_height,
                        crop: value
                            .transform_crop
                            .ok_or(eyre!("image MediaAsset row must have transform_crop set"))?
                            != 0,
                        fit: CropFit::from_str(fit)
                            .wrap_err("invalid column transform_fit in MediaAsset row")?,
                        quality: value.transform_quality,
                    },
                })
            }
            MediaAssetType::Video => MediaAssetSpe::Video(VideoSpe {
                thumbnail_url: value
                    .thumbnail_url
                    .clone()
                    .ok_or(eyre!("video MediaAsset row must have thumbnail_url set"))?,
                duration: value
                    .duration_secs
                    .ok_or(eyre!("video MediaAsset row must have duration_secs set"))?,
                controls: value
                    .controls
                    .ok_or(eyre!("video MediaAsset row must have controls set"))?
                    != 0,
                transformations: VideoTransformations {
                    width: value.transform_width,
                    height: value.transform_height,
                    quality: value.transform_quality,
                },
            }),
        };
        let base = MediaAssetBase {
            id: MediaAssetId(value.asset_id),
            ty,
            title: value.title,
            description: value.description,
            owner_email: value.owner_email,
            media_url: value.media_url,
            created_at: datetime_from_db_repr(value.created_at)?,
            updated_at: datetime_from_db_repr(value.updated_at)?,
        };
        Ok(MediaAsset { base, spe })
    }
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = super::super::schema::MediaAsset)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DbInsertMediaAsset<'a> {
    pub ty: i32,
    pub title: Cow<'a, str>,
    pub description: Cow<'a, str>,
    pub owner_email: Cow<'a, str>,
    pub media_url: Cow<'a, str>,
    pub alt_text: Option<Cow<'a, str>>,
    pub format: Option<String>,
    pub transform_crop: Option<i32>,
    pub transform_fit: Option<String>,
    pub thumbnail_url: Option<Cow<'a, str>>,
    pub duration_secs: Option<f64>,
    pub controls: Option<i32>,
    pub transform_width: i32,
    pub transform_height: i32,
    pub transform_quality: i32,
    pub created_at: i64,
    pub updated_at: i64,
}

pub fn to_db_media_asset_ty(ty: MediaAssetType) -> i32 {
    match ty {
        MediaAssetType::Image => 1,
        MediaAssetType::Video => 2,
    }
}

pub fn from_db_media_asset_ty(i: i32) -> Result<MediaAssetType> {
    match i {
        1 => Ok(MediaAssetType::Image),
        2 => Ok(MediaAssetType::Video),
        _ => Err(eyre!("Invalid column ty in MediaAsset row")),
    }
}
