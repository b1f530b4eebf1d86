use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::Instrument;
use utoipa::IntoParams;

use crate::{
    app_state::SharedState,
    auth::SessionUser,
    http_error::{ApiError, ApiResult},
    interact,
    model::{repository, CreateMediaAsset, ImageSpe, MediaAssetId, MediaAssetSpe},
};

use super::super::schema::{CreateImageRequest, Image};

pub fn router() -> Router<SharedState> {
    Router::new().route("/", get(get_images).post(post_image).delete(delete_image))
}

#[utoipa::path(
    get,
    path = "/api/image",
    responses(
        (status = 200, body = Vec<Image>),
        (status = 401, description = "No valid session"),
    ),
)]
#[tracing::instrument(skip(app_state, session))]
pub async fn get_images(
    session: SessionUser,
    State(app_state): State<SharedState>,
) -> ApiResult<Json<Vec<Image>>> {
    let conn = app_state.pool.get().in_current_span().await?;
    let owner = session.email;
    let images: Vec<Image> = interact!(conn, move |mut conn| {
        repository::media_asset::get_images_by_owner(&mut conn, &owner)
    })
    .in_current_span()
    .await??
    .into_iter()
    .map(|asset| asset.try_into())
    .collect::<eyre::Result<Vec<_>>>()?;
    Ok(Json(images))
}

#[utoipa::path(
    post,
    path = "/api/image",
    request_body = CreateImageRequest,
    responses(
        (status = 201, body = Image),
        (status = 400, description = "Missing required fields"),
        (status = 401, description = "No valid session"),
    ),
)]
#[tracing::instrument(skip(app_state, session, request))]
pub async fn post_image(
    session: SessionUser,
    State(app_state): State<SharedState>,
    Json(request): Json<CreateImageRequest>,
) -> ApiResult<(StatusCode, Json<Image>)> {
    if request.title.is_empty() || request.description.is_empty() || request.image_url.is_empty() {
        return Err(ApiError::BadRequest("Missing required fields".to_owned()));
    }
    // owner comes from the session, anything the client sent is ignored
    let create = CreateMediaAsset {
        title: request.title,
        description: request.description,
        owner_email: session.email,
        media_url: request.image_url,
        spe: MediaAssetSpe::Image(ImageSpe {
            alt_text: request.alt.unwrap_or_default(),
            format: request.format.unwrap_or_default(),
            transformations: request
                .transformations
                .unwrap_or_default()
                .merged_with_defaults(),
        }),
    };
    let conn = app_state.pool.get().in_current_span().await?;
    let created = interact!(conn, move |mut conn| {
        repository::media_asset::insert_media_asset(&mut conn, &create)
    })
    .in_current_span()
    .await??;
    Ok((StatusCode::CREATED, Json(created.try_into()?)))
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
struct DeleteImageQuery {
    id: Option<String>,
}

#[utoipa::path(
    delete,
    path = "/api/image",
    params(DeleteImageQuery),
    responses(
        (status = 200, body = Image),
        (status = 400, description = "Image ID is required"),
        (status = 401, description = "No valid session"),
        (status = 404, description = "No image with this id owned by the caller"),
    ),
)]
#[tracing::instrument(skip(app_state, session))]
pub async fn delete_image(
    session: SessionUser,
    State(app_state): State<SharedState>,
    Query(query): Query<DeleteImageQuery>,
) -> ApiResult<Json<Image>> {
    let id = query
        .id
        .ok_or_else(|| ApiError::BadRequest("Image ID is required".to_owned()))?;
    let id: i64 = id
        .parse()
        .map_err(|_| ApiError::BadRequest("Image ID is required".to_owned()))?;
    let conn = app_state.pool.get().in_current_span().await?;
    let owner = session.email;
    let deleted = interact!(conn, move |mut conn| {
        repository::media_asset::delete_image_by_owner(&mut conn, MediaAssetId(id), &owner)
    })
    .in_current_span()
    .await??;
    // missing and not-owned are indistinguishable on purpose
    let deleted = deleted.ok_or(ApiError::NotFound)?;
    Ok(Json(deleted.try_into()?))
}
