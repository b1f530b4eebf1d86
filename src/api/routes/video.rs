use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tracing::Instrument;

use crate::{
    app_state::SharedState,
    auth::SessionUser,
    http_error::{ApiError, ApiResult},
    interact,
    model::{repository, CreateMediaAsset, MediaAssetSpe, VideoSpe},
};

use super::super::schema::{CreateVideoRequest, Video};

pub fn router() -> Router<SharedState> {
    Router::new().route("/", get(get_videos).post(post_video))
}

#[utoipa::path(
    get,
    path = "/api/video",
    responses(
        (status = 200, body = Vec<Video>),
        (status = 401, description = "No valid session"),
    ),
)]
#[tracing::instrument(skip(app_state, _session))]
pub async fn get_videos(
    _session: SessionUser,
    State(app_state): State<SharedState>,
) -> ApiResult<Json<Vec<Video>>> {
    let conn = app_state.pool.get().in_current_span().await?;
    let videos: Vec<Video> = interact!(conn, move |mut conn| {
        repository::media_asset::get_all_videos(&mut conn)
    })
    .in_current_span()
    .await??
    .into_iter()
    .map(|asset| asset.try_into())
    .collect::<eyre::Result<Vec<_>>>()?;
    Ok(Json(videos))
}

#[utoipa::path(
    post,
    path = "/api/video",
    request_body = CreateVideoRequest,
    responses(
        (status = 201, body = Video),
        (status = 400, description = "Missing required fields"),
        (status = 401, description = "No valid session"),
    ),
)]
#[tracing::instrument(skip(app_state, session, request))]
pub async fn post_video(
    session: SessionUser,
    State(app_state): State<SharedState>,
    Json(request): Json<CreateVideoRequest>,
) -> ApiResult<(StatusCode, Json<Video>)> {
    if request.title.is_empty()
        || request.description.is_empty()
        || request.video_url.is_empty()
        || request.thumbnail_url.is_empty()
    {
        return Err(ApiError::BadRequest("Missing required fields".to_owned()));
    }
    let create = CreateMediaAsset {
        title: request.title,
        description: request.description,
        owner_email: session.email,
        media_url: request.video_url,
        spe: MediaAssetSpe::Video(VideoSpe {
            thumbnail_url: request.thumbnail_url,
            duration: request.duration.unwrap_or(0.0),
            controls: request.controls.unwrap_or(true),
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
