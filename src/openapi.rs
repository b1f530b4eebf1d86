use utoipa::OpenApi;

use crate::api::{routes, schema};

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::image::get_images,
        routes::image::post_image,
        routes::image::delete_image,
        routes::video::get_videos,
        routes::video::post_video,
        routes::auth::register,
        routes::auth::login,
        routes::auth::imagekit_auth,
    ),
    components(schemas(
        schema::Image,
        schema::Video,
        schema::CreateImageRequest,
        schema::CreateVideoRequest,
        schema::ImageTransformationsPatch,
        schema::VideoTransformationsPatch,
        schema::ImageTransformationsDto,
        schema::VideoTransformationsDto,
        schema::RegisterRequest,
        schema::RegisterResponse,
        schema::LoginRequest,
        schema::SessionResponse,
        schema::UploadCredentials,
        crate::model::ImageFormat,
        crate::model::CropFit,
    )),
    tags((name = "mivora"))
)]
pub struct ApiDoc;
