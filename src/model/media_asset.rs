use chrono::{DateTime, Utc};
use strum::{Display, EnumString};

use super::MediaAssetId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaAssetType {
    Image,
    Video,
}

/// Fields shared by both asset kinds. `owner_email` is set from the
/// session identity at creation and never changes afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaAssetBase {
    pub id: MediaAssetId,
    pub ty: MediaAssetType,
    pub title: String,
    pub description: String,
    pub owner_email: String,
    pub media_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MediaAsset {
    pub base: MediaAssetBase,
    pub spe: MediaAssetSpe,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MediaAssetSpe {
    Image(ImageSpe),
    Video(VideoSpe),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSpe {
    pub alt_text: String,
    pub format: ImageFormat,
    pub transformations: ImageTransformations,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VideoSpe {
    pub thumbnail_url: String,
    /// seconds, measured from the file before upload
    pub duration: f64,
    pub controls: bool,
    pub transformations: VideoTransformations,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, serde::Serialize, serde::Deserialize, utoipa::ToSchema,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpg,
    Png,
    #[default]
    Webp,
    Avif,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, serde::Serialize, serde::Deserialize, utoipa::ToSchema,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CropFit {
    #[default]
    Cover,
    Contain,
    Fill,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageTransformations {
    pub width: i32,
    pub height: i32,
    pub crop: bool,
    pub fit: CropFit,
    /// always in 1..=100
    pub quality: i32,
}

impl Default for ImageTransformations {
    fn default() -> Self {
        ImageTransformations {
            width: 1080,
            height: 1080,
            crop: false,
            fit: CropFit::Cover,
            quality: 80,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VideoTransformations {
    pub width: i32,
    pub height: i32,
    /// always in 1..=100
    pub quality: i32,
}

impl Default for VideoTransformations {
    fn default() -> Self {
        VideoTransformations {
            width: 1080,
            height: 1920,
            quality: 100,
        }
    }
}

pub fn clamp_quality(quality: i32) -> i32 {
    quality.clamp(1, 100)
}

/// Insert input for a MediaAsset. Id and timestamps are assigned by the
/// repository, spe decides the stored type discriminator.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateMediaAsset {
    pub title: String,
    pub description: String,
    pub owner_email: String,
    pub media_url: String,
    pub spe: MediaAssetSpe,
}

impl CreateMediaAsset {
    pub fn ty(&self) -> MediaAssetType {
        match self.spe {
            MediaAssetSpe::Image(_) => MediaAssetType::Image,
            MediaAssetSpe::Video(_) => MediaAssetType::Video,
        }
    }
}
