use chrono::{DateTime, Utc};
use eyre::eyre;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::{
    self, clamp_quality, CropFit, ImageFormat, ImageTransformations, MediaAssetSpe,
    VideoTransformations,
};

/// Partial transformation settings as sent by clients. Merging is a shallow
/// override of the documented defaults: supplied fields win, everything
/// else stays at its default rather than becoming null.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageTransformationsPatch {
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub crop: Option<bool>,
    pub fit: Option<CropFit>,
    pub quality: Option<i32>,
}

impl ImageTransformationsPatch {
    pub fn merged_with_defaults(&self) -> ImageTransformations {
        let defaults = ImageTransformations::default();
        ImageTransformations {
            width: self.width.unwrap_or(defaults.width),
            height: self.height.unwrap_or(defaults.height),
            crop: self.crop.unwrap_or(defaults.crop),
            fit: self.fit.unwrap_or(defaults.fit),
            quality: clamp_quality(self.quality.unwrap_or(defaults.quality)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoTransformationsPatch {
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub quality: Option<i32>,
}

impl VideoTransformationsPatch {
    pub fn merged_with_defaults(&self) -> VideoTransformations {
        let defaults = VideoTransformations::default();
        VideoTransformations {
            width: self.width.unwrap_or(defaults.width),
            height: self.height.unwrap_or(defaults.height),
            quality: clamp_quality(self.quality.unwrap_or(defaults.quality)),
        }
    }
}

/// Required string fields default to empty when absent so that handlers
/// reject absent and empty the same way, with a 400.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateImageRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    pub alt: Option<String>,
    pub format: Option<ImageFormat>,
    pub transformations: Option<ImageTransformationsPatch>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateVideoRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub video_url: String,
    #[serde(default)]
    pub thumbnail_url: String,
    /// seconds, measured client-side before upload
    pub duration: Option<f64>,
    pub controls: Option<bool>,
    pub transformations: Option<VideoTransformationsPatch>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageTransformationsDto {
    pub width: i32,
    pub height: i32,
    pub crop: bool,
    pub fit: CropFit,
    pub quality: i32,
}

impl From<ImageTransformations> for ImageTransformationsDto {
    fn from(value: ImageTransformations) -> Self {
        ImageTransformationsDto {
            width: value.width,
            height: value.height,
            crop: value.crop,
            fit: value.fit,
            quality: value.quality,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoTransformationsDto {
    pub width: i32,
    pub height: i32,
    pub quality: i32,
}

impl From<VideoTransformations> for VideoTransformationsDto {
    fn from(value: VideoTransformations) -> Self {
        VideoTransformationsDto {
            width: value.width,
            height: value.height,
            quality: value.quality,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub owner_email: String,
    pub image_url: String,
    pub alt: String,
    pub format: ImageFormat,
    pub transformations: ImageTransformationsDto,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<model::MediaAsset> for Image {
    type Error = eyre::Report;

    fn try_from(value: model::MediaAsset) -> Result<Self, Self::Error> {
        let MediaAssetSpe::Image(image) = value.spe else {
            return Err(eyre!("expected an image MediaAsset"));
        };
        Ok(Image {
            id: value.base.id.0,
            title: value.base.title,
            description: value.base.description,
            owner_email: value.base.owner_email,
            image_url: value.base.media_url,
            alt: image.alt_text,
            format: image.format,
            transformations: image.transformations.into(),
            created_at: value.base.created_at,
            updated_at: value.base.updated_at,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub owner_email: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub duration: f64,
    pub controls: bool,
    pub transformations: VideoTransformationsDto,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<model::MediaAsset> for Video {
    type Error = eyre::Report;

    fn try_from(value: model::MediaAsset) -> Result<Self, Self::Error> {
        let MediaAssetSpe::Video(video) = value.spe else {
            return Err(eyre!("expected a video MediaAsset"));
        };
        Ok(Video {
            id: value.base.id.0,
            title: value.base.title,
            description: value.base.description,
            owner_email: value.base.owner_email,
            video_url: value.base.media_url,
            thumbnail_url: video.thumbnail_url,
            duration: video.duration,
            controls: video.controls,
            transformations: video.transformations.into(),
            created_at: value.base.created_at,
            updated_at: value.base.updated_at,
        })
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use crate::model::{CropFit, ImageTransformations};

    use super::{ImageTransformationsPatch, VideoTransformationsPatch};

    #[test]
    fn empty_patch_yields_documented_defaults() {
        let merged = ImageTransformationsPatch::default().merged_with_defaults();
        assert_eq!(
            merged,
            ImageTransformations {
                width: 1080,
                height: 1080,
                crop: false,
                fit: CropFit::Cover,
                quality: 80,
            }
        );
        let merged = VideoTransformationsPatch::default().merged_with_defaults();
        assert_eq!(merged.width, 1080);
        assert_eq!(merged.height, 1920);
        assert_eq!(merged.quality, 100);
    }

    #[test]
    fn quality_only_patch_keeps_remaining_defaults() {
        let merged = ImageTransformationsPatch {
            quality: Some(42),
            ..Default::default()
        }
        .merged_with_defaults();
        assert_eq!(
            merged,
            ImageTransformations {
                quality: 42,
                ..ImageTransformations::default()
            }
        );
    }

    proptest! {
        #[test]
        fn merged_quality_is_always_clamped(quality in any::<i32>()) {
            let merged = ImageTransformationsPatch {
                quality: Some(quality),
                ..Default::default()
            }
            .merged_with_defaults();
            prop_assert!((1..=100).contains(&merged.quality));
            let merged = VideoTransformationsPatch {
                quality: Some(quality),
                ..Default::default()
            }
            .merged_with_defaults();
            prop_assert!((1..=100).contains(&merged.quality));
        }

        #[test]
        fn supplied_fields_always_win(width in 1..10_000i32, crop in any::<bool>()) {
            let merged = ImageTransformationsPatch {
                width: Some(width),
                crop: Some(crop),
                ..Default::default()
            }
            .merged_with_defaults();
            prop_assert_eq!(merged.width, width);
            prop_assert_eq!(merged.crop, crop);
            prop_assert_eq!(merged.height, 1080);
        }
    }
}
