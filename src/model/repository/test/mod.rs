use crate::model::{
    CreateMediaAsset, ImageSpe, ImageTransformations, MediaAssetSpe, VideoSpe,
    VideoTransformations,
};

pub mod user;

pub fn create_image(title: &str, owner: &str) -> CreateMediaAsset {
    CreateMediaAsset {
        title: title.to_owned(),
        description: "a description".to_owned(),
        owner_email: owner.to_owned(),
        media_url: format!("https://cdn.example.com/{}.webp", title),
        spe: MediaAssetSpe::Image(ImageSpe {
            alt_text: String::new(),
            format: Default::default(),
            transformations: ImageTransformations::default(),
        }),
    }
}

pub fn create_video(title: &str, owner: &str) -> CreateMediaAsset {
    CreateMediaAsset {
        title: title.to_owned(),
        description: "a description".to_owned(),
        owner_email: owner.to_owned(),
        media_url: format!("https://cdn.example.com/{}.mp4", title),
        spe: MediaAssetSpe::Video(VideoSpe {
            thumbnail_url: format!("https://cdn.example.com/{}.mp4/ik-thumbnail.jpg", title),
            duration: 12.48,
            controls: true,
            transformations: VideoTransformations::default(),
        }),
    }
}
