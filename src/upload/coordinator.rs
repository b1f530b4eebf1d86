use std::sync::{Arc, Mutex};

use camino::Utf8Path as Path;
use futures::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::Body;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio_util::io::ReaderStream;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use crate::api::schema::{
    CreateImageRequest, CreateVideoRequest, Image, ImageTransformationsPatch, UploadCredentials,
    Video, VideoTransformationsPatch,
};
use crate::model::ImageFormat;

use super::error::UploadError;
use super::mime_type::{guess_mime_type_path, MediaCategory};
use super::probe::ffprobe_duration;
use super::progress::ProgressCounter;

pub type ProgressHandler = Arc<dyn Fn(u8) + Send + Sync>;

const DEFAULT_MAX_IMAGE_SIZE: u64 = 100 * 1024 * 1024;
const DEFAULT_MAX_VIDEO_SIZE: u64 = 500 * 1024 * 1024;

/// User-entered metadata for an image upload.
#[derive(Debug, Clone, Default)]
pub struct ImageUploadRequest {
    pub title: String,
    pub description: String,
    pub alt: Option<String>,
    pub format: Option<ImageFormat>,
    pub transformations: Option<ImageTransformationsPatch>,
}

#[derive(Debug, Clone, Default)]
pub struct VideoUploadRequest {
    pub title: String,
    pub description: String,
    pub controls: Option<bool>,
    pub transformations: Option<VideoTransformationsPatch>,
}

/// What the upload API answers with on success. Only the fields the
/// coordinator needs, everything else is ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CdnUploadResponse {
    url: String,
    thumbnail_url: Option<String>,
}

/// Runs one upload end to end: validate the local file, fetch fresh signed
/// credentials, stream the bytes to the CDN, then persist the metadata
/// record. Stages run strictly in that order and the persistence call is
/// only attempted once the CDN URL is in hand.
pub struct UploadCoordinator {
    http: reqwest::Client,
    api_base_url: String,
    upload_api_url: String,
    public_key: String,
    session_token: String,
    max_image_size: u64,
    max_video_size: u64,
    ffprobe_bin: Option<String>,
}

impl UploadCoordinator {
    pub fn new(
        api_base_url: impl Into<String>,
        session_token: impl Into<String>,
        upload_api_url: impl Into<String>,
        public_key: impl Into<String>,
    ) -> Self {
        UploadCoordinator {
            http: reqwest::Client::new(),
            api_base_url: api_base_url.into(),
            upload_api_url: upload_api_url.into(),
            public_key: public_key.into(),
            session_token: session_token.into(),
            max_image_size: DEFAULT_MAX_IMAGE_SIZE,
            max_video_size: DEFAULT_MAX_VIDEO_SIZE,
            ffprobe_bin: None,
        }
    }

    pub fn with_size_limits(mut self, max_image_size: u64, max_video_size: u64) -> Self {
        self.max_image_size = max_image_size;
        self.max_video_size = max_video_size;
        self
    }

    pub fn with_ffprobe_bin(mut self, ffprobe_bin: impl Into<String>) -> Self {
        self.ffprobe_bin = Some(ffprobe_bin.into());
        self
    }

    #[instrument(skip(self, request, progress, cancel))]
    pub async fn upload_image(
        &self,
        path: &Path,
        request: ImageUploadRequest,
        progress: Option<ProgressHandler>,
        cancel: &CancellationToken,
    ) -> Result<Image, UploadError> {
        let (size, mime, file_name) = self.validate(path, MediaCategory::Image).await?;
        let credentials = self.fetch_credentials().await?;
        let uploaded = self
            .upload_file(path, &mime, &file_name, size, credentials, progress, cancel)
            .await?;
        info!(url = %uploaded.url, "image uploaded, saving record");
        let payload = CreateImageRequest {
            title: request.title,
            description: request.description,
            image_url: uploaded.url,
            alt: request.alt,
            format: request.format,
            transformations: request.transformations,
        };
        self.persist("/api/image", &payload).await
    }

    #[instrument(skip(self, request, progress, cancel))]
    pub async fn upload_video(
        &self,
        path: &Path,
        request: VideoUploadRequest,
        progress: Option<ProgressHandler>,
        cancel: &CancellationToken,
    ) -> Result<Video, UploadError> {
        let (size, mime, file_name) = self.validate(path, MediaCategory::Video).await?;
        // duration must be known before anything leaves this machine,
        // the persisted record requires it
        let duration = ffprobe_duration(path, self.ffprobe_bin.as_deref())
            .await
            .map_err(|err| UploadError::Metadata(err.to_string()))?;
        let credentials = self.fetch_credentials().await?;
        let uploaded = self
            .upload_file(path, &mime, &file_name, size, credentials, progress, cancel)
            .await?;
        let thumbnail_url = uploaded
            .thumbnail_url
            .unwrap_or_else(|| format!("{}/ik-thumbnail.jpg", uploaded.url));
        info!(url = %uploaded.url, "video uploaded, saving record");
        let payload = CreateVideoRequest {
            title: request.title,
            description: request.description,
            video_url: uploaded.url,
            thumbnail_url,
            duration: Some(duration),
            controls: request.controls,
            transformations: request.transformations,
        };
        self.persist("/api/video", &payload).await
    }

    /// Pre-network checks: the file must exist, its extension must map to
    /// the expected category and its size must not exceed the category cap.
    async fn validate(
        &self,
        path: &Path,
        category: MediaCategory,
    ) -> Result<(u64, String, String), UploadError> {
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|err| UploadError::Validation(format!("could not read file: {}", err)))?;
        if !metadata.is_file() {
            return Err(UploadError::Validation(format!("{} is not a file", path)));
        }
        let mime = guess_mime_type_path(path)
            .ok_or_else(|| UploadError::Validation("unrecognized file type".to_owned()))?;
        if !category.matches_mime(&mime) {
            return Err(UploadError::Validation(format!(
                "{} is not a {} file",
                path,
                match category {
                    MediaCategory::Image => "image",
                    MediaCategory::Video => "video",
                }
            )));
        }
        let cap = match category {
            MediaCategory::Image => self.max_image_size,
            MediaCategory::Video => self.max_video_size,
        };
        if metadata.len() > cap {
            return Err(UploadError::Validation(format!(
                "file is {} bytes, limit is {}",
                metadata.len(),
                cap
            )));
        }
        let file_name = path
            .file_name()
            .ok_or_else(|| UploadError::Validation("file has no name".to_owned()))?
            .to_owned();
        Ok((metadata.len(), mime.into_owned(), file_name))
    }

    /// Fresh credentials for every attempt, they are single-use and
    /// time-bound.
    async fn fetch_credentials(&self) -> Result<UploadCredentials, UploadError> {
        let response = self
            .http
            .get(format!("{}/api/auth/imagekit-auth", self.api_base_url))
            .bearer_auth(&self.session_token)
            .send()
            .await
            .map_err(into_network_error)?;
        let response = error_for_status(response).await?;
        response.json().await.map_err(into_network_error)
    }

    async fn upload_file(
        &self,
        path: &Path,
        mime: &str,
        file_name: &str,
        size: u64,
        credentials: UploadCredentials,
        progress: Option<ProgressHandler>,
        cancel: &CancellationToken,
    ) -> Result<CdnUploadResponse, UploadError> {
        let file = tokio::fs::File::open(path)
            .await
            .map_err(|err| UploadError::Validation(format!("could not read file: {}", err)))?;
        let counter = Arc::new(Mutex::new(ProgressCounter::new(Some(size))));
        let stream_counter = Arc::clone(&counter);
        let stream_progress = progress.clone();
        let stream = ReaderStream::new(file).map(move |chunk| {
            if let Ok(bytes) = &chunk {
                if let Some(percent) = stream_counter.lock().unwrap().record(bytes.len() as u64) {
                    if let Some(on_progress) = &stream_progress {
                        on_progress(percent);
                    }
                }
            }
            chunk
        });
        let part = Part::stream_with_length(Body::wrap_stream(stream), size)
            .file_name(file_name.to_owned())
            .mime_str(mime)
            .map_err(|err| UploadError::Validation(err.to_string()))?;
        let form = Form::new()
            .text("publicKey", self.public_key.clone())
            .text("token", credentials.token)
            .text("signature", credentials.signature)
            .text("expire", credentials.expire.to_string())
            .text("fileName", file_name.to_owned())
            .part("file", part);
        let send = self.http.post(&self.upload_api_url).multipart(form).send();
        let response = tokio::select! {
            _ = cancel.cancelled() => return Err(UploadError::Aborted),
            result = send => result.map_err(into_network_error)?,
        };
        let response = error_for_status(response).await?;
        // an empty file produces no chunks, so 100 may still be outstanding
        if let Some(percent) = counter.lock().unwrap().finish() {
            if let Some(on_progress) = &progress {
                on_progress(percent);
            }
        }
        response.json().await.map_err(into_network_error)
    }

    /// Metadata save after a successful upload. Any failure here leaves the
    /// CDN object orphaned, which is accepted.
    async fn persist<P, R>(&self, route: &str, payload: &P) -> Result<R, UploadError>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let response = self
            .http
            .post(format!("{}{}", self.api_base_url, route))
            .bearer_auth(&self.session_token)
            .json(payload)
            .send()
            .await
            .map_err(|err| UploadError::Persistence(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(UploadError::Persistence(format!("{}: {}", status, message)));
        }
        response
            .json()
            .await
            .map_err(|err| UploadError::Persistence(err.to_string()))
    }
}

fn into_network_error(err: reqwest::Error) -> UploadError {
    UploadError::Network(err.to_string())
}

async fn error_for_status(response: reqwest::Response) -> Result<reqwest::Response, UploadError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    if status.is_client_error() {
        Err(UploadError::InvalidRequest(format!(
            "{}: {}",
            status, message
        )))
    } else {
        Err(UploadError::ServerError(format!("{}: {}", status, message)))
    }
}

#[cfg(test)]
mod test {
    use std::io::Write;

    use camino::Utf8PathBuf as PathBuf;
    use claims::assert_matches;
    use tokio_util::sync::CancellationToken;

    use super::super::error::UploadError;
    use super::{ImageUploadRequest, UploadCoordinator, VideoUploadRequest};

    // pointing at a closed port: any accidental network call would come
    // back as Network, not Validation
    fn coordinator() -> UploadCoordinator {
        UploadCoordinator::new(
            "http://127.0.0.1:9",
            "session-token",
            "http://127.0.0.1:9/upload",
            "public_key",
        )
    }

    fn temp_file(name: &str, len: usize) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().expect("error creating temp dir");
        let path = PathBuf::from_path_buf(dir.path().join(name)).expect("non utf8 temp path");
        let mut file = std::fs::File::create(&path).expect("error creating temp file");
        file.write_all(&vec![0u8; len]).expect("error writing temp file");
        (dir, path)
    }

    #[tokio::test]
    async fn oversized_file_fails_validation_before_any_network_call() {
        let (_dir, path) = temp_file("big.jpg", 64);
        let coordinator = coordinator().with_size_limits(16, 16);
        let err = coordinator
            .upload_image(
                &path,
                ImageUploadRequest::default(),
                None,
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();
        assert_matches!(err, UploadError::Validation(_));
    }

    #[tokio::test]
    async fn wrong_category_fails_validation() {
        let (_dir, path) = temp_file("clip.mp4", 8);
        let err = coordinator()
            .upload_image(
                &path,
                ImageUploadRequest::default(),
                None,
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();
        assert_matches!(err, UploadError::Validation(_));
    }

    #[tokio::test]
    async fn unknown_file_type_fails_validation() {
        let (_dir, path) = temp_file("notes.txt", 8);
        let err = coordinator()
            .upload_video(
                &path,
                VideoUploadRequest::default(),
                None,
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();
        assert_matches!(err, UploadError::Validation(_));
    }

    #[tokio::test]
    async fn missing_file_fails_validation() {
        let err = coordinator()
            .upload_image(
                camino::Utf8Path::new("/does/not/exist.png"),
                ImageUploadRequest::default(),
                None,
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();
        assert_matches!(err, UploadError::Validation(_));
    }
}
