/// Everything that can go wrong between picking a file and holding a
/// persisted record. Each variant carries its own user-facing message and
/// none of them is retried automatically, the caller resubmits.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// Rejected before any network call: wrong media type or over the
    /// size cap.
    #[error("invalid upload: {0}")]
    Validation(String),
    /// Video duration could not be read from the file.
    #[error("could not read media metadata: {0}")]
    Metadata(String),
    #[error("upload aborted")]
    Aborted,
    /// The upload service rejected the request (4xx).
    #[error("upload rejected: {0}")]
    InvalidRequest(String),
    /// The upload service failed (5xx).
    #[error("upload service error: {0}")]
    ServerError(String),
    #[error("network error during upload: {0}")]
    Network(String),
    /// The media is on the CDN but saving the record failed. The uploaded
    /// object is orphaned, nothing cleans it up.
    #[error("media uploaded but saving the record failed: {0}")]
    Persistence(String),
}
