mod coordinator;
mod error;
mod mime_type;
mod probe;
mod progress;

pub use coordinator::{
    ImageUploadRequest, ProgressHandler, UploadCoordinator, VideoUploadRequest,
};
pub use error::UploadError;
pub use mime_type::{guess_mime_type, guess_mime_type_path, MediaCategory};
pub use probe::ffprobe_duration;
pub use progress::ProgressCounter;
