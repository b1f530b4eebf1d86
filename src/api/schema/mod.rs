pub mod auth;
pub mod media_asset;

pub use auth::*;
pub use media_asset::*;
