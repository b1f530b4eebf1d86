mod media_asset;
mod user;

pub use media_asset::*;
pub use user::*;
