pub mod repository;

mod id_types;
mod media_asset;
mod user;
pub use id_types::*;
pub use media_asset::*;
pub use user::*;

mod util;
