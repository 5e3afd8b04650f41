pub mod animation;
pub mod atlas;
pub mod canvas;
pub mod error;
pub mod input;
pub mod office_art;
pub mod palette;
pub mod texture;
pub mod time;

pub use error::{AtlasError, TextureError};
