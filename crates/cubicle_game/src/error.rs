use cubicle_core::{AtlasError, TextureError};
use thiserror::Error;

use crate::level::LevelError;

/// Anything that can stop the office scene from starting.
#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Texture(#[from] TextureError),
    #[error(transparent)]
    Atlas(#[from] AtlasError),
    #[error(transparent)]
    Level(#[from] LevelError),
    #[error("walk animation: {0}")]
    Animation(String),
    #[error("texture '{0}' is missing from the atlas")]
    MissingSprite(String),
}
