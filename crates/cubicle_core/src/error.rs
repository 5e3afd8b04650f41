use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("texture '{name}' has invalid dimensions {width}x{height}; both must be positive")]
    InvalidDimensions {
        name: String,
        width: u32,
        height: u32,
    },
    #[error("output directory '{}' does not exist", .0.display())]
    MissingOutputDir(PathBuf),
    #[error("failed to write texture '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AtlasError {
    #[error("texture '{name}' ({width}x{height}) does not fit in a {atlas_size}x{atlas_size} atlas")]
    TooLarge {
        name: String,
        width: u32,
        height: u32,
        atlas_size: u32,
    },
    #[error("atlas {atlas_size}x{atlas_size} overflowed while packing '{name}'")]
    OutOfSpace { name: String, atlas_size: u32 },
}
