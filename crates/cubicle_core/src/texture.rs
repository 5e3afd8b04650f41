//! Named, immutable bitmaps baked from draw steps, and the stores that keep them.
//!
//! `TextureStore` is the seam between the builder and where textures end up:
//! `TextureRegistry` keeps them in memory for the running game, `PngExporter`
//! writes each one to disk as `<name>.png`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};

use crate::canvas::{Canvas, DrawStep};
use crate::error::TextureError;

#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    name: String,
    image: RgbaImage,
}

impl Texture {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.image.get_pixel(x, y)
    }
}

/// Rasterize `steps` onto a transparent `width` x `height` canvas.
pub fn build_texture(
    name: &str,
    width: u32,
    height: u32,
    steps: &[DrawStep],
) -> Result<Texture, TextureError> {
    if width == 0 || height == 0 {
        return Err(TextureError::InvalidDimensions {
            name: name.to_string(),
            width,
            height,
        });
    }

    let mut canvas = Canvas::new(width, height);
    for step in steps {
        canvas.apply(step);
    }
    Ok(Texture {
        name: name.to_string(),
        image: canvas.into_image(),
    })
}

pub trait TextureStore {
    /// Registers `texture` under its name, replacing any earlier texture of that name.
    fn store(&mut self, texture: Texture) -> Result<(), TextureError>;
}

/// Build a texture and hand it straight to `store`.
pub fn bake_texture<S: TextureStore + ?Sized>(
    store: &mut S,
    name: &str,
    width: u32,
    height: u32,
    steps: &[DrawStep],
) -> Result<(), TextureError> {
    let texture = build_texture(name, width, height, steps)?;
    store.store(texture)
}

/// In-memory texture registry keyed by name.
#[derive(Debug, Default)]
pub struct TextureRegistry {
    textures: HashMap<String, Texture>,
}

impl TextureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Texture> {
        self.textures.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.textures.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Textures in name order, so anything built from them is deterministic.
    pub fn sorted(&self) -> Vec<&Texture> {
        let mut textures: Vec<&Texture> = self.textures.values().collect();
        textures.sort_by(|a, b| a.name.cmp(&b.name));
        textures
    }
}

impl TextureStore for TextureRegistry {
    fn store(&mut self, texture: Texture) -> Result<(), TextureError> {
        if self.textures.contains_key(&texture.name) {
            log::debug!("Replacing texture '{}'", texture.name);
        }
        self.textures.insert(texture.name.clone(), texture);
        Ok(())
    }
}

/// Writes each stored texture to `<dir>/<name>.png`.
#[derive(Debug)]
pub struct PngExporter {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl PngExporter {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, TextureError> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(TextureError::MissingOutputDir(dir));
        }
        Ok(Self {
            dir,
            written: Vec::new(),
        })
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.png"))
    }

    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl TextureStore for PngExporter {
    fn store(&mut self, texture: Texture) -> Result<(), TextureError> {
        let path = self.path_for(&texture.name);
        texture
            .image
            .save_with_format(&path, image::ImageFormat::Png)
            .map_err(|source| TextureError::Write {
                path: path.clone(),
                source,
            })?;
        log::info!("Created {}", path.display());
        self.written.push(path);
        Ok(())
    }
}
