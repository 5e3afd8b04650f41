//! Shelf packing of baked textures into a single atlas image.
//!
//! Textures are placed left to right in name order, starting a new shelf when
//! the current one is full, with one pixel of padding between neighbours.
//! `AtlasSpriteEntry` is what the renderer needs to build a quad: the pixel
//! rect, normalized UVs and pivot.

use std::collections::BTreeMap;

use image::RgbaImage;

use crate::error::AtlasError;
use crate::texture::Texture;

pub const DEFAULT_ATLAS_SIZE: u32 = 256;
const PADDING: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtlasRectPx {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtlasSpriteEntry {
    pub rect_px: AtlasRectPx,
    pub uv: [f32; 4],
    pub pivot: (f32, f32),
}

impl AtlasSpriteEntry {
    pub fn size_px(&self) -> (u32, u32) {
        (self.rect_px.w, self.rect_px.h)
    }
}

pub struct PackedAtlas {
    pub image: RgbaImage,
    pub size: u32,
    entries: BTreeMap<String, AtlasSpriteEntry>,
}

impl PackedAtlas {
    pub fn resolve(&self, name: &str) -> Option<&AtlasSpriteEntry> {
        self.entries.get(name)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &AtlasSpriteEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Pack `textures` (in the order given) into a square atlas of `atlas_size` pixels.
pub fn pack<'a>(
    textures: impl IntoIterator<Item = &'a Texture>,
    atlas_size: u32,
) -> Result<PackedAtlas, AtlasError> {
    let mut image = RgbaImage::new(atlas_size, atlas_size);
    let mut entries = BTreeMap::new();
    let mut x = 0u32;
    let mut y = 0u32;
    let mut row_height = 0u32;

    for texture in textures {
        let (w, h) = (texture.width(), texture.height());

        if w + PADDING * 2 > atlas_size || h + PADDING * 2 > atlas_size {
            return Err(AtlasError::TooLarge {
                name: texture.name().to_string(),
                width: w,
                height: h,
                atlas_size,
            });
        }

        if x + w + PADDING > atlas_size {
            x = 0;
            y += row_height;
            row_height = 0;
        }
        if y + h + PADDING > atlas_size {
            return Err(AtlasError::OutOfSpace {
                name: texture.name().to_string(),
                atlas_size,
            });
        }

        image::imageops::replace(&mut image, texture.image(), x as i64, y as i64);

        let size = atlas_size as f32;
        entries.insert(
            texture.name().to_string(),
            AtlasSpriteEntry {
                rect_px: AtlasRectPx { x, y, w, h },
                uv: [
                    x as f32 / size,
                    y as f32 / size,
                    (x + w) as f32 / size,
                    (y + h) as f32 / size,
                ],
                pivot: (0.5, 0.5),
            },
        );

        x += w + PADDING;
        row_height = row_height.max(h + PADDING);
    }

    log::debug!("Packed {} textures into {atlas_size}x{atlas_size} atlas", entries.len());
    Ok(PackedAtlas {
        image,
        size: atlas_size,
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::DrawStep;
    use crate::office_art::bake_office_textures;
    use crate::palette;
    use crate::texture::{build_texture, TextureRegistry};

    fn solid(name: &str, w: u32, h: u32) -> Texture {
        build_texture(
            name,
            w,
            h,
            &[
                DrawStep::FillStyle(palette::WALL),
                DrawStep::FillRect { x: 0, y: 0, w, h },
            ],
        )
        .expect("build")
    }

    #[test]
    fn packs_left_to_right_with_padding() {
        let a = solid("a", 32, 32);
        let b = solid("b", 64, 32);
        let atlas = pack([&a, &b], 128).expect("pack");

        let ea = atlas.resolve("a").expect("a packed");
        let eb = atlas.resolve("b").expect("b packed");
        assert_eq!(ea.rect_px, AtlasRectPx { x: 0, y: 0, w: 32, h: 32 });
        assert_eq!(eb.rect_px, AtlasRectPx { x: 33, y: 0, w: 64, h: 32 });
        assert_eq!(eb.uv, [33.0 / 128.0, 0.0, 97.0 / 128.0, 0.25]);
        assert_eq!(eb.size_px(), (64, 32));
        assert_eq!(*atlas.image.get_pixel(40, 5), palette::WALL);
        assert_eq!(atlas.image.get_pixel(32, 5)[3], 0);
    }

    #[test]
    fn wraps_to_next_shelf() {
        let textures: Vec<Texture> = (0..3).map(|i| solid(&format!("t{i}"), 32, 32)).collect();
        let atlas = pack(textures.iter(), 80).expect("pack");
        assert_eq!(atlas.resolve("t2").expect("t2").rect_px.y, 33);
        assert_eq!(atlas.resolve("t2").expect("t2").rect_px.x, 0);
    }

    #[test]
    fn too_large_texture_fails() {
        let big = solid("big", 64, 32);
        let err = pack([&big], 64).err().expect("should fail");
        assert!(matches!(err, AtlasError::TooLarge { ref name, .. } if name == "big"));
    }

    #[test]
    fn overflow_fails() {
        let textures: Vec<Texture> = (0..5).map(|i| solid(&format!("t{i}"), 32, 32)).collect();
        let err = pack(textures.iter(), 66).err().expect("should overflow");
        assert!(matches!(err, AtlasError::OutOfSpace { .. }));
    }

    #[test]
    fn office_textures_fit_default_atlas() {
        let mut registry = TextureRegistry::new();
        bake_office_textures(&mut registry).expect("bake");
        let atlas = pack(registry.sorted(), DEFAULT_ATLAS_SIZE).expect("pack");
        assert_eq!(atlas.len(), registry.len());
        assert!(atlas.resolve("player-sitting").is_some());
    }
}
