//! Writes the office textures to disk: one PNG per texture, the reference
//! tileset sheet, and the packed atlas with its JSON manifest.

use cubicle_core::atlas::{pack, PackedAtlas, DEFAULT_ATLAS_SIZE};
use cubicle_core::office_art::{bake_office_textures, OfficeTexture};
use cubicle_core::palette;
use cubicle_core::texture::{PngExporter, TextureRegistry};
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const DEFAULT_OUTPUT_DIR: &str = "assets";
const TILESET_FILE: &str = "office_tileset.png";
const ATLAS_PNG_FILE: &str = "office_atlas.png";
const ATLAS_JSON_FILE: &str = "office_atlas.json";
const STAGING_DIR: &str = ".staging";
const MANIFEST_VERSION: u32 = 1;
const TILESET_SIZE: u32 = 128;

/// Where each texture lands on the reference sheet.
const TILESET_SLOTS: [(OfficeTexture, u32, u32); 8] = [
    (OfficeTexture::PlayerDown, 0, 0),
    (OfficeTexture::Chair, 32, 0),
    (OfficeTexture::Desk, 64, 0),
    (OfficeTexture::Floor, 0, 32),
    (OfficeTexture::Wall, 32, 32),
    (OfficeTexture::DoorClosed, 64, 32),
    (OfficeTexture::DoorOpen, 96, 32),
    (OfficeTexture::Plant, 0, 64),
];

#[derive(Debug, Serialize, Deserialize)]
struct AtlasManifest {
    version: u32,
    atlas_id: String,
    texture: AtlasTexture,
    sprites: Vec<AtlasSprite>,
}

#[derive(Debug, Serialize, Deserialize)]
struct AtlasTexture {
    path: String,
    width: u32,
    height: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct AtlasSprite {
    id: String,
    name: String,
    rect_px: AtlasRectPx,
    uv: AtlasUvRect,
    pivot: AtlasPivot,
    sha256: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct AtlasRectPx {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct AtlasUvRect {
    u0: f32,
    v0: f32,
    u1: f32,
    v1: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct AtlasPivot {
    x: f32,
    y: f32,
}

fn usage() -> String {
    "Usage: cargo run -p cubicle_asset_export -- [output_dir]\nExample: cargo run -p cubicle_asset_export -- assets".to_string()
}

fn main() -> Result<(), String> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() > 2 {
        return Err(usage());
    }
    let output_dir = PathBuf::from(args.get(1).map_or(DEFAULT_OUTPUT_DIR, String::as_str));
    run(&output_dir)
}

fn run(output_dir: &Path) -> Result<(), String> {
    fs::create_dir_all(output_dir).map_err(|e| {
        format!(
            "Failed to create output dir '{}': {e}",
            output_dir.display()
        )
    })?;
    let mut staged = StagedExport::begin(output_dir)?;

    let mut exporter = PngExporter::new(staged.staging_dir()).map_err(|e| e.to_string())?;
    bake_office_textures(&mut exporter).map_err(|e| e.to_string())?;
    staged.adopt(exporter.written())?;
    let texture_count = exporter.written().len();

    let mut registry = TextureRegistry::new();
    bake_office_textures(&mut registry).map_err(|e| e.to_string())?;

    let tileset = build_tileset(&registry)?;
    staged.write_png(TILESET_FILE, &tileset)?;

    let atlas = pack(registry.sorted(), DEFAULT_ATLAS_SIZE).map_err(|e| e.to_string())?;
    staged.write_png(ATLAS_PNG_FILE, &atlas.image)?;

    let manifest = build_manifest(&atlas, &registry, &output_dir.join(ATLAS_PNG_FILE))?;
    let json = serde_json::to_string_pretty(&manifest)
        .map_err(|e| format!("Failed to serialize atlas manifest: {e}"))?;
    staged.write_text(ATLAS_JSON_FILE, &json)?;

    staged.commit()?;

    log::info!(
        "Exported {} textures, {} and {} ({} sprites) to {}",
        texture_count,
        TILESET_FILE,
        ATLAS_PNG_FILE,
        manifest.sprites.len(),
        output_dir.display()
    );
    Ok(())
}

/// Reference sheet: each slotted texture blitted onto white.
fn build_tileset(registry: &TextureRegistry) -> Result<RgbaImage, String> {
    let mut sheet = RgbaImage::from_pixel(TILESET_SIZE, TILESET_SIZE, palette::WHITE);
    for (texture, x, y) in TILESET_SLOTS {
        let source = registry
            .get(texture.name())
            .ok_or_else(|| format!("Texture '{}' was not baked", texture.name()))?;
        image::imageops::overlay(&mut sheet, source.image(), i64::from(x), i64::from(y));
    }
    Ok(sheet)
}

fn build_manifest(
    atlas: &PackedAtlas,
    registry: &TextureRegistry,
    atlas_png_path: &Path,
) -> Result<AtlasManifest, String> {
    let mut sprites = Vec::with_capacity(atlas.len());
    for (name, entry) in atlas.entries() {
        let texture = registry
            .get(name)
            .ok_or_else(|| format!("Atlas entry '{name}' has no source texture"))?;
        let rect = entry.rect_px;
        sprites.push(AtlasSprite {
            id: sprite_id_for(name),
            name: name.to_string(),
            rect_px: AtlasRectPx {
                x: rect.x,
                y: rect.y,
                w: rect.w,
                h: rect.h,
            },
            uv: AtlasUvRect {
                u0: entry.uv[0],
                v0: entry.uv[1],
                u1: entry.uv[2],
                v1: entry.uv[3],
            },
            pivot: AtlasPivot {
                x: entry.pivot.0,
                y: entry.pivot.1,
            },
            sha256: hash_rgba8_bytes(texture.image().as_raw()),
        });
    }

    Ok(AtlasManifest {
        version: MANIFEST_VERSION,
        atlas_id: atlas_png_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("atlas")
            .to_string(),
        texture: AtlasTexture {
            path: normalize_path_for_json(atlas_png_path),
            width: atlas.size,
            height: atlas.size,
        },
        sprites,
    })
}

/// Stable per-name id: the same texture name always maps to the same uuid.
fn sprite_id_for(name: &str) -> String {
    Uuid::new_v5(
        &Uuid::NAMESPACE_URL,
        format!("cubicle-office://textures/{name}").as_bytes(),
    )
    .to_string()
}

fn normalize_path_for_json(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn hash_rgba8_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    format!("{digest:x}")
}

/// Files written under a staging dir first, then moved into the output dir
/// together so a failed export never leaves a partial set behind.
struct StagedExport {
    output_dir: PathBuf,
    staging_dir: PathBuf,
    files: Vec<String>,
}

impl StagedExport {
    fn begin(output_dir: &Path) -> Result<Self, String> {
        let staging_dir = output_dir.join(STAGING_DIR);
        if staging_dir.exists() {
            fs::remove_dir_all(&staging_dir).map_err(|e| {
                format!(
                    "Failed to clear stale staging dir '{}': {e}",
                    staging_dir.display()
                )
            })?;
        }
        fs::create_dir_all(&staging_dir).map_err(|e| {
            format!(
                "Failed to create staging dir '{}': {e}",
                staging_dir.display()
            )
        })?;
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            staging_dir,
            files: Vec::new(),
        })
    }

    fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }

    /// Takes ownership of files something else already wrote into the staging dir.
    fn adopt(&mut self, written: &[PathBuf]) -> Result<(), String> {
        for path in written {
            let file = path
                .strip_prefix(&self.staging_dir)
                .ok()
                .and_then(|rel| rel.to_str())
                .ok_or_else(|| format!("'{}' was not written to the staging dir", path.display()))?;
            self.files.push(file.to_string());
        }
        Ok(())
    }

    fn write_png(&mut self, file: &str, image: &RgbaImage) -> Result<(), String> {
        let path = self.staging_dir.join(file);
        image
            .save_with_format(&path, image::ImageFormat::Png)
            .map_err(|e| format!("Failed to write '{}': {e}", path.display()))?;
        self.files.push(file.to_string());
        Ok(())
    }

    fn write_text(&mut self, file: &str, text: &str) -> Result<(), String> {
        let path = self.staging_dir.join(file);
        fs::write(&path, text).map_err(|e| format!("Failed to write '{}': {e}", path.display()))?;
        self.files.push(file.to_string());
        Ok(())
    }

    /// Moves each staged file over its final path, parking any previous
    /// output in the staging dir. On the first failure every placed file is
    /// removed and every parked one restored.
    fn commit(self) -> Result<(), String> {
        let mut placed: Vec<PathBuf> = Vec::new();
        let mut parked: Vec<(PathBuf, PathBuf)> = Vec::new();

        let outcome = self.files.iter().try_for_each(|file| -> Result<(), String> {
            let target = self.output_dir.join(file);
            if target.exists() {
                let previous = self.staging_dir.join(format!("{file}.previous"));
                fs::rename(&target, &previous).map_err(|e| {
                    format!("Failed to set aside '{}': {e}", target.display())
                })?;
                parked.push((target.clone(), previous));
            }
            let staged = self.staging_dir.join(file);
            fs::rename(&staged, &target).map_err(|e| {
                format!(
                    "Failed to move '{}' -> '{}': {e}",
                    staged.display(),
                    target.display()
                )
            })?;
            placed.push(target);
            Ok(())
        });

        match outcome {
            Ok(()) => {
                if let Err(e) = fs::remove_dir_all(&self.staging_dir) {
                    log::warn!("Could not remove '{}': {e}", self.staging_dir.display());
                }
                Ok(())
            }
            Err(err) => {
                roll_back(&placed, &parked);
                Err(err)
            }
        }
    }
}

fn roll_back(placed: &[PathBuf], parked: &[(PathBuf, PathBuf)]) {
    for path in placed.iter().rev() {
        if let Err(e) = fs::remove_file(path) {
            log::warn!("Rollback could not remove '{}': {e}", path.display());
        }
    }
    for (target, previous) in parked.iter().rev() {
        if let Err(e) = fs::rename(previous, target) {
            log::warn!("Rollback could not restore '{}': {e}", target.display());
        }
    }
}
