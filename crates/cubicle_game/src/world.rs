//! The office scene as one explicit context: textures, level, player and the
//! help text, advanced by `tick` and read back through `draw_list`.

use cubicle_core::atlas::{pack, PackedAtlas};
use cubicle_core::input::{InputState, Key};
use cubicle_core::office_art::{bake_office_textures, OfficeTexture};
use cubicle_core::texture::TextureRegistry;
use glam::Vec2;

use crate::animation::{build_walk_animations, WalkAnimations};
use crate::collision::BodyKind;
use crate::config::GameConfig;
use crate::error::GameError;
use crate::interaction::{help_text, interact, Interaction};
use crate::level::{build_level, Level};
use crate::player::{PlayerController, PlayerInput};

const OPAQUE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// One textured quad, centered on `center` in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteInstance {
    pub texture: OfficeTexture,
    pub center: Vec2,
    pub size: Vec2,
    pub tint: [f32; 4],
}

pub struct World {
    pub config: GameConfig,
    pub textures: TextureRegistry,
    pub atlas: PackedAtlas,
    pub walk: WalkAnimations,
    pub level: Level,
    pub player: PlayerController,
    help_text: &'static str,
}

impl World {
    pub fn init(config: &GameConfig) -> Result<World, GameError> {
        let mut textures = TextureRegistry::new();
        let baked = bake_office_textures(&mut textures)?;

        let atlas = pack(textures.sorted(), config.atlas_size)?;
        if let Some(missing) = OfficeTexture::ALL
            .iter()
            .find(|t| atlas.resolve(t.name()).is_none())
        {
            return Err(GameError::MissingSprite(missing.name().to_string()));
        }

        let walk = build_walk_animations(config.walk_frame_rate, config.walk_bob_px)
            .map_err(GameError::Animation)?;
        let level = build_level(config.world_width, config.world_height)?;
        let player = PlayerController::new(
            level.player_spawn,
            config.player_body,
            config.player_speed,
        );

        log::info!(
            "Office ready: {} textures baked into a {}px atlas, player at ({}, {})",
            baked,
            atlas.size,
            level.player_spawn.x,
            level.player_spawn.y
        );

        Ok(World {
            config: config.clone(),
            textures,
            atlas,
            walk,
            level,
            player,
            help_text: help_text(false),
        })
    }

    /// One fixed step: movement and collision first, then the interact edge.
    pub fn tick(&mut self, dt: f32, input: &InputState) -> Interaction {
        self.player.step(
            PlayerInput::from_input(input),
            dt,
            &self.walk,
            &self.level.collision,
        );

        if !input.is_just_pressed(Key::Space) {
            return Interaction::Nothing;
        }
        let outcome = interact(&mut self.player, &mut self.level, &self.config);
        self.help_text = help_text(self.player.is_sitting());
        outcome
    }

    pub fn help_text(&self) -> &'static str {
        self.help_text
    }

    pub fn doors_open(&self) -> usize {
        self.level.doors.iter().filter(|d| d.open).count()
    }

    /// Puts the player back on the spawn point, standing.
    pub fn respawn_player(&mut self) {
        self.player = PlayerController::new(
            self.level.player_spawn,
            self.config.player_body,
            self.config.player_speed,
        );
        self.help_text = help_text(false);
        log::info!("Player respawned");
    }

    /// Every sprite in back-to-front order.
    pub fn draw_list(&self) -> Vec<SpriteInstance> {
        let tile = Vec2::splat(self.config.tile_size as f32);
        let mut sprites = Vec::with_capacity(self.level.floor.len() + self.level.props.len() + 32);

        sprites.extend(self.level.floor.iter().map(|&center| SpriteInstance {
            texture: OfficeTexture::Floor,
            center,
            size: tile,
            tint: OPAQUE,
        }));
        sprites.extend(self.level.walls().map(|wall| SpriteInstance {
            texture: wall.texture,
            center: wall.position,
            size: wall.size(),
            tint: OPAQUE,
        }));
        sprites.extend(self.level.doors.iter().map(|door| SpriteInstance {
            texture: door.texture(),
            center: door.position,
            size: tile,
            tint: OPAQUE,
        }));
        sprites.extend(
            self.props_of(OfficeTexture::Desk)
                .chain(self.level.chairs.iter().map(|chair| SpriteInstance {
                    texture: OfficeTexture::Chair,
                    center: chair.position,
                    size: tile,
                    tint: OPAQUE,
                }))
                .chain(self.props_of(OfficeTexture::Plant)),
        );

        let (texture, offset) = self.player.sprite(&self.walk);
        let (w, h) = texture.size();
        sprites.push(SpriteInstance {
            texture,
            center: self.player.position() + offset,
            size: Vec2::new(w as f32, h as f32),
            tint: OPAQUE,
        });
        sprites
    }

    fn props_of(&self, texture: OfficeTexture) -> impl Iterator<Item = SpriteInstance> + '_ {
        self.level
            .props
            .iter()
            .filter(move |p| p.texture == texture)
            .map(|p| SpriteInstance {
                texture: p.texture,
                center: p.position,
                size: p.size(),
                tint: OPAQUE,
            })
    }

    /// Translucent boxes over every body that currently blocks movement.
    pub fn collision_debug_list(&self) -> Vec<SpriteInstance> {
        let mut boxes: Vec<SpriteInstance> = self
            .level
            .collision
            .enabled_bodies()
            .map(|body| SpriteInstance {
                texture: OfficeTexture::Blank,
                center: Vec2::new(body.aabb.center_x, body.aabb.center_y),
                size: Vec2::new(body.aabb.half_w * 2.0, body.aabb.half_h * 2.0),
                tint: match body.kind {
                    BodyKind::Door => [0.2, 0.4, 1.0, 0.35],
                    BodyKind::Wall | BodyKind::Plant => [1.0, 0.2, 0.2, 0.35],
                },
            })
            .collect();
        let player = self.player.aabb;
        boxes.push(SpriteInstance {
            texture: OfficeTexture::Blank,
            center: Vec2::new(player.center_x, player.center_y),
            size: Vec2::new(player.half_w * 2.0, player.half_h * 2.0),
            tint: [0.2, 1.0, 0.2, 0.35],
        });
        boxes
    }
}
