//! Recipes for every office texture, expressed as draw steps.

use crate::canvas::DrawStep::{self, FillCircle, FillRect, FillStyle, Line, LineStyle};
use crate::error::TextureError;
use crate::palette;
use crate::texture::{bake_texture, TextureStore};

pub const TILE_SIZE: u32 = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OfficeTexture {
    Blank,
    Floor,
    Wall,
    Chair,
    Desk,
    Plant,
    DoorClosed,
    DoorOpen,
    PlayerDown,
    PlayerUp,
    PlayerLeft,
    PlayerRight,
    PlayerSitting,
}

impl OfficeTexture {
    pub const ALL: [OfficeTexture; 13] = [
        OfficeTexture::Blank,
        OfficeTexture::Floor,
        OfficeTexture::Wall,
        OfficeTexture::Chair,
        OfficeTexture::Desk,
        OfficeTexture::Plant,
        OfficeTexture::DoorClosed,
        OfficeTexture::DoorOpen,
        OfficeTexture::PlayerDown,
        OfficeTexture::PlayerUp,
        OfficeTexture::PlayerLeft,
        OfficeTexture::PlayerRight,
        OfficeTexture::PlayerSitting,
    ];

    pub fn name(self) -> &'static str {
        match self {
            OfficeTexture::Blank => "blank",
            OfficeTexture::Floor => "floor",
            OfficeTexture::Wall => "wall",
            OfficeTexture::Chair => "chair",
            OfficeTexture::Desk => "desk",
            OfficeTexture::Plant => "plant",
            OfficeTexture::DoorClosed => "door_closed",
            OfficeTexture::DoorOpen => "door_open",
            OfficeTexture::PlayerDown => "player-down",
            OfficeTexture::PlayerUp => "player-up",
            OfficeTexture::PlayerLeft => "player-left",
            OfficeTexture::PlayerRight => "player-right",
            OfficeTexture::PlayerSitting => "player-sitting",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    pub fn size(self) -> (u32, u32) {
        match self {
            OfficeTexture::Desk => (TILE_SIZE * 2, TILE_SIZE),
            _ => (TILE_SIZE, TILE_SIZE),
        }
    }

    pub fn recipe(self) -> Vec<DrawStep> {
        match self {
            OfficeTexture::Blank => vec![FillStyle(palette::WHITE), full_tile()],
            OfficeTexture::Floor => floor(),
            OfficeTexture::Wall => wall(),
            OfficeTexture::Chair => chair(),
            OfficeTexture::Desk => desk(),
            OfficeTexture::Plant => plant(),
            OfficeTexture::DoorClosed => door_closed(),
            OfficeTexture::DoorOpen => door_open(),
            OfficeTexture::PlayerDown => player(PlayerPose::Down),
            OfficeTexture::PlayerUp => player(PlayerPose::Up),
            OfficeTexture::PlayerLeft => player(PlayerPose::Left),
            OfficeTexture::PlayerRight => player(PlayerPose::Right),
            OfficeTexture::PlayerSitting => player(PlayerPose::Sitting),
        }
    }
}

/// Bake every office texture into `store`, once each, in `OfficeTexture::ALL` order.
pub fn bake_office_textures<S: TextureStore + ?Sized>(store: &mut S) -> Result<usize, TextureError> {
    for texture in OfficeTexture::ALL {
        let (width, height) = texture.size();
        bake_texture(store, texture.name(), width, height, &texture.recipe())?;
    }
    log::info!("Baked {} office textures", OfficeTexture::ALL.len());
    Ok(OfficeTexture::ALL.len())
}

fn full_tile() -> DrawStep {
    FillRect { x: 0, y: 0, w: TILE_SIZE, h: TILE_SIZE }
}

fn rect(x: i32, y: i32, w: u32, h: u32) -> DrawStep {
    FillRect { x, y, w, h }
}

fn line(x0: i32, y0: i32, x1: i32, y1: i32) -> DrawStep {
    Line { from: (x0, y0), to: (x1, y1) }
}

fn floor() -> Vec<DrawStep> {
    vec![
        FillStyle(palette::FLOOR),
        full_tile(),
        LineStyle { width: 1, color: palette::FLOOR_LINE },
        line(0, 16, 32, 16),
        line(16, 0, 16, 32),
    ]
}

// Brick courses every 8px, joints staggered by half a brick.
fn wall() -> Vec<DrawStep> {
    vec![
        FillStyle(palette::WALL),
        full_tile(),
        LineStyle { width: 1, color: palette::WALL_LINE },
        line(0, 8, 32, 8),
        line(0, 16, 32, 16),
        line(0, 24, 32, 24),
        line(0, 0, 0, 32),
        line(16, 0, 16, 32),
        line(8, 8, 8, 32),
        line(24, 8, 24, 32),
    ]
}

fn chair() -> Vec<DrawStep> {
    vec![
        FillStyle(palette::CHAIR_PURPLE),
        rect(6, 16, 20, 6),
        rect(6, 4, 4, 12),
        rect(22, 4, 4, 12),
        rect(6, 4, 20, 4),
        FillStyle(palette::CHAIR_LEG),
        rect(8, 22, 4, 8),
        rect(20, 22, 4, 8),
    ]
}

fn desk() -> Vec<DrawStep> {
    vec![
        FillStyle(palette::DESK_ORANGE),
        rect(4, 8, 56, 8),
        FillStyle(palette::DESK_LEG),
        rect(8, 16, 6, 14),
        rect(50, 16, 6, 14),
    ]
}

fn plant() -> Vec<DrawStep> {
    vec![
        FillStyle(palette::PLANT_POT),
        rect(10, 22, 12, 10),
        FillStyle(palette::PLANT_GREEN),
        FillCircle { cx: 16, cy: 18, r: 8 },
        FillCircle { cx: 12, cy: 14, r: 6 },
        FillCircle { cx: 20, cy: 14, r: 6 },
    ]
}

fn door_closed() -> Vec<DrawStep> {
    vec![
        FillStyle(palette::DOOR_FRAME),
        full_tile(),
        FillStyle(palette::DOOR_RED),
        rect(2, 2, 28, 28),
        FillStyle(palette::DOOR_HANDLE),
        FillCircle { cx: 24, cy: 16, r: 3 },
    ]
}

// Swung open: floor shows through, the panel is edge-on along the hinge side.
fn door_open() -> Vec<DrawStep> {
    vec![
        FillStyle(palette::DOOR_FRAME),
        full_tile(),
        FillStyle(palette::FLOOR),
        rect(2, 2, 28, 28),
        FillStyle(palette::DOOR_RED),
        rect(2, 2, 8, 28),
        FillStyle(palette::DOOR_HANDLE),
        FillCircle { cx: 8, cy: 16, r: 2 },
    ]
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum PlayerPose {
    Down,
    Up,
    Left,
    Right,
    Sitting,
}

fn player(pose: PlayerPose) -> Vec<DrawStep> {
    let body_height = if pose == PlayerPose::Sitting { 14 } else { 20 };
    let mut steps = vec![
        FillStyle(palette::SHIRT_BLUE),
        rect(8, 8, 16, body_height),
        FillStyle(palette::SKIN_YELLOW),
        FillCircle { cx: 16, cy: 8, r: 8 },
        FillStyle(palette::EYE),
    ];
    match pose {
        PlayerPose::Down | PlayerPose::Sitting => steps.extend([
            rect(12, 6, 2, 2),
            rect(18, 6, 2, 2),
            LineStyle { width: 1, color: palette::EYE },
            line(13, 11, 19, 11),
        ]),
        PlayerPose::Left => steps.push(rect(12, 6, 2, 2)),
        PlayerPose::Right => steps.push(rect(18, 6, 2, 2)),
        PlayerPose::Up => {}
    }
    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::{build_texture, Texture, TextureRegistry};
    use image::Rgba;
    use std::collections::HashSet;

    const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

    fn baked(texture: OfficeTexture) -> Texture {
        let (w, h) = texture.size();
        build_texture(texture.name(), w, h, &texture.recipe()).expect("recipe builds")
    }

    #[test]
    fn names_are_unique_and_round_trip() {
        let names: HashSet<&str> = OfficeTexture::ALL.iter().map(|t| t.name()).collect();
        assert_eq!(names.len(), OfficeTexture::ALL.len());
        for texture in OfficeTexture::ALL {
            assert_eq!(OfficeTexture::from_name(texture.name()), Some(texture));
        }
        assert_eq!(OfficeTexture::from_name("sofa"), None);
    }

    #[test]
    fn bake_registers_every_texture_once() {
        let mut registry = TextureRegistry::new();
        let count = bake_office_textures(&mut registry).expect("bake");
        assert_eq!(count, 13);
        assert_eq!(registry.len(), 13);
        for texture in OfficeTexture::ALL {
            let stored = registry.get(texture.name()).expect("registered");
            assert_eq!((stored.width(), stored.height()), texture.size());
        }
    }

    #[test]
    fn desk_is_two_tiles_wide() {
        let desk = baked(OfficeTexture::Desk);
        assert_eq!((desk.width(), desk.height()), (64, 32));
        assert_eq!(desk.pixel(30, 10), palette::DESK_ORANGE);
        assert_eq!(desk.pixel(10, 20), palette::DESK_LEG);
        assert_eq!(desk.pixel(30, 20), CLEAR);
    }

    #[test]
    fn floor_has_cross_lines() {
        let floor = baked(OfficeTexture::Floor);
        assert_eq!(floor.pixel(4, 4), palette::FLOOR);
        assert_eq!(floor.pixel(4, 16), palette::FLOOR_LINE);
        assert_eq!(floor.pixel(16, 4), palette::FLOOR_LINE);
        assert_eq!(floor.pixel(31, 16), palette::FLOOR_LINE);
    }

    #[test]
    fn wall_joints_are_staggered() {
        let wall = baked(OfficeTexture::Wall);
        // Top course has joints at 0 and 16 only.
        assert_eq!(wall.pixel(8, 4), palette::WALL);
        assert_eq!(wall.pixel(16, 4), palette::WALL_LINE);
        // Lower courses pick up the offset joints.
        assert_eq!(wall.pixel(8, 12), palette::WALL_LINE);
        assert_eq!(wall.pixel(24, 28), palette::WALL_LINE);
        assert_eq!(wall.pixel(4, 24), palette::WALL_LINE);
        assert_eq!(wall.pixel(4, 20), palette::WALL);
    }

    #[test]
    fn chair_has_seat_back_and_legs() {
        let chair = baked(OfficeTexture::Chair);
        assert_eq!(chair.pixel(15, 18), palette::CHAIR_PURPLE);
        assert_eq!(chair.pixel(7, 10), palette::CHAIR_PURPLE);
        assert_eq!(chair.pixel(15, 5), palette::CHAIR_PURPLE);
        assert_eq!(chair.pixel(9, 26), palette::CHAIR_LEG);
        assert_eq!(chair.pixel(15, 10), CLEAR);
    }

    #[test]
    fn door_textures_differ_in_panel_and_handle() {
        let closed = baked(OfficeTexture::DoorClosed);
        let open = baked(OfficeTexture::DoorOpen);
        assert_eq!(closed.pixel(0, 0), palette::DOOR_FRAME);
        assert_eq!(open.pixel(0, 0), palette::DOOR_FRAME);
        assert_eq!(closed.pixel(16, 8), palette::DOOR_RED);
        assert_eq!(open.pixel(16, 8), palette::FLOOR);
        assert_eq!(open.pixel(4, 4), palette::DOOR_RED);
        assert_eq!(closed.pixel(24, 16), palette::DOOR_HANDLE);
        assert_eq!(open.pixel(8, 16), palette::DOOR_HANDLE);
        assert_eq!(open.pixel(24, 16), palette::FLOOR);
    }

    #[test]
    fn plant_has_pot_and_leaves() {
        let plant = baked(OfficeTexture::Plant);
        assert_eq!(plant.pixel(15, 30), palette::PLANT_POT);
        assert_eq!(plant.pixel(16, 16), palette::PLANT_GREEN);
        assert_eq!(plant.pixel(0, 0), CLEAR);
    }

    #[test]
    fn player_faces_show_expected_eyes() {
        let down = baked(OfficeTexture::PlayerDown);
        let up = baked(OfficeTexture::PlayerUp);
        let left = baked(OfficeTexture::PlayerLeft);
        let right = baked(OfficeTexture::PlayerRight);

        assert_eq!(down.pixel(12, 6), palette::EYE);
        assert_eq!(down.pixel(18, 6), palette::EYE);
        assert_eq!(down.pixel(15, 11), palette::EYE);

        assert_eq!(up.pixel(12, 6), palette::SKIN_YELLOW);
        assert_eq!(up.pixel(18, 6), palette::SKIN_YELLOW);

        assert_eq!(left.pixel(12, 6), palette::EYE);
        assert_eq!(left.pixel(18, 6), palette::SKIN_YELLOW);

        assert_eq!(right.pixel(18, 6), palette::EYE);
        assert_eq!(right.pixel(12, 6), palette::SKIN_YELLOW);
    }

    #[test]
    fn sitting_player_has_shorter_body() {
        let standing = baked(OfficeTexture::PlayerDown);
        let sitting = baked(OfficeTexture::PlayerSitting);
        assert_eq!(standing.pixel(10, 25), palette::SHIRT_BLUE);
        assert_eq!(sitting.pixel(10, 25), CLEAR);
        assert_eq!(sitting.pixel(10, 20), palette::SHIRT_BLUE);
        assert_eq!(sitting.pixel(12, 6), palette::EYE);
    }
}
