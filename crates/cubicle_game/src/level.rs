//! The fixed office layout: floor, walls, two meeting rooms, open-plan desks
//! and plants.
//!
//! Everything is placed from constants. Tile positions are given by their
//! top-left grid origin and stored as centers like every other entity.

use cubicle_core::office_art::OfficeTexture;
use glam::Vec2;
use thiserror::Error;

use crate::collision::{Aabb, BodyId, BodyKind, CollisionWorld};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LevelError {
    #[error("world size {width}x{height} must be a positive multiple of the {tile}px tile")]
    InvalidWorldSize { width: u32, height: u32, tile: u32 },
}

const TILE: f32 = 32.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChairId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DoorId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Chair {
    pub position: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Door {
    /// Center of the door tile.
    pub position: Vec2,
    pub open: bool,
    pub body: BodyId,
    /// Unit step from the door tile toward the corridor side.
    pub outward: Vec2,
}

impl Door {
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.position.x, self.position.y, TILE, TILE)
    }

    pub fn texture(&self) -> OfficeTexture {
        if self.open {
            OfficeTexture::DoorOpen
        } else {
            OfficeTexture::DoorClosed
        }
    }
}

/// A static, non-interactive sprite. Solid ones also own a collision body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prop {
    pub texture: OfficeTexture,
    pub position: Vec2,
    pub scale: Vec2,
    pub solid: bool,
}

impl Prop {
    fn tile(texture: OfficeTexture, origin: Vec2, solid: bool) -> Self {
        Self {
            texture,
            position: origin + Vec2::splat(TILE / 2.0),
            scale: Vec2::ONE,
            solid,
        }
    }

    fn centered(texture: OfficeTexture, position: Vec2, scale: Vec2, solid: bool) -> Self {
        Self {
            texture,
            position,
            scale,
            solid,
        }
    }

    pub fn size(&self) -> Vec2 {
        let (w, h) = self.texture.size();
        Vec2::new(w as f32, h as f32) * self.scale
    }
}

/// An enclosed room: a one-tile wall ring with a door in the bottom wall.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeetingRoom {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl MeetingRoom {
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Top-left of the door tile, centered on the bottom wall.
    pub fn door_origin(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0 - TILE / 2.0, self.y + self.height - TILE)
    }

    #[cfg(test)]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    /// Grid origins of every wall tile, leaving a gap for the door.
    pub fn wall_origins(&self) -> Vec<Vec2> {
        let top = self.y;
        let bottom = self.y + self.height - TILE;
        let left = self.x;
        let right = self.x + self.width - TILE;
        let door_x = self.door_origin().x;

        let mut origins = Vec::new();
        origins.extend(tile_span(self.x, self.x + self.width).map(|x| Vec2::new(x, top)));
        origins.extend(tile_span(self.x, door_x).map(|x| Vec2::new(x, bottom)));
        origins.extend(
            tile_span(door_x + TILE, self.x + self.width).map(|x| Vec2::new(x, bottom)),
        );
        for y in tile_span(self.y + TILE, self.y + self.height - TILE) {
            origins.push(Vec2::new(left, y));
            origins.push(Vec2::new(right, y));
        }
        origins
    }

    /// Two rows of three around the table.
    pub fn chair_positions(&self) -> [Vec2; 6] {
        let c = self.center();
        [
            Vec2::new(c.x - 50.0, c.y - 30.0),
            Vec2::new(c.x, c.y - 30.0),
            Vec2::new(c.x + 50.0, c.y - 30.0),
            Vec2::new(c.x - 50.0, c.y + 30.0),
            Vec2::new(c.x, c.y + 30.0),
            Vec2::new(c.x + 50.0, c.y + 30.0),
        ]
    }
}

pub const MEETING_ROOMS: [MeetingRoom; 2] = [
    MeetingRoom {
        x: 500.0,
        y: 100.0,
        width: 250.0,
        height: 200.0,
    },
    MeetingRoom {
        x: 100.0,
        y: 350.0,
        width: 200.0,
        height: 200.0,
    },
];

pub const OFFICE_DESKS: [(f32, f32); 7] = [
    (100.0, 100.0),
    (100.0, 200.0),
    (250.0, 100.0),
    (250.0, 200.0),
    (400.0, 400.0),
    (500.0, 400.0),
    (600.0, 400.0),
];

/// Office chairs sit this far below their desk.
pub const DESK_CHAIR_OFFSET: f32 = 40.0;

pub const PLANTS: [(f32, f32); 6] = [
    (50.0, 50.0),
    (750.0, 50.0),
    (750.0, 550.0),
    (50.0, 550.0),
    (400.0, 100.0),
    (600.0, 300.0),
];

#[derive(Debug, Clone)]
pub struct Level {
    /// Centers of the floor tiles.
    pub floor: Vec<Vec2>,
    pub props: Vec<Prop>,
    pub chairs: Vec<Chair>,
    pub doors: Vec<Door>,
    pub player_spawn: Vec2,
    pub collision: CollisionWorld,
}

impl Level {
    pub fn walls(&self) -> impl Iterator<Item = &Prop> {
        self.props.iter().filter(|p| p.texture == OfficeTexture::Wall)
    }
}

pub fn build_level(world_width: u32, world_height: u32) -> Result<Level, LevelError> {
    let tile = TILE as u32;
    if world_width == 0 || world_height == 0 || world_width % tile != 0 || world_height % tile != 0
    {
        return Err(LevelError::InvalidWorldSize {
            width: world_width,
            height: world_height,
            tile,
        });
    }

    let (w, h) = (world_width as f32, world_height as f32);
    let mut collision = CollisionWorld::new(w, h);
    let mut props = Vec::new();
    let mut chairs = Vec::new();
    let mut doors = Vec::new();

    let floor = tile_span(0.0, h)
        .flat_map(|y| tile_span(0.0, w).map(move |x| Vec2::new(x, y) + Vec2::splat(TILE / 2.0)))
        .collect();

    let mut perimeter: Vec<Vec2> = Vec::new();
    for x in tile_span(0.0, w) {
        perimeter.push(Vec2::new(x, 0.0));
        perimeter.push(Vec2::new(x, h - TILE));
    }
    for y in tile_span(TILE, h - TILE) {
        perimeter.push(Vec2::new(0.0, y));
        perimeter.push(Vec2::new(w - TILE, y));
    }
    for origin in perimeter {
        props.push(Prop::tile(OfficeTexture::Wall, origin, true));
    }

    for room in &MEETING_ROOMS {
        for origin in room.wall_origins() {
            props.push(Prop::tile(OfficeTexture::Wall, origin, true));
        }

        let door_center = room.door_origin() + Vec2::splat(TILE / 2.0);
        let body = collision.add_body(
            Aabb::new(door_center.x, door_center.y, TILE, TILE),
            BodyKind::Door,
        );
        // Room doors sit in the bottom wall, so outside is down-screen.
        doors.push(Door {
            position: door_center,
            open: false,
            body,
            outward: Vec2::Y,
        });

        props.push(Prop::centered(
            OfficeTexture::Desk,
            room.center(),
            Vec2::new(2.0, 1.0),
            false,
        ));
        chairs.extend(room.chair_positions().map(|position| Chair { position }));
    }

    for (x, y) in OFFICE_DESKS {
        props.push(Prop::centered(
            OfficeTexture::Desk,
            Vec2::new(x, y),
            Vec2::ONE,
            false,
        ));
        chairs.push(Chair {
            position: Vec2::new(x, y + DESK_CHAIR_OFFSET),
        });
    }

    for (x, y) in PLANTS {
        props.push(Prop::centered(
            OfficeTexture::Plant,
            Vec2::new(x, y),
            Vec2::ONE,
            true,
        ));
    }

    for prop in props.iter().filter(|p| p.solid) {
        let size = prop.size();
        let kind = match prop.texture {
            OfficeTexture::Plant => BodyKind::Plant,
            _ => BodyKind::Wall,
        };
        collision.add_body(Aabb::new(prop.position.x, prop.position.y, size.x, size.y), kind);
    }

    let level = Level {
        floor,
        props,
        chairs,
        doors,
        player_spawn: Vec2::new(w / 2.0, h / 2.0),
        collision,
    };
    log::info!(
        "Built level {}x{}: {} walls, {} chairs, {} doors, spawn ({}, {})",
        world_width,
        world_height,
        level.walls().count(),
        level.chairs.len(),
        level.doors.len(),
        level.player_spawn.x,
        level.player_spawn.y
    );
    Ok(level)
}

/// Tile origins covering `[start, end)`. The last tile is pulled back flush
/// with `end` when the span is not a whole number of tiles.
fn tile_span(start: f32, end: f32) -> impl Iterator<Item = f32> {
    let mut origins = Vec::new();
    if end > start {
        let mut origin = start;
        while origin + TILE < end {
            origins.push(origin);
            origin += TILE;
        }
        origins.push((end - TILE).max(start));
    }
    origins.into_iter()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn office() -> Level {
        build_level(800, 608).expect("default world builds")
    }

    #[test]
    fn rejects_world_not_on_tile_grid() {
        assert_eq!(
            build_level(800, 600).unwrap_err(),
            LevelError::InvalidWorldSize {
                width: 800,
                height: 600,
                tile: 32
            }
        );
        assert!(build_level(0, 608).is_err());
        assert!(build_level(810, 608).is_err());
    }

    #[test]
    fn two_doors_and_nineteen_chairs() {
        let level = office();
        assert_eq!(level.doors.len(), 2);
        assert_eq!(level.chairs.len(), 19);

        let in_rooms = level
            .chairs
            .iter()
            .filter(|c| MEETING_ROOMS.iter().any(|r| r.contains(c.position)))
            .count();
        assert_eq!(in_rooms, 12);
        assert_eq!(level.chairs.len() - in_rooms, 7);
    }

    #[test]
    fn doors_start_closed_and_solid() {
        let level = office();
        for door in &level.doors {
            assert!(!door.open);
            assert!(level.collision.is_enabled(door.body));
            assert_eq!(door.texture(), OfficeTexture::DoorClosed);
        }
        assert_eq!(level.doors[0].position, Vec2::new(625.0, 284.0));
        assert_eq!(level.doors[1].position, Vec2::new(200.0, 534.0));
    }

    #[test]
    fn door_tile_matches_its_body_and_faces_the_corridor() {
        let level = office();
        for door in &level.doors {
            let tile = door.aabb();
            assert_eq!((tile.half_w, tile.half_h), (16.0, 16.0));
            assert!(level.collision.overlaps_any(&tile));
            assert_eq!(door.outward, Vec2::Y);
        }
    }

    #[test]
    fn room_chairs_flank_the_table() {
        let level = office();
        assert_eq!(level.chairs[0].position, Vec2::new(575.0, 170.0));
        assert_eq!(level.chairs[5].position, Vec2::new(675.0, 230.0));
        assert_eq!(level.chairs[6].position, Vec2::new(150.0, 420.0));
        assert_eq!(level.chairs[12].position, Vec2::new(100.0, 140.0));
    }

    #[test]
    fn floor_covers_world_grid() {
        let level = office();
        assert_eq!(level.floor.len(), 25 * 19);
        assert_eq!(level.floor[0], Vec2::new(16.0, 16.0));
    }

    #[test]
    fn perimeter_is_one_tile_thick() {
        let level = office();
        let on_edge = |p: &Prop| {
            p.position.x == 16.0
                || p.position.x == 784.0
                || p.position.y == 16.0
                || p.position.y == 592.0
        };
        assert_eq!(level.walls().filter(|p| on_edge(p)).count(), 25 * 2 + 17 * 2);
    }

    #[test]
    fn door_gap_has_no_wall_tile() {
        for room in MEETING_ROOMS {
            let door = room.door_origin();
            let door_box = Aabb::new(door.x + 16.0, door.y + 16.0, 32.0, 32.0);
            for origin in room.wall_origins() {
                let wall = Aabb::new(origin.x + 16.0, origin.y + 16.0, 32.0, 32.0);
                assert!(!wall.overlaps(&door_box), "wall at {origin:?} blocks door");
            }
        }
    }

    #[test]
    fn room_ring_is_closed_apart_from_door() {
        let room = MEETING_ROOMS[0];
        let origins = room.wall_origins();
        // Every corner is covered.
        for corner in [
            Vec2::new(500.0, 100.0),
            Vec2::new(718.0, 100.0),
            Vec2::new(500.0, 268.0),
            Vec2::new(718.0, 268.0),
        ] {
            assert!(origins.contains(&corner), "missing corner {corner:?}");
        }
        // Bottom wall tiles butt up against the door on both sides.
        assert!(origins.contains(&Vec2::new(577.0, 268.0)));
        assert!(origins.contains(&Vec2::new(641.0, 268.0)));
    }

    #[test]
    fn desks_never_collide_but_plants_do() {
        let level = office();
        assert_eq!(level.collision.count_kind(BodyKind::Plant), 6);
        assert_eq!(level.collision.count_kind(BodyKind::Door), 2);
        let desk = Aabb::new(100.0, 100.0, 10.0, 10.0);
        assert!(!level.collision.overlaps_any(&desk));
        let plant = Aabb::new(400.0, 100.0, 10.0, 10.0);
        assert!(level.collision.overlaps_any(&plant));
        let solid_props = level.props.iter().filter(|p| p.solid).count();
        assert_eq!(
            level.collision.bodies().len(),
            solid_props + level.doors.len()
        );
    }

    #[test]
    fn room_tables_are_double_width() {
        let level = office();
        let tables: Vec<&Prop> = level
            .props
            .iter()
            .filter(|p| p.texture == OfficeTexture::Desk && p.scale == Vec2::new(2.0, 1.0))
            .collect();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].size(), Vec2::new(128.0, 32.0));
        assert_eq!(tables[0].position, Vec2::new(625.0, 200.0));
    }

    #[test]
    fn spawn_is_world_center_and_clear() {
        let level = office();
        assert_eq!(level.player_spawn, Vec2::new(400.0, 304.0));
        let body = Aabb::new(400.0, 304.0, 24.0, 24.0);
        assert!(!level.collision.overlaps_any(&body));
    }

    #[test]
    fn tile_span_pulls_last_tile_flush() {
        let xs: Vec<f32> = tile_span(500.0, 609.0).collect();
        assert_eq!(xs, vec![500.0, 532.0, 564.0, 577.0]);
        let xs: Vec<f32> = tile_span(0.0, 96.0).collect();
        assert_eq!(xs, vec![0.0, 32.0, 64.0]);
        assert_eq!(tile_span(10.0, 10.0).count(), 0);
    }
}
