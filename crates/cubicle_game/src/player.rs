use cubicle_core::animation::AnimationState;
use cubicle_core::input::{InputState, Key};
use cubicle_core::office_art::OfficeTexture;
use glam::Vec2;

use crate::animation::WalkAnimations;
use crate::collision::{Aabb, CollisionMoveResult, CollisionWorld};
use crate::level::ChairId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facing {
    Down,
    Up,
    Left,
    Right,
}

impl Facing {
    pub const ALL: [Facing; 4] = [Facing::Down, Facing::Up, Facing::Left, Facing::Right];

    pub fn index(self) -> usize {
        match self {
            Facing::Down => 0,
            Facing::Up => 1,
            Facing::Left => 2,
            Facing::Right => 3,
        }
    }

    /// Unit step in world space (y grows downward).
    pub fn unit(self) -> Vec2 {
        match self {
            Facing::Down => Vec2::Y,
            Facing::Up => Vec2::NEG_Y,
            Facing::Left => Vec2::NEG_X,
            Facing::Right => Vec2::X,
        }
    }

    pub fn texture(self) -> OfficeTexture {
        match self {
            Facing::Down => OfficeTexture::PlayerDown,
            Facing::Up => OfficeTexture::PlayerUp,
            Facing::Left => OfficeTexture::PlayerLeft,
            Facing::Right => OfficeTexture::PlayerRight,
        }
    }

    pub fn walk_clip_name(self) -> &'static str {
        match self {
            Facing::Down => "walk-down",
            Facing::Up => "walk-up",
            Facing::Left => "walk-left",
            Facing::Right => "walk-right",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Facing::Down => "down",
            Facing::Up => "up",
            Facing::Left => "left",
            Facing::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Posture {
    Standing,
    Sitting { chair: ChairId },
}

/// Movement intent for one tick. At most one direction ever wins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerInput {
    pub direction: Option<Facing>,
}

impl PlayerInput {
    /// Left beats right beats up beats down; opposing keys never combine.
    pub fn from_input(input: &InputState) -> Self {
        let direction = [
            (Key::Left, Facing::Left),
            (Key::Right, Facing::Right),
            (Key::Up, Facing::Up),
            (Key::Down, Facing::Down),
        ]
        .into_iter()
        .find(|(key, _)| input.is_held(*key))
        .map(|(_, facing)| facing);
        Self { direction }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContactState {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl ContactState {
    pub fn describe(&self) -> String {
        [
            (self.left, "left"),
            (self.right, "right"),
            (self.up, "up"),
            (self.down, "down"),
        ]
        .iter()
        .filter(|(blocked, _)| *blocked)
        .map(|(_, side)| *side)
        .collect::<Vec<_>>()
        .join(" ")
    }
}

#[derive(Debug, Clone)]
pub struct PlayerController {
    pub aabb: Aabb,
    pub velocity: Vec2,
    pub facing: Facing,
    pub posture: Posture,
    pub contacts: ContactState,
    pub speed: f32,
    animation: Option<AnimationState>,
}

impl PlayerController {
    pub fn new(spawn: Vec2, body: (f32, f32), speed: f32) -> Self {
        Self {
            aabb: Aabb::new(spawn.x, spawn.y, body.0, body.1),
            velocity: Vec2::ZERO,
            facing: Facing::Down,
            posture: Posture::Standing,
            contacts: ContactState::default(),
            speed,
            animation: None,
        }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.aabb.center_x, self.aabb.center_y)
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.aabb.center_x = position.x;
        self.aabb.center_y = position.y;
    }

    pub fn is_sitting(&self) -> bool {
        matches!(self.posture, Posture::Sitting { .. })
    }

    pub fn seat(&self) -> Option<ChairId> {
        match self.posture {
            Posture::Sitting { chair } => Some(chair),
            Posture::Standing => None,
        }
    }

    pub fn animation(&self) -> Option<&AnimationState> {
        self.animation.as_ref()
    }

    /// One fixed step of movement: choose velocity and animation from
    /// `input`, then slide through `collision`.
    pub fn step(
        &mut self,
        input: PlayerInput,
        dt: f32,
        walk: &WalkAnimations,
        collision: &CollisionWorld,
    ) {
        self.steer(input, dt_to_us(dt), walk);
        if self.velocity == Vec2::ZERO {
            self.contacts = ContactState::default();
            return;
        }
        let delta = self.velocity * dt;
        let result = collision.move_and_collide(self.aabb, delta.x, delta.y);
        self.apply_collision_result(result);
    }

    fn steer(&mut self, input: PlayerInput, dt_us: u64, walk: &WalkAnimations) {
        if self.is_sitting() {
            self.velocity = Vec2::ZERO;
            self.animation = None;
            return;
        }

        let Some(direction) = input.direction else {
            self.velocity = Vec2::ZERO;
            self.animation = None;
            return;
        };

        self.facing = direction;
        self.velocity = direction.unit() * self.speed;

        let clip = walk.clip(direction);
        let animation = match self.animation.take() {
            Some(state) if state.is_playing(&clip.name) => state,
            _ => AnimationState::new(&clip.name),
        };
        let animation = self.animation.insert(animation);
        animation.tick(dt_us, clip);
    }

    fn apply_collision_result(&mut self, result: CollisionMoveResult) {
        self.aabb = result.aabb;
        self.contacts = ContactState {
            left: result.blocked_left,
            right: result.blocked_right,
            up: result.blocked_up,
            down: result.blocked_down,
        };

        if (result.blocked_left && self.velocity.x < 0.0)
            || (result.blocked_right && self.velocity.x > 0.0)
        {
            self.velocity.x = 0.0;
        }
        if (result.blocked_up && self.velocity.y < 0.0)
            || (result.blocked_down && self.velocity.y > 0.0)
        {
            self.velocity.y = 0.0;
        }
    }

    /// Texture and draw offset for the current state.
    pub fn sprite(&self, walk: &WalkAnimations) -> (OfficeTexture, Vec2) {
        if self.is_sitting() {
            return (OfficeTexture::PlayerSitting, Vec2::ZERO);
        }
        let base = self.facing.texture();
        let Some(state) = &self.animation else {
            return (base, Vec2::ZERO);
        };
        let clip = walk.clip(self.facing);
        match state.current(clip) {
            Some(frame) => (
                OfficeTexture::from_name(&frame.texture).unwrap_or(base),
                frame.offset,
            ),
            None => (base, Vec2::ZERO),
        }
    }

    pub fn sit(&mut self, chair: ChairId, at: Vec2) {
        self.posture = Posture::Sitting { chair };
        self.velocity = Vec2::ZERO;
        self.animation = None;
        self.set_position(at);
    }

    /// Leaves the chair and steps `drop` units down. Returns the vacated chair.
    pub fn stand(&mut self, drop: f32) -> Option<ChairId> {
        let chair = self.seat();
        self.posture = Posture::Standing;
        let position = self.position() + Vec2::new(0.0, drop);
        self.set_position(position);
        chair
    }
}

fn dt_to_us(dt: f32) -> u64 {
    (f64::from(dt.max(0.0)) * 1_000_000.0).round() as u64
}
