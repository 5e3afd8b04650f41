//! Static AABB bodies and move-and-slide resolution against them.
//!
//! Walls, plants and doors are axis-aligned boxes that never move. Each body
//! can be switched off, which is how an open door stops blocking. The mover
//! resolves X first, then Y using the corrected X, so the player slides along
//! walls instead of sticking to them. The world rectangle is a hard boundary.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center_x: f32,
    pub center_y: f32,
    pub half_w: f32,
    pub half_h: f32,
}

impl Aabb {
    pub fn new(center_x: f32, center_y: f32, width: f32, height: f32) -> Self {
        Self {
            center_x,
            center_y,
            half_w: width / 2.0,
            half_h: height / 2.0,
        }
    }

    pub fn min_x(&self) -> f32 {
        self.center_x - self.half_w
    }

    pub fn max_x(&self) -> f32 {
        self.center_x + self.half_w
    }

    pub fn min_y(&self) -> f32 {
        self.center_y - self.half_h
    }

    pub fn max_y(&self) -> f32 {
        self.center_y + self.half_h
    }

    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min_x() < other.max_x()
            && self.max_x() > other.min_x()
            && self.min_y() < other.max_y()
            && self.max_y() > other.min_y()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Wall,
    Plant,
    Door,
}

#[derive(Debug, Clone, Copy)]
pub struct Body {
    pub aabb: Aabb,
    pub kind: BodyKind,
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct CollisionMoveResult {
    pub aabb: Aabb,
    pub blocked_left: bool,
    pub blocked_right: bool,
    pub blocked_up: bool,
    pub blocked_down: bool,
}

#[derive(Debug, Clone)]
pub struct CollisionWorld {
    pub width: f32,
    pub height: f32,
    bodies: Vec<Body>,
}

const EPS: f32 = 0.001;

impl CollisionWorld {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            bodies: Vec::new(),
        }
    }

    pub fn add_body(&mut self, aabb: Aabb, kind: BodyKind) -> BodyId {
        self.bodies.push(Body {
            aabb,
            kind,
            enabled: true,
        });
        BodyId(self.bodies.len() - 1)
    }

    pub fn set_enabled(&mut self, id: BodyId, enabled: bool) {
        if let Some(body) = self.bodies.get_mut(id.0) {
            body.enabled = enabled;
        }
    }

    #[cfg(test)]
    pub fn is_enabled(&self, id: BodyId) -> bool {
        self.bodies.get(id.0).is_some_and(|b| b.enabled)
    }

    #[cfg(test)]
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn enabled_bodies(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter().filter(|b| b.enabled)
    }

    #[cfg(test)]
    pub fn count_kind(&self, kind: BodyKind) -> usize {
        self.bodies.iter().filter(|b| b.kind == kind).count()
    }

    /// True when `aabb` intersects any enabled body.
    pub fn overlaps_any(&self, aabb: &Aabb) -> bool {
        self.enabled_bodies().any(|b| b.aabb.overlaps(aabb))
    }

    pub fn move_and_collide(&self, aabb: Aabb, dx: f32, dy: f32) -> CollisionMoveResult {
        const MATCH_EPS: f32 = 0.0001;

        let resolved_x = self.resolve_axis_x(aabb, dx);
        let collided_x = (resolved_x - (aabb.center_x + dx)).abs() > MATCH_EPS;

        let mut moved = aabb;
        moved.center_x = resolved_x;
        let resolved_y = self.resolve_axis_y(moved, dy);
        let collided_y = (resolved_y - (aabb.center_y + dy)).abs() > MATCH_EPS;
        moved.center_y = resolved_y;

        // y grows downward.
        CollisionMoveResult {
            aabb: moved,
            blocked_left: collided_x && dx < 0.0,
            blocked_right: collided_x && dx > 0.0,
            blocked_up: collided_y && dy < 0.0,
            blocked_down: collided_y && dy > 0.0,
        }
    }

    // Bodies the mover already overlaps are skipped so it can always walk out.
    fn resolve_axis_x(&self, aabb: Aabb, dx: f32) -> f32 {
        if dx == 0.0 {
            return aabb.center_x;
        }

        let mut candidate_x = aabb.center_x + dx;
        let in_row = |b: &&Body| {
            b.aabb.min_y() < aabb.max_y() - EPS && b.aabb.max_y() > aabb.min_y() + EPS
        };

        if dx > 0.0 {
            for body in self.enabled_bodies().filter(in_row) {
                if body.aabb.min_x() >= aabb.max_x() - EPS
                    && candidate_x + aabb.half_w > body.aabb.min_x()
                {
                    candidate_x = candidate_x.min(body.aabb.min_x() - aabb.half_w);
                }
            }
            candidate_x = candidate_x.min(self.width - aabb.half_w);
            // Guardrail: never push opposite direction during resolution.
            candidate_x = candidate_x.max(aabb.center_x);
        } else {
            for body in self.enabled_bodies().filter(in_row) {
                if body.aabb.max_x() <= aabb.min_x() + EPS
                    && candidate_x - aabb.half_w < body.aabb.max_x()
                {
                    candidate_x = candidate_x.max(body.aabb.max_x() + aabb.half_w);
                }
            }
            candidate_x = candidate_x.max(aabb.half_w);
            candidate_x = candidate_x.min(aabb.center_x);
        }

        candidate_x
    }

    fn resolve_axis_y(&self, aabb: Aabb, dy: f32) -> f32 {
        if dy == 0.0 {
            return aabb.center_y;
        }

        let mut candidate_y = aabb.center_y + dy;
        let in_column = |b: &&Body| {
            b.aabb.min_x() < aabb.max_x() - EPS && b.aabb.max_x() > aabb.min_x() + EPS
        };

        if dy > 0.0 {
            for body in self.enabled_bodies().filter(in_column) {
                if body.aabb.min_y() >= aabb.max_y() - EPS
                    && candidate_y + aabb.half_h > body.aabb.min_y()
                {
                    candidate_y = candidate_y.min(body.aabb.min_y() - aabb.half_h);
                }
            }
            candidate_y = candidate_y.min(self.height - aabb.half_h);
            candidate_y = candidate_y.max(aabb.center_y);
        } else {
            for body in self.enabled_bodies().filter(in_column) {
                if body.aabb.max_y() <= aabb.min_y() + EPS
                    && candidate_y - aabb.half_h < body.aabb.max_y()
                {
                    candidate_y = candidate_y.max(body.aabb.max_y() + aabb.half_h);
                }
            }
            candidate_y = candidate_y.max(aabb.half_h);
            candidate_y = candidate_y.min(aabb.center_y);
        }

        candidate_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(center_x: f32, center_y: f32) -> Aabb {
        Aabb::new(center_x, center_y, 32.0, 32.0)
    }

    fn player_at(x: f32, y: f32) -> Aabb {
        Aabb::new(x, y, 24.0, 24.0)
    }

    #[test]
    fn free_move_is_unchanged() {
        let world = CollisionWorld::new(800.0, 608.0);
        let result = world.move_and_collide(player_at(100.0, 100.0), 5.0, -3.0);
        assert_eq!(result.aabb.center_x, 105.0);
        assert_eq!(result.aabb.center_y, 97.0);
        assert!(!result.blocked_left && !result.blocked_right);
        assert!(!result.blocked_up && !result.blocked_down);
    }

    #[test]
    fn moving_right_stops_flush_against_wall() {
        let mut world = CollisionWorld::new(800.0, 608.0);
        world.add_body(tile(150.0, 100.0), BodyKind::Wall);
        // Wall spans x 134..166, player right edge starts at 124.
        let result = world.move_and_collide(player_at(112.0, 100.0), 20.0, 0.0);
        assert_eq!(result.aabb.center_x, 122.0);
        assert!(result.blocked_right);
    }

    #[test]
    fn moving_down_is_blocked_with_y_down_flags() {
        let mut world = CollisionWorld::new(800.0, 608.0);
        world.add_body(tile(100.0, 150.0), BodyKind::Plant);
        let result = world.move_and_collide(player_at(100.0, 110.0), 0.0, 20.0);
        assert_eq!(result.aabb.center_y, 122.0);
        assert!(result.blocked_down);
        assert!(!result.blocked_up);
    }

    #[test]
    fn slides_along_wall_on_diagonal() {
        let mut world = CollisionWorld::new(800.0, 608.0);
        world.add_body(tile(150.0, 100.0), BodyKind::Wall);
        let result = world.move_and_collide(player_at(122.0, 100.0), 4.0, 4.0);
        assert_eq!(result.aabb.center_x, 122.0);
        assert_eq!(result.aabb.center_y, 104.0);
        assert!(result.blocked_right);
    }

    #[test]
    fn disabled_body_is_passable() {
        let mut world = CollisionWorld::new(800.0, 608.0);
        let door = world.add_body(tile(150.0, 100.0), BodyKind::Door);
        world.set_enabled(door, false);
        assert!(!world.is_enabled(door));
        let result = world.move_and_collide(player_at(112.0, 100.0), 40.0, 0.0);
        assert_eq!(result.aabb.center_x, 152.0);
        assert!(!result.blocked_right);

        world.set_enabled(door, true);
        assert!(world.is_enabled(door));
    }

    #[test]
    fn world_bounds_clamp_movement() {
        let world = CollisionWorld::new(800.0, 608.0);
        let result = world.move_and_collide(player_at(14.0, 14.0), -10.0, -10.0);
        assert_eq!(result.aabb.center_x, 12.0);
        assert_eq!(result.aabb.center_y, 12.0);
        assert!(result.blocked_left);
        assert!(result.blocked_up);

        let result = world.move_and_collide(player_at(786.0, 594.0), 10.0, 10.0);
        assert_eq!(result.aabb.center_x, 788.0);
        assert_eq!(result.aabb.center_y, 596.0);
        assert!(result.blocked_right && result.blocked_down);
    }

    #[test]
    fn overlapping_body_does_not_trap_mover() {
        let mut world = CollisionWorld::new(800.0, 608.0);
        world.add_body(tile(100.0, 100.0), BodyKind::Wall);
        let start = player_at(105.0, 100.0);
        assert!(world.overlaps_any(&start));
        let result = world.move_and_collide(start, 30.0, 0.0);
        assert_eq!(result.aabb.center_x, 135.0);
    }

    #[test]
    fn body_outside_row_does_not_block() {
        let mut world = CollisionWorld::new(800.0, 608.0);
        // Directly touching above the player's top edge only.
        world.add_body(tile(150.0, 72.0), BodyKind::Wall);
        let result = world.move_and_collide(player_at(112.0, 100.0), 40.0, 0.0);
        assert_eq!(result.aabb.center_x, 152.0);
    }

    #[test]
    fn count_kind_tallies_bodies() {
        let mut world = CollisionWorld::new(800.0, 608.0);
        world.add_body(tile(16.0, 16.0), BodyKind::Wall);
        world.add_body(tile(48.0, 16.0), BodyKind::Wall);
        world.add_body(tile(80.0, 80.0), BodyKind::Door);
        assert_eq!(world.count_kind(BodyKind::Wall), 2);
        assert_eq!(world.count_kind(BodyKind::Door), 1);
        assert_eq!(world.enabled_bodies().count(), 3);
    }
}
