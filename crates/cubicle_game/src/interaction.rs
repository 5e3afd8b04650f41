//! Sit/stand and door toggling, resolved once per interact-key press.

use glam::Vec2;

use crate::config::GameConfig;
use crate::level::{ChairId, DoorId, Level};
use crate::player::PlayerController;

pub const DEFAULT_HELP_TEXT: &str =
    "Use arrow keys to move. Press SPACE to interact with doors and chairs.";
pub const SEATED_HELP_TEXT: &str = "Press SPACE to stand up";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    SatDown(ChairId),
    StoodUp(ChairId),
    DoorToggled { door: DoorId, open: bool },
    /// The player stands in the doorway and cannot step out of it.
    DoorBlocked(DoorId),
    Nothing,
}

pub fn help_text(sitting: bool) -> &'static str {
    if sitting {
        SEATED_HELP_TEXT
    } else {
        DEFAULT_HELP_TEXT
    }
}

/// First chair in list order strictly inside `radius`.
pub fn chair_in_reach(level: &Level, at: Vec2, radius: f32) -> Option<ChairId> {
    level
        .chairs
        .iter()
        .position(|chair| chair.position.distance(at) < radius)
        .map(ChairId)
}

/// First door in list order strictly inside `radius`.
pub fn door_in_reach(level: &Level, at: Vec2, radius: f32) -> Option<DoorId> {
    level
        .doors
        .iter()
        .position(|door| door.position.distance(at) < radius)
        .map(DoorId)
}

/// Resolves one interact press. Standing up always succeeds; otherwise a chair
/// in reach wins over any door.
pub fn interact(player: &mut PlayerController, level: &mut Level, config: &GameConfig) -> Interaction {
    let outcome = if player.is_sitting() {
        match player.stand(config.stand_offset) {
            Some(chair) => Interaction::StoodUp(chair),
            None => Interaction::Nothing,
        }
    } else {
        let at = player.position();
        if let Some(chair) = chair_in_reach(level, at, config.interact_radius) {
            let seat = level.chairs[chair.0].position - Vec2::new(0.0, config.sit_offset);
            player.sit(chair, seat);
            Interaction::SatDown(chair)
        } else if let Some(door) = door_in_reach(level, at, config.interact_radius) {
            let closing = level.doors[door.0].open;
            if closing && !clear_doorway(level, door, player) {
                Interaction::DoorBlocked(door)
            } else {
                let open = toggle_door(level, door);
                Interaction::DoorToggled { door, open }
            }
        } else {
            Interaction::Nothing
        }
    };

    match outcome {
        Interaction::SatDown(chair) => log::info!("Sat down on chair {}", chair.0),
        Interaction::StoodUp(chair) => log::info!("Stood up from chair {}", chair.0),
        Interaction::DoorToggled { door, open } => {
            log::info!("Door {} is now {}", door.0, if open { "open" } else { "closed" })
        }
        Interaction::DoorBlocked(door) => log::info!("Door {} is blocked by the player", door.0),
        Interaction::Nothing => log::debug!("Nothing to interact with"),
    }
    outcome
}

/// Flips a door and keeps its collision body in step: solid exactly when closed.
pub fn toggle_door(level: &mut Level, id: DoorId) -> bool {
    let Some(door) = level.doors.get_mut(id.0) else {
        return false;
    };
    door.open = !door.open;
    let (body, open) = (door.body, door.open);
    level.collision.set_enabled(body, !open);
    open
}

/// A player standing in a door's tile steps out through its outward side
/// before it closes. Fails, leaving the player put, when that spot is blocked.
fn clear_doorway(level: &Level, id: DoorId, player: &mut PlayerController) -> bool {
    let Some(door) = level.doors.get(id.0) else {
        return false;
    };
    let tile = door.aabb();
    if !player.aabb.overlaps(&tile) {
        return true;
    }

    let mut exit = player.aabb;
    if door.outward.x != 0.0 {
        exit.center_x = tile.center_x + door.outward.x.signum() * (tile.half_w + exit.half_w);
    }
    if door.outward.y != 0.0 {
        exit.center_y = tile.center_y + door.outward.y.signum() * (tile.half_h + exit.half_h);
    }

    let world = &level.collision;
    let in_bounds = exit.min_x() >= 0.0
        && exit.min_y() >= 0.0
        && exit.max_x() <= world.width
        && exit.max_y() <= world.height;
    // The open door's own body is disabled, so only other solids count.
    if !in_bounds || world.overlaps_any(&exit) {
        return false;
    }
    player.aabb = exit;
    true
}
