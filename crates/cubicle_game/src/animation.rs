//! Walk cycles for the four facings.
//!
//! Each clip bobs the facing's base texture: rest, +bob, rest, -bob along the
//! axis of travel. There is no idle or sitting clip; those show a still texture.

use cubicle_core::animation::AnimationClip;
use glam::Vec2;

use crate::player::Facing;

pub struct WalkAnimations {
    // Indexed by `Facing::index()`.
    clips: [AnimationClip; 4],
}

impl WalkAnimations {
    pub fn clip(&self, facing: Facing) -> &AnimationClip {
        &self.clips[facing.index()]
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = (Facing, &AnimationClip)> {
        Facing::ALL.into_iter().map(move |f| (f, self.clip(f)))
    }
}

pub fn build_walk_animations(frame_rate: u32, bob_px: f32) -> Result<WalkAnimations, String> {
    let clips = Facing::ALL.map(|facing| {
        let axis = match facing {
            Facing::Up | Facing::Down => Vec2::Y,
            Facing::Left | Facing::Right => Vec2::X,
        };
        let base = facing.texture().name().to_string();
        let frames = [0.0, bob_px, 0.0, -bob_px].map(|amount| (base.clone(), axis * amount));
        AnimationClip::at_frame_rate(facing.walk_clip_name(), frames, frame_rate, true)
    });
    for clip in &clips {
        clip.validate()?;
    }
    Ok(WalkAnimations { clips })
}
