//! Frame-based sprite animation types and deterministic tick logic.
//!
//! A clip is a sequence of frames, each naming a texture plus a pixel offset
//! applied when the frame is drawn. All timing uses integer microseconds so
//! playback advances identically under the fixed timestep.

use glam::Vec2;

/// A single frame in an animation clip.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationFrame {
    pub texture: String,
    pub offset: Vec2,
    pub duration_us: u64,
}

/// A named sequence of frames that can loop or play once.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    pub name: String,
    pub frames: Vec<AnimationFrame>,
    pub looping: bool,
}

/// Duration of one frame at `frame_rate` frames per second.
pub fn frame_duration_us(frame_rate: u32) -> u64 {
    1_000_000 / u64::from(frame_rate.max(1))
}

impl AnimationClip {
    /// Builds a clip where every frame lasts `1 / frame_rate` seconds.
    pub fn at_frame_rate(
        name: &str,
        frames: impl IntoIterator<Item = (String, Vec2)>,
        frame_rate: u32,
        looping: bool,
    ) -> Self {
        let duration_us = frame_duration_us(frame_rate);
        Self {
            name: name.to_string(),
            frames: frames
                .into_iter()
                .map(|(texture, offset)| AnimationFrame {
                    texture,
                    offset,
                    duration_us,
                })
                .collect(),
            looping,
        }
    }

    /// Total duration of one full cycle in microseconds.
    pub fn total_duration_us(&self) -> u64 {
        self.frames.iter().map(|f| f.duration_us).sum()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.frames.is_empty() {
            return Err(format!("Animation clip '{}' has no frames", self.name));
        }
        for (i, frame) in self.frames.iter().enumerate() {
            if frame.texture.is_empty() {
                return Err(format!(
                    "Animation clip '{}' frame {} has an empty texture name",
                    self.name, i
                ));
            }
            if frame.duration_us == 0 {
                return Err(format!(
                    "Animation clip '{}' frame {} has zero duration",
                    self.name, i
                ));
            }
        }
        Ok(())
    }
}

/// Runtime state for one playing clip.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationState {
    pub clip_name: String,
    pub frame_index: usize,
    pub elapsed_us: u64,
    pub finished: bool,
}

impl AnimationState {
    pub fn new(clip_name: &str) -> Self {
        Self {
            clip_name: clip_name.to_string(),
            frame_index: 0,
            elapsed_us: 0,
            finished: false,
        }
    }

    pub fn is_playing(&self, clip_name: &str) -> bool {
        self.clip_name == clip_name && !self.finished
    }

    /// The frame currently shown, without advancing time.
    pub fn current<'a>(&self, clip: &'a AnimationClip) -> Option<&'a AnimationFrame> {
        clip.frames
            .get(self.frame_index)
            .or_else(|| clip.frames.last())
    }

    /// Advance by `dt_us` microseconds and return the frame now showing.
    pub fn tick<'a>(&mut self, dt_us: u64, clip: &'a AnimationClip) -> Option<&'a AnimationFrame> {
        if clip.frames.is_empty() || self.finished {
            return self.current(clip);
        }

        self.elapsed_us += dt_us;

        loop {
            let current_frame = &clip.frames[self.frame_index];
            if current_frame.duration_us == 0 || self.elapsed_us < current_frame.duration_us {
                break;
            }

            self.elapsed_us -= current_frame.duration_us;
            self.frame_index += 1;

            if self.frame_index >= clip.frames.len() {
                if clip.looping {
                    self.frame_index = 0;
                } else {
                    self.frame_index = clip.frames.len() - 1;
                    self.elapsed_us = 0;
                    self.finished = true;
                    break;
                }
            }
        }

        clip.frames.get(self.frame_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_clip(durations_ms: &[u64], looping: bool) -> AnimationClip {
        AnimationClip {
            name: "test".to_string(),
            frames: durations_ms
                .iter()
                .enumerate()
                .map(|(i, &d)| AnimationFrame {
                    texture: format!("sprite_{}", i),
                    offset: Vec2::ZERO,
                    duration_us: d * 1000,
                })
                .collect(),
            looping,
        }
    }

    fn texture_after(state: &mut AnimationState, dt_us: u64, clip: &AnimationClip) -> String {
        state
            .tick(dt_us, clip)
            .map(|f| f.texture.clone())
            .unwrap_or_default()
    }

    #[test]
    fn tick_advances_through_frames() {
        let clip = make_clip(&[100, 100, 100], true);
        let mut state = AnimationState::new("walk");

        assert_eq!(texture_after(&mut state, 0, &clip), "sprite_0");
        assert_eq!(texture_after(&mut state, 50_000, &clip), "sprite_0");
        assert_eq!(texture_after(&mut state, 60_000, &clip), "sprite_1");
    }

    #[test]
    fn looping_wraps_around() {
        let clip = make_clip(&[100, 100], true);
        let mut state = AnimationState::new("walk");

        assert_eq!(texture_after(&mut state, 250_000, &clip), "sprite_0");
        assert!(!state.finished);
    }

    #[test]
    fn non_looping_stops_on_last_frame() {
        let clip = make_clip(&[100, 100], false);
        let mut state = AnimationState::new("once");

        assert_eq!(texture_after(&mut state, 300_000, &clip), "sprite_1");
        assert!(state.finished);
        assert_eq!(texture_after(&mut state, 100_000, &clip), "sprite_1");
        assert!(!state.is_playing("once"));
    }

    #[test]
    fn variable_frame_durations() {
        let clip = make_clip(&[50, 200, 100], true);
        let mut state = AnimationState::new("mixed");

        assert_eq!(texture_after(&mut state, 50_000, &clip), "sprite_1");
        assert_eq!(texture_after(&mut state, 150_000, &clip), "sprite_1");
        assert_eq!(texture_after(&mut state, 50_000, &clip), "sprite_2");
    }

    #[test]
    fn determinism_identical_results() {
        let clip = make_clip(&[100, 150, 80], true);
        let dt = 16_667u64;

        let mut state_a = AnimationState::new("run");
        let mut state_b = AnimationState::new("run");

        for _ in 0..100 {
            let a = state_a.tick(dt, &clip).cloned();
            let b = state_b.tick(dt, &clip).cloned();
            assert_eq!(a, b);
        }
        assert_eq!(state_a.frame_index, state_b.frame_index);
        assert_eq!(state_a.elapsed_us, state_b.elapsed_us);
    }

    #[test]
    fn at_frame_rate_spaces_frames_evenly() {
        let clip = AnimationClip::at_frame_rate(
            "bob",
            [
                ("a".to_string(), Vec2::ZERO),
                ("a".to_string(), Vec2::new(0.0, 2.0)),
            ],
            8,
            true,
        );
        assert_eq!(clip.frames.len(), 2);
        assert!(clip.frames.iter().all(|f| f.duration_us == 125_000));
        assert_eq!(clip.total_duration_us(), 250_000);
        assert!(clip.validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_and_zero_duration() {
        let empty = make_clip(&[], true);
        assert!(empty.validate().unwrap_err().contains("no frames"));

        let zero = make_clip(&[100, 0], true);
        assert!(zero.validate().unwrap_err().contains("zero duration"));
    }

    #[test]
    fn empty_clip_tick_returns_none() {
        let clip = make_clip(&[], true);
        let mut state = AnimationState::new("none");
        assert!(state.tick(10_000, &clip).is_none());
    }
}
