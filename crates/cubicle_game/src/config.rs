use cubicle_core::office_art::TILE_SIZE;

/// Every tunable of the office scene. There is no config file: the world is
/// rebuilt identically from these values on each run.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub world_width: u32,
    pub world_height: u32,
    pub tile_size: u32,
    /// Units per second along the single chosen axis.
    pub player_speed: f32,
    pub player_body: (f32, f32),
    /// Chairs and doors must be strictly closer than this to interact.
    pub interact_radius: f32,
    /// The player snaps this far above a chair's center when sitting.
    pub sit_offset: f32,
    /// The player moves this far down when standing up.
    pub stand_offset: f32,
    pub walk_frame_rate: u32,
    pub walk_bob_px: f32,
    pub atlas_size: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            world_width: 800,
            world_height: 608,
            tile_size: TILE_SIZE,
            player_speed: 160.0,
            player_body: (24.0, 24.0),
            interact_radius: 40.0,
            sit_offset: 10.0,
            stand_offset: 20.0,
            walk_frame_rate: 8,
            walk_bob_px: 2.0,
            atlas_size: cubicle_core::atlas::DEFAULT_ATLAS_SIZE,
        }
    }
}
