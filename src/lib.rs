//! River Raid - a side-scrolling shooter for the browser
//!
//! Core modules:
//! - `sim`: Deterministic gameplay simulation (spawning, difficulty, collisions)
//! - `screens`: Preload / Play / Win / Game-Over lifecycle
//! - `highscore`: Single high-score value in LocalStorage
//! - `settings`: Audio/HUD preferences
//! - `audio`: Procedural Web Audio sound effects
//! - `view`: Per-frame sprite snapshot handed to the embedding page's renderer

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod highscore;
pub mod screens;
pub mod settings;
pub mod sim;
pub mod view;

pub use highscore::HighScore;
pub use screens::{RunOutcome, RunSummary, Screen};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Logical frame rate the simulation is stepped at
    pub const FRAME_HZ: u32 = 60;
    /// Duration of one simulation frame in seconds
    pub const FRAME_DT: f32 = 1.0 / FRAME_HZ as f32;

    /// World dimensions
    pub const GAME_WIDTH: f32 = 1024.0;
    pub const GAME_HEIGHT: f32 = 768.0;

    /// Player plane sprite size
    pub const PLANE_WIDTH: f32 = 64.0;
    pub const PLANE_HEIGHT: f32 = 59.0;
    /// Lateral velocity while a directional key is held (pixels/second)
    pub const PLANE_LATERAL_SPEED: f32 = 300.0;

    /// Forward scroll speed bounds (pixels per frame)
    pub const BASE_SCROLL_SPEED: f32 = 5.0;
    pub const MAX_SCROLL_SPEED: f32 = 15.0;
    /// Override while the brake key is held
    pub const BRAKE_SCROLL_SPEED: f32 = 3.0;
    /// Key-hold counter increment per frame while accelerating
    pub const KEY_HOLD_STEP: u32 = 10;

    /// Bullet sprite size and flight time to the top of the screen
    pub const BULLET_WIDTH: f32 = 8.0;
    pub const BULLET_HEIGHT: f32 = 16.0;
    pub const BULLET_FLIGHT_MS: u32 = 400;

    /// Score awarded per destroyed enemy / per frame survived
    pub const KILL_SCORE: u32 = 10;
    pub const FRAME_SCORE: u32 = 1;

    /// River wall tiling
    pub const WALL_TILE: f32 = 256.0;
    /// Extra distance past the last wall tile before the finish counts
    pub const FINISH_MARGIN: f32 = 120.0;

    /// Enemies are removed once they scroll past this line
    pub const ENEMY_CULL_Y: f32 = GAME_HEIGHT - 29.0;

    /// Spawn lanes: in-bounds for ground/sea kinds, off-screen for airplanes
    pub const GROUND_LANE_INSET: f32 = 256.0;
    pub const AIR_LANE_OFFSET: f32 = 256.0;
    /// Airplane traversal start delay upper bound (ms)
    pub const AIRPLANE_MAX_DELAY_MS: u32 = 1000;

    /// Scene freeze after the plane resets following an explosion
    pub const RESET_FREEZE_MS: u32 = 500;

    /// One-shot explosion animation lengths (spritesheet frames / frame rate)
    pub const PLANE_EXPLODE_MS: u32 = 100;
    pub const HELICOPTER_EXPLODE_MS: u32 = 200;
    pub const BATTLESHIP_EXPLODE_MS: u32 = 400;
    pub const AIRPLANE_EXPLODE_MS: u32 = 400;
}

/// Convert a wall-clock duration in milliseconds to simulation frames
#[inline]
pub fn ms_to_ticks(ms: u32) -> u32 {
    (ms * consts::FRAME_HZ).div_ceil(1000)
}

/// Linear interpolation, `t` clamped to [0, 1]
#[inline]
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t.clamp(0.0, 1.0)
}
