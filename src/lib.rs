//! Pyramid Builder - a one-tap block stacking game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (motion, commit/clip, scoring, phases)
//! - `tuning`: Data-driven game balance
//! - `highscores`: Best score and leaderboard bookkeeping
//! - `persistence`: Local score storage backends
//! - `remote`: Best-effort remote best-score sync
//! - `platform`: Browser/native platform abstraction
//! - `web`: JS-facing bindings (wasm32 only)

pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod remote;
pub mod settings;
pub mod sim;
pub mod tuning;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use highscores::{HighScores, ScoreKeeper};
pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Axis extent. Positions and widths are percentages of it.
    pub const AXIS_MIN: f32 = 0.0;
    pub const AXIS_MAX: f32 = 100.0;

    /// Base block and first moving block
    pub const INITIAL_WIDTH: f32 = 60.0;
    pub const BASE_CENTER: f32 = 50.0;

    /// Moving block speed in percent per tick
    pub const INITIAL_SPEED: f32 = 0.8;
    pub const SPEED_INCREMENT: f32 = 0.05;
    /// Scales SPEED_INCREMENT into the per-point speed step
    pub const SPEED_STEP_SCALE: f32 = 0.002;
    pub const MAX_SPEED: f32 = 2.5;

    /// Max offset (percent) still counted as a perfect drop
    pub const TOLERANCE: f32 = 3.0;

    /// Every Nth block is an artifact
    pub const ARTIFACT_INTERVAL: u32 = 5;
    /// Width gained on a perfect artifact drop
    pub const ARTIFACT_BONUS_WIDTH: f32 = 5.0;

    /// Nominal frame rate the tick-based lifetimes are expressed against
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Stack height before the camera starts following the top
    pub const CAMERA_FOLLOW_AFTER: usize = 4;
}

/// Half of a width, i.e. the distance from a block's center to its edge
#[inline]
pub fn half(width: f32) -> f32 {
    width / 2.0
}
