//! Lumen Maze - A rhythm maze arcade game
//!
//! Core modules:
//! - `sim`: Maze generation, beat timing and the game state machine
//! - `renderer`: Rendering sink interface (drawing itself lives in the host)
//! - `platform`: Browser/native platform abstraction
//! - `highscores`: Local leaderboard
//! - `settings`: Persisted player configuration

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use highscores::{HighScores, SubmitError};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Battery at the start of a run (also the cap)
    pub const INITIAL_BATTERY: u32 = 100;
    /// Battery restored when a new level begins
    pub const BATTERY_GAIN_PER_LEVEL: u32 = 25;
    /// Battery drain in %/second at level 1
    pub const BATTERY_DRAIN_BASE: f64 = 1.0;
    /// Extra drain per level
    pub const BATTERY_DRAIN_INCREASE: f64 = 0.3;
    /// Battery lost on a wall or bounds hit at level 1
    pub const WALL_PENALTY_BASE: u32 = 5;
    pub const WALL_PENALTY_INCREASE: u32 = 2;
    /// Moves start costing battery on levels above this one
    pub const MOVE_COST_FREE_LEVELS: u32 = 5;
    /// Every this many moves costs battery
    pub const MOVE_COST_INTERVAL: u32 = 10;
    /// Cost of a charged move is `level / MOVE_COST_LEVEL_DIVISOR`
    pub const MOVE_COST_LEVEL_DIVISOR: u32 = 5;

    /// Tempo when no song supplies one
    pub const INITIAL_BPM: f64 = 120.0;
    pub const BPM_INCREASE_PER_LEVEL: f64 = 15.0;
    /// Accepted range for user-supplied song tempos
    pub const BPM_MIN: f64 = 60.0;
    pub const BPM_MAX: f64 = 300.0;

    /// Minimum spacing between fired beats, as a fraction of a beat
    pub const BEAT_TIMING_TOLERANCE: f64 = 0.8;
    /// Beats without a processed beat before move input is force-unlocked
    pub const BEAT_SAFETY_MULTIPLIER: f64 = 1.5;
    /// How far into a beat the song position must be before the beat fires
    pub const AUDIO_BEAT_FRACTION: f64 = 0.9;

    /// Beat flash length: max(FLASH_DURATION_FACTOR / bpm, MIN_FLASH_DURATION_MS)
    pub const FLASH_DURATION_FACTOR: f64 = 8000.0;
    pub const MIN_FLASH_DURATION_MS: f64 = 50.0;

    /// Light radius gained per streak step, and its cap
    pub const STREAK_BONUS_MULTIPLIER: f32 = 0.3;
    pub const MAX_STREAK_BONUS: f32 = 4.5;

    /// Level-complete bonus weights
    pub const BATTERY_SCORE_WEIGHT: u64 = 100;
    pub const LEVEL_SCORE_WEIGHT: u64 = 1000;

    /// Largest canvas side in pixels; tiles shrink as mazes grow
    pub const MAX_CANVAS_SIZE: u32 = 600;

    /// Leaderboard limits
    pub const MAX_NAME_LEN: usize = 24;
    pub const MAX_SUBMITTED_SCORE: u64 = 20_000;
}
