//! Simulation module
//!
//! All gameplay logic lives here. This module must stay host-independent:
//! - Time is passed in as milliseconds, never read from a clock
//! - Seeded RNG only
//! - No rendering, audio or platform dependencies

pub mod beat;
pub mod difficulty;
pub mod input;
pub mod maze;
pub mod state;
pub mod tick;

pub use beat::{BeatClock, PlaybackSignal, TimingConfig};
pub use difficulty::{LevelParameters, flash_duration_ms, level_start_battery, maze_side_for_level};
pub use input::{MoveOutcome, attempt_move};
pub use maze::{Direction, Maze, MazeCell, Position, can_move, generate_exit, generate_maze};
pub use state::{BeatOutcome, GameEvent, GamePhase, GameSnapshot, GameState};
pub use tick::{FrameReport, TickInput, tick};
