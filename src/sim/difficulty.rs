//! Level progression: maze size, tempo, drain and light by level number

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// How a size rule derives the maze side length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideRule {
    Fixed(usize),
    /// `min(cap, base + level / 2)`
    Growing { base: usize, cap: usize },
}

/// Maze size applied to every level up to and including `max_level`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeRule {
    pub max_level: u32,
    pub side: SideRule,
}

/// Ordered maze size progression; the first matching rule wins
pub const MAZE_SIZE_RULES: &[SizeRule] = &[
    SizeRule {
        max_level: 3,
        side: SideRule::Fixed(15),
    },
    SizeRule {
        max_level: 6,
        side: SideRule::Fixed(18),
    },
    SizeRule {
        max_level: 10,
        side: SideRule::Fixed(20),
    },
    SizeRule {
        max_level: u32::MAX,
        side: SideRule::Growing { base: 15, cap: 25 },
    },
];

/// Side length of the (square) maze for a level
pub fn maze_side_for_level(level: u32) -> usize {
    MAZE_SIZE_RULES
        .iter()
        .find(|rule| level <= rule.max_level)
        .map(|rule| match rule.side {
            SideRule::Fixed(side) => side,
            SideRule::Growing { base, cap } => cap.min(base + (level / 2) as usize),
        })
        .unwrap_or(15)
}

/// Light radius (in cells) before any streak bonus
pub fn base_light_radius(level: u32) -> f32 {
    match level {
        0..=3 => 2.5,
        4..=6 => 2.0,
        7..=10 => 1.8,
        11..=15 => 1.5,
        _ => 1.2,
    }
}

/// Battery a level starts with, given the battery left from the previous one
pub fn level_start_battery(level: u32, previous: u32) -> u32 {
    if level <= 1 {
        INITIAL_BATTERY
    } else {
        (previous + BATTERY_GAIN_PER_LEVEL).min(INITIAL_BATTERY)
    }
}

/// Length of the on-beat flash for renderers
pub fn flash_duration_ms(bpm: f64) -> f64 {
    (FLASH_DURATION_FACTOR / bpm).max(MIN_FLASH_DURATION_MS)
}

/// Per-level tuning, fixed for the duration of a level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelParameters {
    pub rows: usize,
    pub cols: usize,
    pub bpm: f64,
    /// Battery percent lost per second
    pub battery_drain_rate: f64,
    /// Battery lost per failed move
    pub wall_penalty: u32,
    pub base_light_radius: f32,
}

impl LevelParameters {
    /// Parameters for `level` when the music's base tempo is `base_bpm`
    pub fn for_level(level: u32, base_bpm: f64) -> Self {
        let level = level.max(1);
        let steps = level - 1;
        let side = maze_side_for_level(level);
        Self {
            rows: side,
            cols: side,
            bpm: base_bpm + steps as f64 * BPM_INCREASE_PER_LEVEL,
            battery_drain_rate: BATTERY_DRAIN_BASE + steps as f64 * BATTERY_DRAIN_INCREASE,
            wall_penalty: WALL_PENALTY_BASE + steps * WALL_PENALTY_INCREASE,
            base_light_radius: base_light_radius(level),
        }
    }

    /// Milliseconds per beat
    #[inline]
    pub fn beat_length_ms(&self) -> f64 {
        60_000.0 / self.bpm
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maze_sizes() {
        assert_eq!(maze_side_for_level(1), 15);
        assert_eq!(maze_side_for_level(3), 15);
        assert_eq!(maze_side_for_level(4), 18);
        assert_eq!(maze_side_for_level(6), 18);
        assert_eq!(maze_side_for_level(7), 20);
        assert_eq!(maze_side_for_level(10), 20);
        assert_eq!(maze_side_for_level(11), 20);
        assert_eq!(maze_side_for_level(12), 21);
        assert_eq!(maze_side_for_level(20), 25);
        assert_eq!(maze_side_for_level(99), 25);
    }

    #[test]
    fn test_level_six_parameters() {
        let params = LevelParameters::for_level(6, INITIAL_BPM);
        assert_eq!(params.rows, 18);
        assert_eq!(params.cols, 18);
        assert!((params.bpm - (INITIAL_BPM + 75.0)).abs() < 1e-9);
        assert_eq!(params.wall_penalty, 15);
        assert!((params.battery_drain_rate - 2.5).abs() < 1e-9);
        assert_eq!(params.base_light_radius, 2.0);
    }

    #[test]
    fn test_song_base_bpm() {
        let params = LevelParameters::for_level(3, 90.0);
        assert!((params.bpm - 120.0).abs() < 1e-9);
        assert!((params.beat_length_ms() - 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_light_radius_tiers() {
        assert_eq!(base_light_radius(1), 2.5);
        assert_eq!(base_light_radius(5), 2.0);
        assert_eq!(base_light_radius(8), 1.8);
        assert_eq!(base_light_radius(15), 1.5);
        assert_eq!(base_light_radius(16), 1.2);
    }

    #[test]
    fn test_level_start_battery() {
        assert_eq!(level_start_battery(1, 3), 100);
        assert_eq!(level_start_battery(2, 40), 65);
        assert_eq!(level_start_battery(5, 90), 100);
        assert_eq!(level_start_battery(3, 0), 25);
    }

    #[test]
    fn test_flash_duration() {
        assert!((flash_duration_ms(120.0) - 66.666).abs() < 0.01);
        assert_eq!(flash_duration_ms(300.0), 50.0);
    }
}
