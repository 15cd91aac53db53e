//! Player settings and preferences
//!
//! Persisted separately from high scores in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::consts::{BPM_MAX, BPM_MIN, INITIAL_BPM, MAX_CANVAS_SIZE, MAX_NAME_LEN};
use crate::platform::storage;
use crate::sim::TimingConfig;

/// Built-in music style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SongStyle {
    Electronic,
    Ambient,
    Intense,
}

/// A bundled song the player can pick instead of uploading one
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleSong {
    pub id: &'static str,
    pub name: &'static str,
    pub bpm: f64,
    pub style: SongStyle,
}

pub const SAMPLE_SONGS: &[SampleSong] = &[
    SampleSong {
        id: "prog-electronic",
        name: "Electronic Pulse",
        bpm: 128.0,
        style: SongStyle::Electronic,
    },
    SampleSong {
        id: "prog-ambient",
        name: "Ambient Flow",
        bpm: 90.0,
        style: SongStyle::Ambient,
    },
    SampleSong {
        id: "prog-intense",
        name: "Intense Rush",
        bpm: 160.0,
        style: SongStyle::Intense,
    },
];

/// Look up a bundled song by id
pub fn sample_song(id: &str) -> Option<&'static SampleSong> {
    SAMPLE_SONGS.iter().find(|s| s.id == id)
}

/// Player settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base tempo for uploaded songs (60-300)
    pub song_bpm: f64,
    /// Selected bundled song, if any
    pub sample_song: Option<String>,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Beat feedback volume (0.0 - 1.0)
    pub beat_volume: f32,
    pub muted: bool,

    // === Display ===
    /// Largest canvas side in pixels
    pub max_canvas_size: u32,

    /// Name pre-filled on the score submission form
    pub player_name: String,

    /// Beat timing factors
    pub timing: TimingConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            song_bpm: INITIAL_BPM,
            sample_song: None,

            master_volume: 0.8,
            beat_volume: 0.3,
            muted: false,

            max_canvas_size: MAX_CANVAS_SIZE,

            player_name: String::new(),

            timing: TimingConfig::default(),
        }
    }
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "lumen_maze_settings";

    /// Set the song tempo; out-of-range or non-finite values fall back to the default
    pub fn set_song_bpm(&mut self, bpm: f64) -> bool {
        if bpm.is_finite() && (BPM_MIN..=BPM_MAX).contains(&bpm) {
            self.song_bpm = bpm;
            true
        } else {
            log::warn!("Ignoring out-of-range BPM {}, using {}", bpm, INITIAL_BPM);
            self.song_bpm = INITIAL_BPM;
            false
        }
    }

    /// Select a bundled song; its tempo becomes the base tempo
    pub fn select_sample_song(&mut self, id: &str) -> Option<&'static SampleSong> {
        let song = sample_song(id)?;
        self.sample_song = Some(song.id.to_string());
        self.song_bpm = song.bpm;
        Some(song)
    }

    /// Remember the last submitted name (trimmed and cut to the leaderboard limit)
    pub fn set_player_name(&mut self, name: &str) {
        self.player_name = name.trim().chars().take(MAX_NAME_LEN).collect();
    }

    /// Effective beat feedback volume (respects mute)
    pub fn effective_beat_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.beat_volume).clamp(0.0, 1.0)
        }
    }

    /// Pixel size of one maze cell on the canvas
    pub fn tile_size(&self, rows: usize, cols: usize) -> u32 {
        let side = rows.max(cols).max(1) as u32;
        self.max_canvas_size / side
    }

    /// Load settings from LocalStorage, falling back to defaults
    pub fn load() -> Self {
        match storage::load_json::<Settings>(Self::STORAGE_KEY) {
            Some(mut settings) => {
                let bpm = settings.song_bpm;
                settings.set_song_bpm(bpm);
                log::info!("Loaded settings from LocalStorage");
                settings
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings to LocalStorage
    pub fn save(&self) {
        if storage::save_json(Self::STORAGE_KEY, self) {
            log::info!("Settings saved");
        }
    }
}
