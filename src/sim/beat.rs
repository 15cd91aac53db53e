//! Beat clock
//!
//! Decides, once per frame, whether a beat boundary was crossed. Beats come
//! from the song position when music is playing normally, otherwise from
//! wall-clock time since the level started. All times are milliseconds on the
//! host's monotonic clock.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Tunable timing factors
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Minimum spacing between fired beats, in beats
    pub tolerance: f64,
    /// Beats since the last fired beat before move input is force-unlocked
    pub safety_multiplier: f64,
    /// Fraction of a beat the song must reach before that beat fires
    pub audio_fire_fraction: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tolerance: BEAT_TIMING_TOLERANCE,
            safety_multiplier: BEAT_SAFETY_MULTIPLIER,
            audio_fire_fraction: AUDIO_BEAT_FRACTION,
        }
    }
}

/// Per-frame view of the music track
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlaybackSignal {
    pub position_seconds: f64,
    pub is_playing: bool,
    pub is_buffered: bool,
    pub playback_rate: f64,
}

impl PlaybackSignal {
    /// Only unpaused, buffered, 1.0x playback can drive beats
    pub fn drives_beats(&self) -> bool {
        self.is_playing && self.is_buffered && (self.playback_rate - 1.0).abs() < f64::EPSILON
    }
}

/// Beat timing anchors for the current level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeatClock {
    pub bpm: f64,
    /// When the last beat fired
    pub last_beat_ms: f64,
    /// When the level started (shifted forward across pauses)
    pub level_start_ms: f64,
    /// Wall-clock beat index last fired in fallback mode
    pub expected_beat_index: u64,
    /// Beats fired this level
    pub beat_counter: u64,
    pub config: TimingConfig,
}

impl BeatClock {
    pub fn new(bpm: f64, now_ms: f64, config: TimingConfig) -> Self {
        Self {
            bpm,
            last_beat_ms: now_ms,
            level_start_ms: now_ms,
            expected_beat_index: 0,
            beat_counter: 0,
            config,
        }
    }

    #[inline]
    pub fn beat_length_ms(&self) -> f64 {
        60_000.0 / self.bpm
    }

    /// Restart counting from `now_ms` at a new tempo
    pub fn reset(&mut self, bpm: f64, now_ms: f64) {
        self.bpm = bpm;
        self.last_beat_ms = now_ms;
        self.level_start_ms = now_ms;
        self.expected_beat_index = 0;
        self.beat_counter = 0;
    }

    /// Move both anchors forward so a pause does not count as elapsed time
    pub fn shift(&mut self, delta_ms: f64) {
        self.last_beat_ms += delta_ms;
        self.level_start_ms += delta_ms;
    }

    /// Milliseconds of level time, pauses excluded
    pub fn elapsed_ms(&self, now_ms: f64) -> f64 {
        (now_ms - self.level_start_ms).max(0.0)
    }

    /// Check for a beat at `now_ms`; records it when one fires.
    /// `audio` is only consulted when it reports normal playback.
    pub fn check(&mut self, now_ms: f64, audio: Option<&PlaybackSignal>) -> bool {
        let beat_len = self.beat_length_ms();
        let debounced = now_ms - self.last_beat_ms >= beat_len * self.config.tolerance;

        let fired = match audio.filter(|a| a.drives_beats()) {
            Some(signal) => {
                let song_ms = signal.position_seconds * 1000.0;
                let beat_index = (song_ms / beat_len).floor();
                let into_beat = song_ms - beat_index * beat_len;
                into_beat >= beat_len * self.config.audio_fire_fraction && debounced
            }
            None => {
                let index = (self.elapsed_ms(now_ms) / beat_len).floor() as u64;
                if index > self.expected_beat_index && debounced {
                    self.expected_beat_index = index;
                    true
                } else {
                    false
                }
            }
        };

        if fired {
            self.last_beat_ms = now_ms;
            self.beat_counter += 1;
        }
        fired
    }

    /// True once too long has passed without a beat for input to stay locked
    pub fn is_stalled(&self, now_ms: f64) -> bool {
        now_ms - self.last_beat_ms >= self.beat_length_ms() * self.config.safety_multiplier
    }
}
