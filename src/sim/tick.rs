//! Per-frame update
//!
//! The host calls `tick` once per display frame: beat check, beat handling,
//! then battery drain. Move attempts are applied separately as they arrive.

use super::beat::PlaybackSignal;
use super::state::{GamePhase, GameState};

/// Inputs gathered by the host for one frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Music position, when a track is loaded
    pub audio: Option<PlaybackSignal>,
    /// Pause toggle
    pub pause: bool,
}

/// What changed this frame, for HUD refresh decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameReport {
    pub beat: bool,
    pub streak_reset: bool,
    pub game_over: bool,
    pub battery_changed: bool,
}

impl FrameReport {
    /// True if anything the HUD shows may have changed
    pub fn hud_dirty(&self) -> bool {
        self.streak_reset || self.game_over || self.battery_changed
    }
}

/// Advance the game state to `now_ms`
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: f64) -> FrameReport {
    let mut report = FrameReport::default();

    if input.pause {
        match state.phase() {
            GamePhase::Running => state.pause(now_ms),
            GamePhase::Paused => state.resume(now_ms),
            _ => {}
        }
    }

    // Paused still renders, but nothing advances
    if state.phase() != GamePhase::Running {
        return report;
    }

    if state.should_trigger_beat(now_ms, input.audio.as_ref()) {
        report.beat = true;
        let outcome = state.on_beat();
        report.streak_reset = outcome.streak_reset;
        report.game_over = outcome.game_over;
        if outcome.game_over {
            return report;
        }
    }

    report.battery_changed = state.update_battery_drain(now_ms);
    report
}
