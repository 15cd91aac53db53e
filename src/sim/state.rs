//! Game state and the level/beat/battery state machine
//!
//! One `GameState` lives for the whole session. It is mutated only through its
//! own methods, called by the frame driver (`tick`) and the input gate
//! (`attempt_move`). Collaborators (audio, HUD) react to the `GameEvent`s it
//! buffers.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::beat::{BeatClock, PlaybackSignal, TimingConfig};
use super::difficulty::{LevelParameters, flash_duration_ms, level_start_battery};
use super::maze::{Maze, Position, generate_exit, generate_maze};
use crate::consts::*;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Not running; waiting for start
    MainMenu,
    /// Active gameplay
    Running,
    /// Running but suspended: no beats, no drain
    Paused,
    /// Run ended; fields stay readable for scoring
    GameOver,
}

/// Notifications for collaborators outside the simulation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A beat was processed
    Beat,
    /// Successful on-beat move; play the beat sound
    MoveFeedback,
    /// Failed move into a wall or the maze edge
    WallHit,
    /// Streak lost to a missed beat
    StreakReset,
    /// Exit reached; `level` is the level just entered
    LevelComplete { level: u32, bonus: u64 },
    /// Song playback rate should follow the level tempo
    PlaybackRate(f64),
    /// Music should start from the top
    MusicStart,
    /// Music should continue where it paused
    MusicResume,
    /// Music should pause (pause, game over, quit)
    MusicStop,
    GameOver { score: u64 },
}

/// Result of processing one beat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BeatOutcome {
    pub streak_reset: bool,
    pub game_over: bool,
}

/// Read-only copy of the state for HUDs, renderers and score submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub phase: GamePhase,
    pub score: u64,
    pub level: u32,
    pub battery: u32,
    pub bpm: f64,
    pub streak: u32,
    pub max_streak: u32,
    pub move_ready: bool,
    pub player: Position,
    pub exit: Position,
    pub rows: usize,
    pub cols: usize,
    pub light_radius: f32,
    pub flash_duration_ms: f64,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    pub(crate) phase: GamePhase,
    pub(crate) score: u64,
    pub(crate) level: u32,
    pub(crate) battery: u32,
    /// Battery at level start; time drain counts down from here
    pub(crate) level_start_battery: u32,
    pub(crate) params: LevelParameters,
    pub(crate) maze: Maze,
    pub(crate) player: Position,
    pub(crate) exit: Position,
    pub(crate) move_ready: bool,
    pub(crate) moved_this_beat: bool,
    /// Successful moves this level
    pub(crate) move_count: u32,
    pub(crate) streak: u32,
    pub(crate) max_streak: u32,
    pub(crate) light_radius: f32,
    pub(crate) clock: BeatClock,
    paused_at_ms: Option<f64>,
    /// Base tempo of the loaded song, if any
    song_bpm: Option<f64>,
    rng: Pcg32,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a session in the main menu
    pub fn new(seed: u64) -> Self {
        Self::with_timing(seed, TimingConfig::default())
    }

    /// Create a session with custom beat timing factors
    pub fn with_timing(seed: u64, timing: TimingConfig) -> Self {
        let params = LevelParameters::for_level(1, INITIAL_BPM);
        Self {
            phase: GamePhase::MainMenu,
            score: 0,
            level: 1,
            battery: INITIAL_BATTERY,
            level_start_battery: INITIAL_BATTERY,
            params,
            maze: Maze::closed(params.rows, params.cols),
            player: Position::ORIGIN,
            exit: Position::ORIGIN,
            move_ready: true,
            moved_this_beat: false,
            move_count: 0,
            streak: 0,
            max_streak: 0,
            light_radius: params.base_light_radius,
            clock: BeatClock::new(params.bpm, 0.0, timing),
            paused_at_ms: None,
            song_bpm: None,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    /// Return every gameplay field to its initial value.
    /// The RNG, timing config and loaded song survive.
    pub fn reset(&mut self) {
        let timing = self.clock.config;
        let params = LevelParameters::for_level(1, self.base_bpm());
        self.phase = GamePhase::MainMenu;
        self.score = 0;
        self.level = 1;
        self.battery = INITIAL_BATTERY;
        self.level_start_battery = INITIAL_BATTERY;
        self.params = params;
        self.maze = Maze::closed(params.rows, params.cols);
        self.player = Position::ORIGIN;
        self.exit = Position::ORIGIN;
        self.move_ready = true;
        self.moved_this_beat = false;
        self.move_count = 0;
        self.streak = 0;
        self.max_streak = 0;
        self.light_radius = params.base_light_radius;
        self.clock = BeatClock::new(params.bpm, 0.0, timing);
        self.paused_at_ms = None;
    }

    // === Song tempo ===

    /// Use a song's tempo as the base for every level from now on
    pub fn load_song(&mut self, base_bpm: f64) {
        log::info!("Song loaded at {} BPM", base_bpm);
        self.song_bpm = Some(base_bpm);
    }

    /// Go back to the fixed default tempo and wall-clock beats
    pub fn unload_song(&mut self) {
        self.song_bpm = None;
    }

    pub fn has_song(&self) -> bool {
        self.song_bpm.is_some()
    }

    fn base_bpm(&self) -> f64 {
        self.song_bpm.unwrap_or(INITIAL_BPM)
    }

    // === Lifecycle ===

    /// MainMenu -> Running, building level 1. Ignored in any other phase;
    /// call `reset` first to leave GameOver.
    pub fn start(&mut self, now_ms: f64) {
        if self.phase != GamePhase::MainMenu {
            return;
        }
        self.phase = GamePhase::Running;
        self.paused_at_ms = None;
        log::info!("Game started");
        self.init_level(now_ms);
        self.events.push(GameEvent::MusicStart);
    }

    /// Build the current level: parameters, maze, exit, battery, streak, timing
    pub fn init_level(&mut self, now_ms: f64) {
        let params = LevelParameters::for_level(self.level, self.base_bpm());
        self.params = params;
        self.maze = generate_maze(params.rows, params.cols, &mut self.rng);
        self.exit = generate_exit(params.rows, params.cols, &mut self.rng);
        self.player = Position::ORIGIN;

        self.battery = level_start_battery(self.level, self.battery);
        self.level_start_battery = self.battery;

        if let Some(song_bpm) = self.song_bpm {
            let rate = params.bpm / song_bpm;
            self.events.push(GameEvent::PlaybackRate(rate));
            log::info!(
                "Level {}: song playback rate {:.2}x ({} BPM)",
                self.level,
                rate,
                params.bpm
            );
        }

        self.streak = 0;
        self.max_streak = 0;
        self.light_radius = params.base_light_radius;
        self.moved_this_beat = false;
        self.move_ready = true;
        self.move_count = 0;
        self.clock.reset(params.bpm, now_ms);

        log::info!(
            "Level {}: {}x{} maze, {} BPM, exit at ({}, {}), battery {}",
            self.level,
            params.rows,
            params.cols,
            params.bpm,
            self.exit.x,
            self.exit.y,
            self.battery
        );
    }

    /// Running -> Paused
    pub fn pause(&mut self, now_ms: f64) {
        if self.phase != GamePhase::Running {
            return;
        }
        self.phase = GamePhase::Paused;
        self.paused_at_ms = Some(now_ms);
        self.events.push(GameEvent::MusicStop);
    }

    /// Paused -> Running, shifting timing anchors past the pause
    pub fn resume(&mut self, now_ms: f64) {
        if self.phase != GamePhase::Paused {
            return;
        }
        if let Some(paused_at) = self.paused_at_ms.take() {
            self.clock.shift((now_ms - paused_at).max(0.0));
        }
        self.phase = GamePhase::Running;
        self.events.push(GameEvent::MusicResume);
    }

    /// Running/Paused -> GameOver; state stays readable
    pub fn game_over(&mut self) {
        if !self.is_running() {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.paused_at_ms = None;
        self.events.push(GameEvent::MusicStop);
        self.events.push(GameEvent::GameOver { score: self.score });
        log::info!(
            "Game over at level {} with score {} (best streak {})",
            self.level,
            self.score,
            self.max_streak
        );
    }

    /// Any phase -> MainMenu with everything reset
    pub fn quit_to_menu(&mut self) {
        self.reset();
        self.events.push(GameEvent::MusicStop);
    }

    /// Award the level bonus and build the next level
    pub fn next_level(&mut self, now_ms: f64) -> u64 {
        let bonus =
            self.battery as u64 * BATTERY_SCORE_WEIGHT + self.level as u64 * LEVEL_SCORE_WEIGHT;
        self.score += bonus;
        self.level += 1;
        log::info!("Level complete! +{} points, entering level {}", bonus, self.level);
        self.init_level(now_ms);
        self.events.push(GameEvent::LevelComplete {
            level: self.level,
            bonus,
        });
        bonus
    }

    // === Beats ===

    /// Frame-level beat check, including the stalled-input override
    pub fn should_trigger_beat(&mut self, now_ms: f64, audio: Option<&PlaybackSignal>) -> bool {
        let audio = audio.filter(|_| self.song_bpm.is_some());
        let fired = self.clock.check(now_ms, audio);

        if !self.move_ready && self.clock.is_stalled(now_ms) {
            log::warn!("Beat timing safety trigger activated");
            self.move_ready = true;
        }

        fired
    }

    /// Process one beat: punish an unused move opportunity, reopen input,
    /// end the run on an empty battery
    pub fn on_beat(&mut self) -> BeatOutcome {
        if self.phase != GamePhase::Running {
            return BeatOutcome::default();
        }

        let mut outcome = BeatOutcome::default();
        self.events.push(GameEvent::Beat);

        if self.move_ready && !self.moved_this_beat {
            if self.streak > 0 {
                log::debug!("Missed beat, streak {} lost", self.streak);
            }
            self.reset_streak();
            outcome.streak_reset = true;
            self.events.push(GameEvent::StreakReset);
        }

        self.moved_this_beat = false;
        self.move_ready = true;

        if self.battery == 0 {
            self.game_over();
            return BeatOutcome {
                streak_reset: false,
                game_over: true,
            };
        }

        outcome
    }

    // === Battery ===

    /// Continuous time drain. Only ever lowers the battery.
    /// Returns true if the battery changed.
    pub fn update_battery_drain(&mut self, now_ms: f64) -> bool {
        if self.phase != GamePhase::Running {
            return false;
        }
        let elapsed = self.clock.elapsed_ms(now_ms);
        let drained = (elapsed * self.params.battery_drain_rate / 1000.0).floor() as u64;
        let expected = (self.level_start_battery as u64).saturating_sub(drained) as u32;

        if self.battery > expected {
            self.battery = expected;
            true
        } else {
            false
        }
    }

    pub(crate) fn drain_battery(&mut self, amount: u32) {
        self.battery = self.battery.saturating_sub(amount);
    }

    // === Streak / light ===

    pub(crate) fn reset_streak(&mut self) {
        self.streak = 0;
        self.light_radius = self.params.base_light_radius;
    }

    pub(crate) fn extend_streak(&mut self) {
        self.streak += 1;
        self.max_streak = self.max_streak.max(self.streak);
        let bonus = (self.streak as f32 * STREAK_BONUS_MULTIPLIER).min(MAX_STREAK_BONUS);
        self.light_radius = self.params.base_light_radius + bonus;
    }

    /// Light radius with the cosmetic streak pulse applied
    pub fn effective_light_radius(&self, now_ms: f64) -> f32 {
        let pulse = if self.streak > 0 {
            1.0 + 0.1 * (now_ms * 0.01).sin() as f32
        } else {
            1.0
        };
        self.light_radius * pulse
    }

    // === Events ===

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events buffered since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // === Read access ===

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Running or paused
    pub fn is_running(&self) -> bool {
        matches!(self.phase, GamePhase::Running | GamePhase::Paused)
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    /// True while one move is allowed before the next beat
    pub fn move_ready(&self) -> bool {
        self.move_ready
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn battery(&self) -> u32 {
        self.battery
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn player(&self) -> Position {
        self.player
    }

    pub fn exit(&self) -> Position {
        self.exit
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn params(&self) -> &LevelParameters {
        &self.params
    }

    pub fn clock(&self) -> &BeatClock {
        &self.clock
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            phase: self.phase,
            score: self.score,
            level: self.level,
            battery: self.battery,
            bpm: self.params.bpm,
            streak: self.streak,
            max_streak: self.max_streak,
            move_ready: self.move_ready,
            player: self.player,
            exit: self.exit,
            rows: self.params.rows,
            cols: self.params.cols,
            light_radius: self.light_radius,
            flash_duration_ms: flash_duration_ms(self.params.bpm),
        }
    }
}
