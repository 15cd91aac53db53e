//! JS-facing game handle
//!
//! The page owns the canvas, DOM and `requestAnimationFrame` loop. Each frame
//! it calls `frame()` and draws the returned JSON; key presses go through
//! `key_down()`.

use wasm_bindgen::prelude::*;

use crate::audio::{AudioManager, MusicTrack, SoundEffect};
use crate::highscores::HighScores;
use crate::platform::input::{KeyAction, map_key};
use crate::platform::time::{now_ms, unix_ms};
use crate::settings::Settings;
use crate::sim::{
    GameEvent, GamePhase, GameSnapshot, GameState, MoveOutcome, TickInput, attempt_move, tick,
};

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Lumen Maze starting...");
}

/// Frame payload handed to the page renderer
#[derive(serde::Serialize)]
struct FrameView<'a> {
    snapshot: GameSnapshot,
    /// Cell bitmasks, row-major
    maze: &'a [crate::sim::MazeCell],
    light_radius: f32,
    tile_size: u32,
    beat: bool,
    hud_dirty: bool,
}

/// One game session, owned by the page
#[wasm_bindgen]
pub struct WebGame {
    state: GameState,
    settings: Settings,
    scores: HighScores,
    sfx: AudioManager,
    music: Option<MusicTrack>,
    pause_requested: bool,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebGame {
        let settings = Settings::load();
        let mut sfx = AudioManager::new();
        sfx.set_volume(settings.effective_beat_volume());
        WebGame {
            state: GameState::with_timing(rand::random(), settings.timing),
            settings,
            scores: HighScores::load(),
            sfx,
            music: None,
            pause_requested: false,
        }
    }

    /// Load a song from a URL at a tempo (60-300 BPM, else 120)
    pub fn load_song(&mut self, url: &str, bpm: f64) -> bool {
        self.settings.set_song_bpm(bpm);
        self.settings.save();
        match MusicTrack::load(url, self.settings.song_bpm) {
            Some(track) => {
                self.state.load_song(track.bpm);
                self.music = Some(track);
                true
            }
            None => {
                self.unload_song();
                false
            }
        }
    }

    /// Pick a bundled song by id; the page supplies its rendered URL
    pub fn select_sample_song(&mut self, id: &str, url: &str) -> bool {
        let Some(song) = self.settings.select_sample_song(id) else {
            return false;
        };
        self.load_song(url, song.bpm)
    }

    pub fn unload_song(&mut self) {
        if let Some(track) = self.music.take() {
            track.pause();
        }
        self.state.unload_song();
    }

    /// Start a run (from the menu or after game over)
    pub fn start(&mut self) {
        match self.state.phase() {
            GamePhase::MainMenu => {}
            GamePhase::GameOver => self.state.reset(),
            GamePhase::Running | GamePhase::Paused => return,
        }
        self.sfx.resume();
        self.state.start(now_ms());
        self.handle_events();
    }

    pub fn quit_to_menu(&mut self) {
        self.state.quit_to_menu();
        self.handle_events();
    }

    /// Handle a `KeyboardEvent.code`; returns true if the page should preventDefault
    pub fn key_down(&mut self, code: &str) -> bool {
        let Some(action) = map_key(code) else {
            return false;
        };
        match action {
            KeyAction::TogglePause => {
                if !self.state.is_running() {
                    return false;
                }
                self.pause_requested = true;
            }
            KeyAction::Confirm => match self.state.phase() {
                GamePhase::MainMenu | GamePhase::GameOver => self.start(),
                _ => return false,
            },
            KeyAction::Move(dir) => {
                if attempt_move(&mut self.state, dir, now_ms()) == MoveOutcome::Ignored {
                    return false;
                }
                self.handle_events();
            }
        }
        true
    }

    /// Advance one display frame; returns the frame view as JSON
    pub fn frame(&mut self) -> String {
        let now = now_ms();
        let input = TickInput {
            audio: self.music.as_ref().map(|m| m.signal()),
            pause: std::mem::take(&mut self.pause_requested),
        };
        let report = tick(&mut self.state, &input, now);
        self.handle_events();

        let snapshot = self.state.snapshot();
        let view = FrameView {
            tile_size: self.settings.tile_size(snapshot.rows, snapshot.cols),
            snapshot,
            maze: self.state.maze().cells(),
            light_radius: self.state.effective_light_radius(now),
            beat: report.beat,
            hud_dirty: report.hud_dirty(),
        };
        serde_json::to_string(&view).unwrap_or_default()
    }

    /// Submit the finished run's score. Returns the rank, 0 if it did not place,
    /// or -1 if the submission was rejected.
    pub fn submit_score(&mut self, name: &str) -> i32 {
        let score = self.state.score();
        match self.scores.submit(name, score, unix_ms()) {
            Ok(rank) => {
                self.scores.save();
                self.settings.set_player_name(name);
                self.settings.save();
                rank.map(|r| r as i32).unwrap_or(0)
            }
            Err(e) => {
                log::warn!("Score not submitted: {}", e);
                -1
            }
        }
    }

    /// Rank the current score would get
    pub fn potential_rank(&self) -> usize {
        self.scores.potential_rank(self.state.score())
    }

    /// Top 10 as JSON `[{name, score, timestamp}]`
    pub fn leaderboard(&self) -> String {
        serde_json::to_string(self.scores.top()).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn player_name(&self) -> String {
        self.settings.player_name.clone()
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.settings.muted = muted;
        self.sfx.set_volume(self.settings.effective_beat_volume());
        self.settings.save();
    }
}

impl Default for WebGame {
    fn default() -> Self {
        Self::new()
    }
}

impl WebGame {
    /// Route buffered events to audio
    fn handle_events(&mut self) {
        for event in self.state.drain_events() {
            if let Some(effect) = SoundEffect::for_event(&event) {
                self.sfx.play(effect);
            }
            let Some(music) = &self.music else { continue };
            match event {
                GameEvent::MusicStart => music.play(),
                GameEvent::MusicResume => music.resume(),
                GameEvent::MusicStop => music.pause(),
                GameEvent::PlaybackRate(rate) => music.set_playback_rate(rate),
                _ => {}
            }
        }
    }
}
