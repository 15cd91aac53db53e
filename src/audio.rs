//! Audio using the Web Audio API and an HTML audio element
//!
//! Beat feedback and cues are synthesized; music comes from a looping
//! `<audio>` track whose position drives beats when it plays at 1.0x.

use web_sys::{AudioContext, GainNode, HtmlAudioElement, OscillatorNode, OscillatorType};

use crate::sim::{GameEvent, PlaybackSignal};

/// `HTMLMediaElement.HAVE_ENOUGH_DATA`
const HAVE_ENOUGH_DATA: u16 = 4;
/// `HTMLMediaElement.HAVE_CURRENT_DATA`; minimum to start playback
const HAVE_CURRENT_DATA: u16 = 2;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Successful on-beat move - kick drum
    Beat,
    /// Bumped a wall or the maze edge
    WallHit,
    /// Exit reached
    LevelComplete,
    /// Battery empty
    GameOver,
}

impl SoundEffect {
    /// Cue for a game event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::MoveFeedback => Some(SoundEffect::Beat),
            GameEvent::WallHit => Some(SoundEffect::WallHit),
            GameEvent::LevelComplete { .. } => Some(SoundEffect::LevelComplete),
            GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
            _ => None,
        }
    }
}

/// Audio manager for sound effects
pub struct AudioManager {
    ctx: Option<AudioContext>,
    volume: f32,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self { ctx, volume: 0.3 }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Set effect volume (0.0 - 1.0); 0 mutes
    pub fn set_volume(&mut self, vol: f32) {
        self.volume = vol.clamp(0.0, 1.0);
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.volume;
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Beat => self.play_kick(ctx, vol),
            SoundEffect::WallHit => self.play_wall_hit(ctx, vol),
            SoundEffect::LevelComplete => self.play_level_complete(ctx, vol),
            SoundEffect::GameOver => self.play_game_over(ctx, vol),
        }
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// 60 Hz kick with a short attack and fast decay
    fn play_kick(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 60.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(0.001, t).ok();
        gain.gain().linear_ramp_to_value_at_time(vol, t + 0.01).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.2)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.2).ok();
    }

    /// Dull buzz
    fn play_wall_hit(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 110.0, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.4, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.15)
            .ok();
        osc.frequency().set_value_at_time(110.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(70.0, t + 0.15)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.2).ok();
    }

    /// Major chord that swells in, with the root gliding up an octave
    fn play_level_complete(&self, ctx: &AudioContext, vol: f32) {
        const CHORD_HZ: [f32; 3] = [523.25, 659.25, 783.99];
        let t = ctx.current_time();

        for freq in CHORD_HZ {
            let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Sine) else {
                continue;
            };
            gain.gain().set_value_at_time(0.001, t).ok();
            gain.gain()
                .linear_ramp_to_value_at_time(vol * 0.35, t + 0.08)
                .ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.6)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.65).ok();
        }

        let Some((glide, gain)) = self.create_osc(ctx, 261.63, OscillatorType::Triangle) else {
            return;
        };
        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.5)
            .ok();
        glide.frequency().set_value_at_time(261.63, t).ok();
        glide
            .frequency()
            .exponential_ramp_to_value_at_time(523.25, t + 0.3)
            .ok();
        glide.start().ok();
        glide.stop_with_when(t + 0.55).ok();
    }

    /// Battery dying: a sawtooth that sags to a low hum
    fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 220.0, OscillatorType::Sawtooth) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.5, t).ok();
        gain.gain()
            .linear_ramp_to_value_at_time(vol * 0.3, t + 0.8)
            .ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.001, t + 1.4)
            .ok();
        osc.frequency().set_value_at_time(220.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(45.0, t + 1.2)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 1.5).ok();
    }
}

/// A looping music track
pub struct MusicTrack {
    element: HtmlAudioElement,
    /// Tempo the track was recorded at
    pub bpm: f64,
}

impl MusicTrack {
    /// Load a track from a URL (object URLs from uploads included)
    pub fn load(url: &str, bpm: f64) -> Option<Self> {
        let element = match HtmlAudioElement::new_with_src(url) {
            Ok(el) => el,
            Err(e) => {
                log::warn!("Could not create audio element for {}: {:?}", url, e);
                return None;
            }
        };
        element.set_loop(true);
        element.set_preload("auto");
        log::info!("Loaded song {} at {} BPM", url, bpm);
        Some(Self { element, bpm })
    }

    /// Start from the top at normal speed
    pub fn play(&self) {
        if self.element.ready_state() < HAVE_CURRENT_DATA {
            log::warn!("Song not ready yet; beats use the timer");
            return;
        }
        self.element.set_current_time(0.0);
        self.element.set_playback_rate(1.0);
        if self.element.play().is_err() {
            log::warn!("Could not play song");
        }
    }

    pub fn pause(&self) {
        if !self.element.paused() {
            let _ = self.element.pause();
        }
    }

    pub fn resume(&self) {
        if self.element.paused() && self.element.play().is_err() {
            log::warn!("Could not resume song playback");
        }
    }

    pub fn set_playback_rate(&self, rate: f64) {
        self.element.set_playback_rate(rate);
    }

    /// Current position and playback state for the beat clock
    pub fn signal(&self) -> PlaybackSignal {
        PlaybackSignal {
            position_seconds: self.element.current_time(),
            is_playing: !self.element.paused(),
            is_buffered: self.element.ready_state() >= HAVE_ENOUGH_DATA,
            playback_rate: self.element.playback_rate(),
        }
    }
}
