//! Sound and haptic feedback
//!
//! Procedurally generated sound effects, no external files needed. The game
//! only decides *which* cue fires; a backend turns `Tone` descriptions into
//! actual sound. Backends are best effort: failures are logged and dropped.

use thiserror::Error;

use crate::session::{GameObserver, Screen};
use crate::settings::Settings;
use crate::sim::{GameEvent, World};

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio device unavailable: {0}")]
    Unavailable(String),
    #[error("playback failed: {0}")]
    Playback(String),
}

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Fish swims up
    Swim,
    /// Fish hits seaweed or leaves the water
    Collision,
    /// Score crossed a milestone
    Milestone,
    /// Fish squeezed past a frond
    NearMiss,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
    Sawtooth,
}

/// One oscillator sweep with an exponential gain decay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub waveform: Waveform,
    pub start_hz: f32,
    pub end_hz: f32,
    pub duration_secs: f32,
    /// Peak gain before the effect volume is applied
    pub gain: f32,
}

impl SoundEffect {
    /// Oscillator layers for this effect
    pub fn tones(self) -> &'static [Tone] {
        match self {
            // Bubble blip over a low splash
            SoundEffect::Swim => &[
                Tone {
                    waveform: Waveform::Sine,
                    start_hz: 1000.0,
                    end_hz: 1400.0,
                    duration_secs: 0.2,
                    gain: 0.2,
                },
                Tone {
                    waveform: Waveform::Sine,
                    start_hz: 200.0,
                    end_hz: 100.0,
                    duration_secs: 0.15,
                    gain: 0.15,
                },
            ],
            SoundEffect::Collision => &[Tone {
                waveform: Waveform::Sawtooth,
                start_hz: 100.0,
                end_hz: 50.0,
                duration_secs: 0.3,
                gain: 0.2,
            }],
            SoundEffect::Milestone => &[
                Tone {
                    waveform: Waveform::Triangle,
                    start_hz: 523.0,
                    end_hz: 523.0,
                    duration_secs: 0.12,
                    gain: 0.2,
                },
                Tone {
                    waveform: Waveform::Triangle,
                    start_hz: 784.0,
                    end_hz: 1046.0,
                    duration_secs: 0.25,
                    gain: 0.2,
                },
            ],
            SoundEffect::NearMiss => &[Tone {
                waveform: Waveform::Sine,
                start_hz: 600.0,
                end_hz: 900.0,
                duration_secs: 0.08,
                gain: 0.1,
            }],
        }
    }
}

/// Vibration strength
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HapticStyle {
    Light,
    Medium,
    Heavy,
}

pub trait AudioBackend {
    fn play(&mut self, effect: SoundEffect, volume: f32) -> Result<(), AudioError>;
    fn start_music(&mut self, volume: f32) -> Result<(), AudioError>;
    fn stop_music(&mut self) -> Result<(), AudioError>;
}

pub trait HapticsBackend {
    fn impact(&mut self, style: HapticStyle) -> Result<(), AudioError>;
}

/// Silent backend for headless hosts
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioBackend for NullAudio {
    fn play(&mut self, effect: SoundEffect, volume: f32) -> Result<(), AudioError> {
        log::trace!("sfx {:?} at {:.2}", effect, volume);
        Ok(())
    }

    fn start_music(&mut self, _volume: f32) -> Result<(), AudioError> {
        Ok(())
    }

    fn stop_music(&mut self) -> Result<(), AudioError> {
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct NullHaptics;

impl HapticsBackend for NullHaptics {
    fn impact(&mut self, _style: HapticStyle) -> Result<(), AudioError> {
        Ok(())
    }
}

/// Turns simulation events into sound and vibration, honoring `Settings`
pub struct FeedbackRouter<A: AudioBackend, H: HapticsBackend> {
    audio: A,
    haptics: H,
    settings: Settings,
    music_playing: bool,
}

impl<A: AudioBackend, H: HapticsBackend> FeedbackRouter<A, H> {
    pub fn new(audio: A, haptics: H, settings: Settings) -> Self {
        Self {
            audio,
            haptics,
            settings,
            music_playing: false,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Apply new preferences. Turning music off stops it immediately.
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
        if !self.settings.music {
            self.stop_music();
        }
    }

    pub fn music_playing(&self) -> bool {
        self.music_playing
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn haptics(&self) -> &H {
        &self.haptics
    }

    fn play(&mut self, effect: SoundEffect) {
        let volume = self.settings.effective_sfx_volume();
        if volume <= 0.0 {
            return;
        }
        if let Err(e) = self.audio.play(effect, volume) {
            log::warn!("Failed to play {:?}: {e}", effect);
        }
    }

    fn vibrate(&mut self, style: HapticStyle) {
        if !self.settings.haptics {
            return;
        }
        if let Err(e) = self.haptics.impact(style) {
            log::warn!("Haptics failed: {e}");
        }
    }

    fn start_music(&mut self) {
        let volume = self.settings.effective_music_volume();
        if self.music_playing || volume <= 0.0 {
            return;
        }
        match self.audio.start_music(volume) {
            Ok(()) => self.music_playing = true,
            Err(e) => log::warn!("Failed to start music: {e}"),
        }
    }

    fn stop_music(&mut self) {
        if !self.music_playing {
            return;
        }
        self.music_playing = false;
        if let Err(e) = self.audio.stop_music() {
            log::warn!("Failed to stop music: {e}");
        }
    }
}

impl<A: AudioBackend, H: HapticsBackend> GameObserver for FeedbackRouter<A, H> {
    fn on_event(&mut self, event: &GameEvent, _world: &World) {
        match event {
            GameEvent::Jump => {
                self.play(SoundEffect::Swim);
                self.vibrate(HapticStyle::Light);
            }
            GameEvent::Collision { .. } => {
                self.play(SoundEffect::Collision);
                self.stop_music();
                self.vibrate(HapticStyle::Heavy);
            }
            GameEvent::Milestone { .. } => {
                self.play(SoundEffect::Milestone);
                self.vibrate(HapticStyle::Medium);
            }
            GameEvent::NearMiss { .. } => {
                self.play(SoundEffect::NearMiss);
                self.vibrate(HapticStyle::Light);
            }
            GameEvent::ScoreChanged { .. } => {}
        }
    }

    fn on_run_started(&mut self, _world: &World) {
        self.start_music();
    }

    fn on_screen_changed(&mut self, _from: Screen, to: Screen) {
        if to == Screen::Playing {
            self.start_music();
        } else {
            self.stop_music();
        }
    }
}
