//! Player preferences
//!
//! Persisted separately from score records. A missing or unreadable record
//! falls back to defaults (everything on).

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, load_json, save_json};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Background music
    pub music: bool,
    /// Sound effects
    pub sfx: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,

    // === Feedback ===
    /// Vibration on jump / collision
    pub haptics: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            music: true,
            sfx: true,
            master_volume: 0.8,
            sfx_volume: 0.4,
            music_volume: 0.3,
            haptics: true,
        }
    }
}

impl Settings {
    /// Storage key
    const STORAGE_KEY: &'static str = "seaweedSwimmerSettings";

    /// Effective sound-effect gain (0 when sfx are off)
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.sfx {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Effective music gain (0 when music is off)
    pub fn effective_music_volume(&self) -> f32 {
        if self.music {
            (self.master_volume * self.music_volume).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn load(store: &dyn KeyValueStore) -> Self {
        match load_json::<Self>(store, Self::STORAGE_KEY) {
            Some(settings) => {
                log::info!("Loaded settings");
                settings
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) {
        match save_json(store, Self::STORAGE_KEY, self) {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Failed to save settings: {e}"),
        }
    }
}
