//! Ad placement scheduling
//!
//! Decides when banners and interstitials appear; the SDK behind `AdBackend`
//! does the rest. Ads never block play, so backend failures are only logged.

use thiserror::Error;

use crate::persistence::{KeyValueStore, load_json, save_json};
use crate::session::{GameObserver, Screen};
use crate::sim::{GameEvent, World};

/// Interstitial after every Nth game over
pub const INTERSTITIAL_EVERY: u32 = 3;
/// Delay between entering gameplay and showing its banner
pub const GAMEPLAY_BANNER_DELAY_SECS: f32 = 3.0;

const GAME_COUNT_KEY: &str = "gameCount";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdPlacement {
    MenuBanner,
    GameplayBanner,
    Interstitial,
}

#[derive(Debug, Error)]
pub enum AdError {
    #[error("ads not initialized")]
    NotInitialized,
    #[error("ad failed to load: {0}")]
    Load(String),
}

pub trait AdBackend {
    fn show(&mut self, placement: AdPlacement) -> Result<(), AdError>;
    fn hide_banners(&mut self) -> Result<(), AdError>;
}

/// No-op backend for hosts without an ad SDK
#[derive(Debug, Default)]
pub struct NullAds;

impl AdBackend for NullAds {
    fn show(&mut self, placement: AdPlacement) -> Result<(), AdError> {
        log::debug!("ad {:?} suppressed", placement);
        Ok(())
    }

    fn hide_banners(&mut self) -> Result<(), AdError> {
        Ok(())
    }
}

pub struct AdScheduler<B: AdBackend> {
    backend: B,
    store: Box<dyn KeyValueStore>,
    games_played: u32,
    /// Seconds since entering gameplay, `None` once the banner is up
    banner_timer: Option<f32>,
}

impl<B: AdBackend> AdScheduler<B> {
    pub fn new(backend: B, store: Box<dyn KeyValueStore>) -> Self {
        let games_played = load_json::<u32>(store.as_ref(), GAME_COUNT_KEY).unwrap_or(0);
        Self {
            backend,
            store,
            games_played,
            banner_timer: None,
        }
    }

    pub fn games_played(&self) -> u32 {
        self.games_played
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn show(&mut self, placement: AdPlacement) {
        if let Err(e) = self.backend.show(placement) {
            log::warn!("Failed to show {:?}: {e}", placement);
        }
    }

    fn hide_banners(&mut self) {
        if let Err(e) = self.backend.hide_banners() {
            log::warn!("Failed to hide banners: {e}");
        }
    }

    fn game_over(&mut self) {
        self.games_played = self.games_played.saturating_add(1);
        if let Err(e) = save_json(self.store.as_mut(), GAME_COUNT_KEY, &self.games_played) {
            log::warn!("Failed to save game count: {e}");
        }
        if self.games_played % INTERSTITIAL_EVERY == 0 {
            log::info!("Showing interstitial after game {}", self.games_played);
            self.show(AdPlacement::Interstitial);
        }
    }
}

impl<B: AdBackend> GameObserver for AdScheduler<B> {
    fn on_event(&mut self, event: &GameEvent, _world: &World) {
        if event.is_collision() {
            self.game_over();
        }
    }

    fn on_screen_changed(&mut self, _from: Screen, to: Screen) {
        self.hide_banners();
        match to {
            Screen::Menu => {
                self.banner_timer = None;
                self.show(AdPlacement::MenuBanner);
            }
            Screen::Playing => self.banner_timer = Some(0.0),
            _ => self.banner_timer = None,
        }
    }

    fn on_frame(&mut self, _world: &World, elapsed_secs: f32) {
        let Some(timer) = self.banner_timer.as_mut() else {
            return;
        };
        *timer += elapsed_secs.max(0.0);
        if *timer >= GAMEPLAY_BANNER_DELAY_SECS {
            self.banner_timer = None;
            self.show(AdPlacement::GameplayBanner);
        }
    }
}
