//! Host loop
//!
//! `Session` owns the current `World`, threads it through `sim::step` once per
//! display frame and fans the resulting events out to collaborators. Screens
//! that are not gameplay (menu, settings, ...) live here and never reach the
//! simulation.

use std::cell::RefCell;
use std::rc::Rc;

use rand_pcg::Pcg32;

use crate::platform::JumpDebouncer;
use crate::sim::{self, GameEvent, RunPhase, StepInput, World};
use crate::tuning::Tuning;

/// How long the intro splash stays up before the menu
pub const INTRO_DURATION_SECS: f32 = 4.0;

/// UI screen. Only `Playing` drives the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Intro,
    Menu,
    HowTo,
    Settings,
    HighScores,
    Leaderboard,
    Playing,
}

/// A collaborator that reacts to what the simulation reports.
///
/// Every method has a no-op default so implementors only pick what they need.
/// Implementations must swallow their own failures.
pub trait GameObserver {
    fn on_event(&mut self, _event: &GameEvent, _world: &World) {}

    /// First jump of a run was applied
    fn on_run_started(&mut self, _world: &World) {}

    /// A fresh idle world replaced the previous one
    fn on_run_reset(&mut self) {}

    fn on_screen_changed(&mut self, _from: Screen, _to: Screen) {}

    /// Called after every gameplay frame
    fn on_frame(&mut self, _world: &World, _elapsed_secs: f32) {}
}

/// Lets the host keep a handle on an observer it hands to the session
impl<O: GameObserver + ?Sized> GameObserver for Rc<RefCell<O>> {
    fn on_event(&mut self, event: &GameEvent, world: &World) {
        self.borrow_mut().on_event(event, world);
    }

    fn on_run_started(&mut self, world: &World) {
        self.borrow_mut().on_run_started(world);
    }

    fn on_run_reset(&mut self) {
        self.borrow_mut().on_run_reset();
    }

    fn on_screen_changed(&mut self, from: Screen, to: Screen) {
        self.borrow_mut().on_screen_changed(from, to);
    }

    fn on_frame(&mut self, world: &World, elapsed_secs: f32) {
        self.borrow_mut().on_frame(world, elapsed_secs);
    }
}

pub struct Session {
    tuning: Tuning,
    world: World,
    rng: Pcg32,
    screen: Screen,
    debouncer: JumpDebouncer,
    intro_elapsed: f32,
    runs_started: u32,
    observers: Vec<Box<dyn GameObserver>>,
}

impl Session {
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let mut rng = sim::new_rng(seed);
        let world = World::with_bubbles(&tuning, &mut rng);
        log::info!("Session created with seed {seed}");
        Self {
            tuning,
            world,
            rng,
            screen: Screen::Intro,
            debouncer: JumpDebouncer::default(),
            intro_elapsed: 0.0,
            runs_started: 0,
            observers: Vec::new(),
        }
    }

    pub fn with_debouncer(mut self, debouncer: JumpDebouncer) -> Self {
        self.debouncer = debouncer;
        self
    }

    pub fn add_observer(&mut self, observer: Box<dyn GameObserver>) {
        self.observers.push(observer);
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn runs_started(&self) -> u32 {
        self.runs_started
    }

    /// Switch screens. Entering `Playing` always starts from a fresh world.
    pub fn navigate(&mut self, to: Screen) {
        let from = self.screen;
        if from == to {
            return;
        }
        log::debug!("Screen {:?} -> {:?}", from, to);
        self.screen = to;
        for observer in self.observers.iter_mut() {
            observer.on_screen_changed(from, to);
        }
        if to == Screen::Playing {
            self.reset_run();
        }
    }

    /// Menu "play" button
    pub fn start_game(&mut self) {
        if self.screen == Screen::Playing {
            self.reset_run();
        } else {
            self.navigate(Screen::Playing);
        }
    }

    /// Replace the world with a fresh idle one
    pub fn reset_run(&mut self) {
        self.world = World::with_bubbles(&self.tuning, &mut self.rng);
        self.debouncer.reset();
        for observer in self.observers.iter_mut() {
            observer.on_run_reset();
        }
    }

    /// Raw jump press at `now` (monotonic seconds). A press after game over
    /// restarts instead of jumping.
    pub fn press_jump(&mut self, now: f64) {
        if self.screen != Screen::Playing {
            return;
        }
        if self.world.phase == RunPhase::Terminated {
            self.reset_run();
            return;
        }
        self.debouncer.press(now);
    }

    /// Advance one display frame
    pub fn frame(&mut self, elapsed_secs: f32) -> Vec<GameEvent> {
        match self.screen {
            Screen::Intro => {
                self.intro_elapsed += elapsed_secs.max(0.0);
                if self.intro_elapsed >= INTRO_DURATION_SECS {
                    self.navigate(Screen::Menu);
                }
                return Vec::new();
            }
            Screen::Playing => {}
            _ => return Vec::new(),
        }

        let input = StepInput::new(elapsed_secs, self.debouncer.take());
        let was_idle = self.world.phase == RunPhase::Idle;
        let events = sim::step(&mut self.world, &input, &self.tuning, &mut self.rng);

        if was_idle && self.world.run_active() {
            self.runs_started += 1;
            for observer in self.observers.iter_mut() {
                observer.on_run_started(&self.world);
            }
        }
        for event in &events {
            for observer in self.observers.iter_mut() {
                observer.on_event(event, &self.world);
            }
        }
        for observer in self.observers.iter_mut() {
            observer.on_frame(&self.world, elapsed_secs);
        }

        events
    }
}
