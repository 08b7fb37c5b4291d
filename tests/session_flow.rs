//! End-to-end session tests: screens, collaborators and persistence together

use std::cell::RefCell;
use std::rc::Rc;

use chrono::{DateTime, Local, TimeZone};

use seaweed_swimmer::ads::{AdScheduler, NullAds};
use seaweed_swimmer::audio::{FeedbackRouter, NullAudio, NullHaptics};
use seaweed_swimmer::highscores::HighScores;
use seaweed_swimmer::persistence::{KeyValueStore, MemoryStore, load_json};
use seaweed_swimmer::sim::{CollisionCause, GameEvent, RunPhase};
use seaweed_swimmer::{GameObserver, ScoreKeeper, Screen, Session, Settings, Tuning};

const FRAME: f32 = 1.0 / 60.0;

fn fixed_clock() -> DateTime<Local> {
    Local
        .with_ymd_and_hms(2024, 10, 1, 12, 0, 0)
        .earliest()
        .expect("local noon exists")
}

struct Harness {
    session: Session,
    store: Rc<RefCell<MemoryStore>>,
    keeper: Rc<RefCell<ScoreKeeper>>,
    now: f64,
}

impl Harness {
    fn new(seed: u64) -> Self {
        let store = Rc::new(RefCell::new(MemoryStore::new()));
        let keeper = Rc::new(RefCell::new(ScoreKeeper::with_clock(
            Box::new(store.clone()),
            fixed_clock,
        )));
        let mut session = Session::new(Tuning::default(), seed);
        session.add_observer(Box::new(keeper.clone()));
        session.add_observer(Box::new(FeedbackRouter::new(
            NullAudio,
            NullHaptics,
            Settings::default(),
        )));
        session.add_observer(Box::new(AdScheduler::new(NullAds, Box::new(store.clone()))));
        Self {
            session,
            store,
            keeper,
            now: 0.0,
        }
    }

    fn frame(&mut self, secs: f32) -> Vec<GameEvent> {
        self.now += f64::from(secs);
        self.session.frame(secs)
    }

    /// Start a run and let the fish sink until it leaves the water
    fn sink_run(&mut self) -> Vec<GameEvent> {
        self.session.press_jump(self.now);
        let mut events = self.frame(FRAME);
        for _ in 0..2_000 {
            events.extend(self.frame(FRAME));
            if self.session.world().phase == RunPhase::Terminated {
                break;
            }
        }
        events
    }
}

#[test]
fn intro_menu_and_first_run() {
    let mut h = Harness::new(11);
    assert_eq!(h.session.screen(), Screen::Intro);
    for _ in 0..300 {
        h.frame(FRAME);
    }
    assert_eq!(h.session.screen(), Screen::Menu);

    h.session.start_game();
    assert_eq!(h.session.screen(), Screen::Playing);
    assert_eq!(h.session.world().phase, RunPhase::Idle);

    let events = h.sink_run();
    assert_eq!(events.first(), Some(&GameEvent::Jump));
    let Some(GameEvent::Collision { score, cause }) = events.last().copied() else {
        panic!("run should end in a collision: {events:?}");
    };
    assert_eq!(cause, CollisionCause::Boundary);
    assert_eq!(score, h.session.world().score);

    let record = h.keeper.borrow().last_run().expect("run recorded");
    assert_eq!(record.score, score);
}

#[test]
fn records_land_in_the_shared_store() {
    let mut h = Harness::new(12);
    h.session.start_game();
    for _ in 0..3 {
        h.sink_run();
        h.session.press_jump(h.now);
        assert_eq!(h.session.world().phase, RunPhase::Idle);
    }

    let store = h.store.borrow();
    assert_eq!(load_json::<u32>(&*store, "gameCount"), Some(3));
    let runs_scored = h.keeper.borrow().scores().entries.len();
    let saved = load_json::<HighScores>(&*store, HighScores::STORAGE_KEY).unwrap_or_default();
    assert_eq!(saved.entries.len(), runs_scored);
    assert!(store.get("seaweedSwimmerDailyChallenge").expect("get").is_some());
}

#[test]
fn best_score_survives_a_new_session() {
    let mut first = Harness::new(13);
    first.session.start_game();
    // Hold the fish in the water long enough to score
    first.session.press_jump(first.now);
    first.frame(FRAME);
    while first.session.world().score < 2 && first.session.world().run_active() {
        let world = first.session.world();
        if world.fish.y > 380.0 && world.fish.vel > 0.0 {
            first.session.press_jump(first.now);
        }
        first.frame(FRAME);
    }
    first.sink_run();
    let best = first.keeper.borrow().best();

    let reopened = ScoreKeeper::with_clock(Box::new(first.store.clone()), fixed_clock);
    assert_eq!(reopened.best(), best);
}

#[test]
fn menu_jumps_do_not_start_runs() {
    let mut h = Harness::new(14);
    h.session.navigate(Screen::Menu);
    h.session.press_jump(1.0);
    h.frame(FRAME);
    assert_eq!(h.session.runs_started(), 0);

    h.session.navigate(Screen::Playing);
    h.session.press_jump(2.0);
    h.frame(FRAME);
    assert_eq!(h.session.runs_started(), 1);
}

#[test]
fn observers_see_events_in_step_order() {
    struct Order(Rc<RefCell<Vec<GameEvent>>>);

    impl GameObserver for Order {
        fn on_event(&mut self, event: &GameEvent, _world: &seaweed_swimmer::sim::World) {
            self.0.borrow_mut().push(*event);
        }
    }

    let mut h = Harness::new(15);
    let seen = Rc::new(RefCell::new(Vec::new()));
    h.session.add_observer(Box::new(Order(seen.clone())));
    h.session.start_game();
    let events = h.sink_run();
    assert_eq!(*seen.borrow(), events);
}
