//! High score records
//!
//! Persisted through a `KeyValueStore`, tracks the best score and a local top 10.
//! `ScoreKeeper` is the collaborator that updates these records (and the daily
//! challenge) when a run ends.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::challenge::DailyChallenge;
use crate::persistence::{KeyValueStore, load_json, save_json};
use crate::session::GameObserver;
use crate::sim::{GameEvent, World};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Seconds survived
    pub score: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// Local leaderboard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "seaweedSwimmerHighScores";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the table
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Rank a score would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, score: u32) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a score (if it qualifies). Returns the rank achieved.
    pub fn add_score(&mut self, score: u32, timestamp: f64) -> Option<usize> {
        let rank = self.potential_rank(score)?;
        self.entries
            .insert(rank - 1, HighScoreEntry { score, timestamp });
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    /// Best score so far (0 when empty)
    pub fn best(&self) -> u32 {
        self.entries.first().map_or(0, |e| e.score)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load from storage, starting fresh on a missing or unreadable record
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match load_json::<Self>(store, Self::STORAGE_KEY) {
            Some(mut scores) => {
                scores.entries.sort_by(|a, b| b.score.cmp(&a.score));
                scores.entries.truncate(MAX_HIGH_SCORES);
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            None => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) {
        match save_json(store, Self::STORAGE_KEY, self) {
            Ok(()) => log::info!("High scores saved ({} entries)", self.entries.len()),
            Err(e) => log::warn!("Failed to save high scores: {e}"),
        }
    }
}

/// Outcome of recording a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunRecord {
    pub score: u32,
    pub new_best: bool,
    pub rank: Option<usize>,
    pub challenge_completed: bool,
}

/// Persistence collaborator: records final scores and the daily challenge
pub struct ScoreKeeper {
    store: Box<dyn KeyValueStore>,
    clock: fn() -> DateTime<Local>,
    scores: HighScores,
    challenge: DailyChallenge,
    last_run: Option<RunRecord>,
}

impl ScoreKeeper {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self::with_clock(store, Local::now)
    }

    /// `clock` gives the local wall time; challenge days are its calendar date
    pub fn with_clock(mut store: Box<dyn KeyValueStore>, clock: fn() -> DateTime<Local>) -> Self {
        let scores = HighScores::load(store.as_ref());
        let challenge = DailyChallenge::load_for_day(store.as_mut(), clock().date_naive());
        Self {
            store,
            clock,
            scores,
            challenge,
            last_run: None,
        }
    }

    pub fn scores(&self) -> &HighScores {
        &self.scores
    }

    pub fn challenge(&self) -> &DailyChallenge {
        &self.challenge
    }

    pub fn best(&self) -> u32 {
        self.scores.best()
    }

    pub fn last_run(&self) -> Option<RunRecord> {
        self.last_run
    }

    /// Record a finished run and persist the records
    pub fn record(&mut self, score: u32) -> RunRecord {
        let now = (self.clock)();
        let today = now.date_naive();
        if today != self.challenge.day {
            self.challenge = self.challenge.roll_over(today);
        }

        let new_best = score > self.scores.best();
        let rank = self.scores.add_score(score, now.timestamp_millis() as f64);
        let challenge_completed = self.challenge.complete_with(score);

        if rank.is_some() {
            self.scores.save(self.store.as_mut());
        }
        self.challenge.save(self.store.as_mut());

        let record = RunRecord {
            score,
            new_best,
            rank,
            challenge_completed,
        };
        if new_best {
            log::info!("New best score: {score}");
        }
        self.last_run = Some(record);
        record
    }
}

impl GameObserver for ScoreKeeper {
    fn on_event(&mut self, event: &GameEvent, _world: &World) {
        if let GameEvent::Collision { score, .. } = event {
            self.record(*score);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use chrono::{NaiveDate, TimeZone};

    use super::*;
    use crate::persistence::MemoryStore;

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(y, m, d, h, min, 0)
            .earliest()
            .expect("local time exists")
    }

    #[test]
    fn zero_never_qualifies() {
        assert!(!HighScores::new().qualifies(0));
    }

    #[test]
    fn scores_stay_sorted_and_capped() {
        let mut hs = HighScores::new();
        for s in 1..=15u32 {
            hs.add_score(s * 3 % 16 + 1, s as f64);
        }
        assert_eq!(hs.entries.len(), MAX_HIGH_SCORES);
        assert!(hs.entries.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn ranks_are_one_indexed() {
        let mut hs = HighScores::new();
        assert_eq!(hs.add_score(50, 0.0), Some(1));
        assert_eq!(hs.add_score(70, 0.0), Some(1));
        assert_eq!(hs.add_score(60, 0.0), Some(2));
        assert_eq!(hs.best(), 70);
        assert_eq!(hs.potential_rank(10), Some(4));
    }

    #[test]
    fn full_table_rejects_low_scores() {
        let mut hs = HighScores::new();
        for s in 10..20 {
            hs.add_score(s, 0.0);
        }
        assert_eq!(hs.add_score(5, 0.0), None);
        assert_eq!(hs.add_score(15, 0.0), Some(6));
        assert_eq!(hs.entries.last().map(|e| e.score), Some(11));
    }

    #[test]
    fn keeper_persists_best() {
        fn clock() -> DateTime<Local> {
            local(2024, 10, 1, 12, 0)
        }
        let mut keeper = ScoreKeeper::with_clock(Box::new(MemoryStore::new()), clock);
        let first = keeper.record(12);
        assert!(first.new_best);
        assert_eq!(first.rank, Some(1));
        let second = keeper.record(8);
        assert!(!second.new_best);
        assert_eq!(second.rank, Some(2));
        assert_eq!(keeper.best(), 12);
    }

    #[test]
    fn keeper_reloads_from_store() {
        fn clock() -> DateTime<Local> {
            local(2024, 10, 1, 12, 0)
        }
        let mut store = MemoryStore::new();
        let mut hs = HighScores::new();
        hs.add_score(33, 1.0);
        hs.save(&mut store);

        let keeper = ScoreKeeper::with_clock(Box::new(store), clock);
        assert_eq!(keeper.best(), 33);
        assert_eq!(
            keeper.challenge().day,
            NaiveDate::from_ymd_opt(2024, 10, 1).expect("valid date")
        );
    }

    #[test]
    fn late_evening_stays_on_the_local_day() {
        fn evening() -> DateTime<Local> {
            local(2024, 10, 1, 23, 30)
        }
        fn after_midnight() -> DateTime<Local> {
            local(2024, 10, 2, 0, 15)
        }
        let store = Rc::new(RefCell::new(MemoryStore::new()));

        let mut keeper = ScoreKeeper::with_clock(Box::new(store.clone()), evening);
        assert!(keeper.record(20).challenge_completed);
        assert_eq!(
            keeper.challenge().day,
            NaiveDate::from_ymd_opt(2024, 10, 1).expect("valid date")
        );

        let next = ScoreKeeper::with_clock(Box::new(store), after_midnight);
        let challenge = next.challenge();
        assert_eq!(
            challenge.day,
            NaiveDate::from_ymd_opt(2024, 10, 2).expect("valid date")
        );
        assert_eq!(challenge.target, 40);
        assert_eq!(challenge.last_streak, 1);
    }

    #[test]
    fn run_timestamp_comes_from_the_clock() {
        fn clock() -> DateTime<Local> {
            local(2024, 10, 1, 12, 0)
        }
        let mut keeper = ScoreKeeper::with_clock(Box::new(MemoryStore::new()), clock);
        keeper.record(5);
        let stamp = keeper.scores().entries[0].timestamp;
        assert_eq!(stamp, clock().timestamp_millis() as f64);
    }
}
