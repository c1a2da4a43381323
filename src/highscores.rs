//! Best score and leaderboard
//!
//! The best score is compared, stored and pushed to the remote board every
//! time a run's score rises above it. Finished runs land on a top-10
//! leaderboard. Storage and
//! remote failures are logged and swallowed; gameplay never waits on them.

use serde::{Deserialize, Serialize};

use crate::persistence::ScoreStore;
use crate::remote::RemoteSync;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Blocks placed
    pub score: u32,
    /// Perfect drops during the run
    #[serde(default)]
    pub perfect_drops: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// Best score plus leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct HighScores {
    /// Best score seen, including ones adopted from the remote
    #[serde(default)]
    pub best: u32,
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u32) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a finished run to the leaderboard (if it qualifies).
    /// Returns the rank achieved (1-indexed).
    pub fn add_score(&mut self, score: u32, perfect_drops: u32, timestamp: f64) -> Option<usize> {
        self.raise_best(score);
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry {
            score,
            perfect_drops,
            timestamp,
        };

        // Sorted descending by score; ties keep the earlier run first
        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    /// Raise the best score. Returns true if it increased.
    pub fn raise_best(&mut self, score: u32) -> bool {
        if score > self.best {
            self.best = score;
            true
        } else {
            false
        }
    }
}

/// Keeps [`HighScores`] in sync with local storage and the remote board
pub struct ScoreKeeper<S: ScoreStore, R: RemoteSync> {
    scores: HighScores,
    store: S,
    remote: R,
    /// Best already pushed, to avoid resending the same value
    pushed: u32,
}

impl<S: ScoreStore, R: RemoteSync> ScoreKeeper<S, R> {
    /// Load the local best and ask the remote for its best
    pub fn open(store: S, remote: R) -> Self {
        let scores = match store.load() {
            Ok(Some(scores)) => {
                log::info!(
                    "Loaded best {} and {} high scores",
                    scores.best,
                    scores.entries.len()
                );
                scores
            }
            Ok(None) => {
                log::info!("No high scores found, starting fresh");
                HighScores::new()
            }
            Err(e) => {
                log::warn!("High scores unavailable ({e}), starting fresh");
                HighScores::new()
            }
        };
        remote.request_best();
        let pushed = scores.best;
        Self {
            scores,
            store,
            remote,
            pushed,
        }
    }

    pub fn scores(&self) -> &HighScores {
        &self.scores
    }

    pub fn best(&self) -> u32 {
        self.scores.best
    }

    /// Adopt the remote best if it arrived and beats the local one.
    /// Returns true if the best changed.
    pub fn poll_remote(&mut self) -> bool {
        let Some(remote_best) = self.remote.take_best() else {
            return false;
        };
        if !self.scores.raise_best(remote_best) {
            log::debug!("Remote best {remote_best} does not beat local {}", self.best());
            return false;
        }
        log::info!("Adopted remote best {remote_best}");
        self.pushed = self.pushed.max(remote_best);
        self.save();
        true
    }

    /// Compare-and-store a live score. A new best is pushed right away so it
    /// reaches the board even if the run is never finished.
    pub fn observe_score(&mut self, score: u32) {
        if self.scores.raise_best(score) {
            self.save();
            self.push_if_new();
        }
    }

    /// Record a finished run. Returns its leaderboard rank.
    pub fn finish_run(&mut self, score: u32, perfect_drops: u32, timestamp: f64) -> Option<usize> {
        let rank = self.scores.add_score(score, perfect_drops, timestamp);
        self.save();
        self.push_if_new();
        rank
    }

    /// Rank a live score would take on the leaderboard
    pub fn potential_rank(&self, score: u32) -> Option<usize> {
        self.scores.potential_rank(score)
    }

    fn push_if_new(&mut self) {
        if self.scores.best > self.pushed {
            self.pushed = self.scores.best;
            self.remote.push_best(self.scores.best);
        }
    }

    fn save(&self) {
        if let Err(e) = self.store.save(&self.scores) {
            log::warn!("Failed to save high scores: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStore, StoreError};
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    struct FakeRemote {
        requested: Cell<bool>,
        inbox: Cell<Option<u32>>,
        pushed: RefCell<Vec<u32>>,
    }

    impl RemoteSync for &FakeRemote {
        fn request_best(&self) {
            self.requested.set(true);
        }

        fn take_best(&self) -> Option<u32> {
            self.inbox.take()
        }

        fn push_best(&self, score: u32) {
            self.pushed.borrow_mut().push(score);
        }
    }

    struct BrokenStore;

    impl ScoreStore for BrokenStore {
        fn load(&self) -> Result<Option<HighScores>, StoreError> {
            Err(StoreError::Unavailable)
        }

        fn save(&self, _scores: &HighScores) -> Result<(), StoreError> {
            Err(StoreError::Unavailable)
        }
    }

    #[test]
    fn test_leaderboard_ordering_and_cap() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score(0, 0, 0.0), None);
        assert_eq!(scores.add_score(5, 1, 1.0), Some(1));
        assert_eq!(scores.add_score(9, 2, 2.0), Some(1));
        assert_eq!(scores.add_score(7, 0, 3.0), Some(2));
        assert_eq!(scores.entries[0].score, 9);
        assert_eq!(scores.best, 9);

        for i in 0..20 {
            scores.add_score(10 + i, 0, 4.0);
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert!(!scores.qualifies(5));
        assert_eq!(scores.potential_rank(100), Some(1));
    }

    #[test]
    fn test_remote_best_adopted_only_if_greater() {
        let remote = FakeRemote::default();
        let store = MemoryStore::default();
        let mut seed = HighScores::new();
        seed.best = 12;
        store.save(&seed).unwrap();

        let mut keeper = ScoreKeeper::open(&store, &remote);
        assert!(remote.requested.get());
        assert_eq!(keeper.best(), 12);

        // Nothing arrived yet
        assert!(!keeper.poll_remote());

        remote.inbox.set(Some(8));
        assert!(!keeper.poll_remote());
        assert_eq!(keeper.best(), 12);

        remote.inbox.set(Some(20));
        assert!(keeper.poll_remote());
        assert_eq!(keeper.best(), 20);
        assert_eq!(store.load().unwrap().unwrap().best, 20);
    }

    #[test]
    fn test_new_best_stored_and_pushed_live() {
        let remote = FakeRemote::default();
        let store = MemoryStore::default();
        let mut keeper = ScoreKeeper::open(&store, &remote);

        for score in 1..=4 {
            keeper.observe_score(score);
        }
        assert_eq!(store.load().unwrap().unwrap().best, 4);
        assert_eq!(*remote.pushed.borrow(), vec![1, 2, 3, 4]);

        // Finishing at the same best does not resend it
        assert_eq!(keeper.finish_run(4, 2, 1000.0), Some(1));
        assert_eq!(*remote.pushed.borrow(), vec![1, 2, 3, 4]);

        // A lower run is recorded but not pushed
        keeper.finish_run(2, 0, 2000.0);
        assert_eq!(*remote.pushed.borrow(), vec![1, 2, 3, 4]);
        assert_eq!(keeper.scores().entries.len(), 2);
    }

    #[test]
    fn test_abandoned_run_best_reaches_remote() {
        let remote = FakeRemote::default();
        let store = MemoryStore::default();
        {
            let mut keeper = ScoreKeeper::open(&store, &remote);
            for score in 1..=5 {
                keeper.observe_score(score);
            }
            // Page closed mid-run: no finish_run
        }
        assert_eq!(remote.pushed.borrow().last(), Some(&5));

        // The next session starts from the stored best and does not resend it
        remote.pushed.borrow_mut().clear();
        let mut keeper = ScoreKeeper::open(&store, &remote);
        assert_eq!(keeper.best(), 5);
        keeper.finish_run(3, 0, 0.0);
        assert!(remote.pushed.borrow().is_empty());
    }

    #[test]
    fn test_potential_rank_of_live_score() {
        let remote = FakeRemote::default();
        let store = MemoryStore::default();
        let mut keeper = ScoreKeeper::open(&store, &remote);
        assert_eq!(keeper.potential_rank(0), None);
        assert_eq!(keeper.potential_rank(3), Some(1));

        keeper.finish_run(6, 0, 0.0);
        keeper.finish_run(2, 0, 1.0);
        assert_eq!(keeper.potential_rank(4), Some(2));
        assert_eq!(keeper.potential_rank(7), Some(1));
    }

    #[test]
    fn test_storage_failures_are_swallowed() {
        let remote = FakeRemote::default();
        let mut keeper = ScoreKeeper::open(BrokenStore, &remote);
        assert_eq!(keeper.best(), 0);
        keeper.observe_score(3);
        assert_eq!(keeper.finish_run(3, 0, 0.0), Some(1));
        assert_eq!(keeper.best(), 3);
    }
}
