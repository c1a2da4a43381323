//! A play session: phase machine around the stack engine
//!
//! The session is the single owner of all mutable game state. Frame and
//! tap events reach it only through [`super::tick::tick`].

use super::engine::{CommitResult, DropKind, StackEngine};
use super::events::{EffectQueue, GameEvent};
use super::state::{EngineState, GamePhase};

/// Per-run counters for the game-over screen and the leaderboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub perfect_drops: u32,
    /// Perfect artifact drops that regained width
    pub expansions: u32,
    /// Artifact blocks placed, perfect or not
    pub artifacts: u32,
    pub current_streak: u32,
    pub best_streak: u32,
}

impl RunStats {
    fn record(&mut self, result: &CommitResult) {
        let Some(block) = result.appended else {
            return;
        };
        if block.is_artifact {
            self.artifacts += 1;
        }
        match result.kind {
            Some(DropKind::Perfect) | Some(DropKind::Expanded) => {
                self.perfect_drops += 1;
                self.current_streak += 1;
                self.best_streak = self.best_streak.max(self.current_streak);
                if result.kind == Some(DropKind::Expanded) {
                    self.expansions += 1;
                }
            }
            _ => self.current_streak = 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    engine: StackEngine,
    phase: GamePhase,
    effects: EffectQueue,
    stats: RunStats,
    /// Best score known when the next run starts
    best: u32,
    show_effects: bool,
    /// Frames processed since the session was created
    pub(super) frame: u64,
}

impl Session {
    pub fn new(engine: StackEngine) -> Self {
        Self {
            engine,
            phase: GamePhase::Menu,
            effects: EffectQueue::new(),
            stats: RunStats::default(),
            best: 0,
            show_effects: true,
            frame: 0,
        }
    }

    /// Disable popups (events are still emitted)
    pub fn with_effects(mut self, enabled: bool) -> Self {
        self.show_effects = enabled;
        self
    }

    /// Toggle popups mid-session. Disabling drops any that are showing.
    pub fn set_effects(&mut self, enabled: bool) {
        self.show_effects = enabled;
        if !enabled {
            self.effects.clear();
        }
    }

    /// Best score to beat; takes effect at the next start
    pub fn set_best(&mut self, best: u32) {
        self.best = best;
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn engine(&self) -> &StackEngine {
        &self.engine
    }

    pub fn snapshot(&self) -> EngineState {
        self.engine.snapshot()
    }

    pub fn score(&self) -> u32 {
        self.engine.score()
    }

    pub fn stats(&self) -> RunStats {
        self.stats
    }

    pub fn effects(&self) -> &EffectQueue {
        &self.effects
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Begin a run from the menu or the game-over screen
    pub(super) fn start(&mut self, events: &mut Vec<GameEvent>) {
        if !matches!(self.phase, GamePhase::Menu | GamePhase::GameOver) {
            return;
        }
        self.engine.set_starting_best(self.best);
        self.engine.reset();
        self.stats = RunStats::default();
        self.effects.clear();
        self.phase = GamePhase::Playing;
        events.push(GameEvent::Started);
    }

    pub(super) fn toggle_pause(&mut self, events: &mut Vec<GameEvent>) {
        match self.phase {
            GamePhase::Playing => {
                self.phase = GamePhase::Paused;
                events.push(GameEvent::Paused);
            }
            GamePhase::Paused => {
                self.phase = GamePhase::Playing;
                events.push(GameEvent::Resumed);
            }
            _ => {}
        }
    }

    /// Commit one tap. Returns false once the run has ended.
    pub(super) fn commit(&mut self, events: &mut Vec<GameEvent>) -> bool {
        let result = self.engine.tap();
        self.stats.record(&result);

        if result.game_over {
            self.phase = GamePhase::GameOver;
            events.push(GameEvent::GameOver {
                score: result.score,
            });
            return false;
        }

        if let Some(block) = result.appended {
            let mut emitted = vec![GameEvent::Placed(block)];
            match result.kind {
                Some(DropKind::Perfect) => emitted.push(GameEvent::Perfect {
                    index: block.index,
                    center: block.center,
                }),
                Some(DropKind::Expanded) => emitted.push(GameEvent::Expanded {
                    index: block.index,
                    center: block.center,
                    width: block.width,
                }),
                _ => {}
            }
            if result.record_crossed {
                emitted.push(GameEvent::NewRecord {
                    score: result.score,
                });
            }
            if self.show_effects {
                for event in &emitted {
                    self.effects.observe(event);
                }
            }
            events.extend(emitted);
        }
        true
    }

    pub(super) fn advance_motion(&mut self) {
        self.engine.tick();
    }

    pub(super) fn age_effects(&mut self) {
        self.effects.age();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::PlacedBlock;

    fn placed(index: u32, perfect: bool, artifact: bool) -> CommitResult {
        CommitResult {
            appended: Some(PlacedBlock {
                index,
                width: 50.0,
                center: 50.0,
                is_perfect_drop: perfect,
                is_artifact: artifact,
            }),
            kind: Some(if perfect {
                if artifact {
                    DropKind::Expanded
                } else {
                    DropKind::Perfect
                }
            } else {
                DropKind::Clipped
            }),
            score: index,
            game_over: false,
            record_crossed: false,
        }
    }

    #[test]
    fn test_run_stats_streaks() {
        let mut stats = RunStats::default();
        stats.record(&placed(1, true, false));
        stats.record(&placed(2, true, false));
        stats.record(&placed(3, false, false));
        stats.record(&placed(4, true, false));
        stats.record(&placed(5, true, true));
        assert_eq!(stats.perfect_drops, 4);
        assert_eq!(stats.expansions, 1);
        assert_eq!(stats.artifacts, 1);
        assert_eq!(stats.best_streak, 2);
        assert_eq!(stats.current_streak, 2);
    }

    #[test]
    fn test_clipped_artifact_counts_as_artifact_only() {
        let mut stats = RunStats::default();
        stats.record(&placed(5, false, true));
        assert_eq!(stats.artifacts, 1);
        assert_eq!(stats.expansions, 0);
        assert_eq!(stats.perfect_drops, 0);
    }
}
