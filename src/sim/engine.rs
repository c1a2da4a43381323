//! Stack engine: commit, clip, score and respawn
//!
//! A tap compares the moving block against the top of the stack. A full
//! miss ends the run. Otherwise the overlap becomes the next placed block
//! and a narrower, slightly faster block spawns from a random edge.

use super::difficulty::{is_artifact_index, perfect_width, speed_for_score};
use super::motion::{MotionController, clamp_center};
use super::spawn::{SpawnSide, SpawnSource};
use super::state::{Direction, EngineState, MovingBlock, PlacedBlock};
use crate::tuning::Tuning;

/// How a successful commit landed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropKind {
    /// Clipped to the overlap
    Clipped,
    /// Within tolerance, snapped to the block below at full width
    Perfect,
    /// Perfect drop on an artifact index, width bonus applied
    Expanded,
}

/// Outcome of a tap
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommitResult {
    /// Block pushed by this tap, `None` on a miss or an ignored tap
    pub appended: Option<PlacedBlock>,
    pub kind: Option<DropKind>,
    pub score: u32,
    pub game_over: bool,
    /// This commit pushed the score past the run's starting best
    pub record_crossed: bool,
}

/// Owns the stack and the moving block for one run
#[derive(Debug, Clone)]
pub struct StackEngine {
    tuning: Tuning,
    spawner: SpawnSource,
    stack: Vec<PlacedBlock>,
    motion: MotionController,
    score: u32,
    active: bool,
    game_over: bool,
    /// Best score when the run started; crossing it is a record
    starting_best: u32,
}

impl StackEngine {
    /// Engine with default tuning and an entropy-seeded spawner
    pub fn new() -> Self {
        Self::with_tuning(Tuning::default(), SpawnSource::from_entropy())
    }

    /// Engine with explicit tuning and spawn source. Starts inactive.
    pub fn with_tuning(tuning: Tuning, spawner: SpawnSource) -> Self {
        let (stack, moving) = initial_layout(&tuning);
        Self {
            tuning,
            spawner,
            stack,
            motion: MotionController::new(moving),
            score: 0,
            active: false,
            game_over: false,
            starting_best: 0,
        }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Best score the next run must beat to set a record
    pub fn set_starting_best(&mut self, best: u32) {
        self.starting_best = best;
    }

    /// Start a fresh run: base block only, full-width block at initial speed.
    ///
    /// Ignored while a run is in progress.
    pub fn reset(&mut self) -> EngineState {
        if self.active {
            log::debug!("reset ignored: run in progress");
            return self.snapshot();
        }
        let (stack, moving) = initial_layout(&self.tuning);
        self.stack = stack;
        self.motion.replace(moving);
        self.score = 0;
        self.game_over = false;
        self.active = true;
        log::info!("Run started (best to beat: {})", self.starting_best);
        self.snapshot()
    }

    /// Advance the moving block one step. No-op unless a run is active.
    pub fn tick(&mut self) -> MovingBlock {
        if self.active {
            self.motion.advance()
        } else {
            self.motion.block()
        }
    }

    /// Commit the moving block at its current position
    pub fn tap(&mut self) -> CommitResult {
        if !self.active {
            return CommitResult {
                appended: None,
                kind: None,
                score: self.score,
                game_over: self.game_over,
                record_crossed: false,
            };
        }

        let top = *self.top();
        let moving = self.motion.block();

        let offset = moving.center - top.center;
        let abs_offset = offset.abs();
        let overlap_width = top.width - abs_offset;

        if overlap_width <= 0.0 {
            self.active = false;
            self.game_over = true;
            log::info!(
                "Game over: missed by {:.2} at score {}",
                -overlap_width,
                self.score
            );
            return CommitResult {
                appended: None,
                kind: None,
                score: self.score,
                game_over: true,
                record_crossed: false,
            };
        }

        let index = self.score + 1;
        let is_artifact = is_artifact_index(&self.tuning, index);

        let (width, center, kind) = if abs_offset <= self.tuning.tolerance {
            let width = perfect_width(&self.tuning, top.width, is_artifact);
            let kind = if is_artifact {
                DropKind::Expanded
            } else {
                DropKind::Perfect
            };
            (width, top.center, kind)
        } else {
            (overlap_width, top.center + offset / 2.0, DropKind::Clipped)
        };

        let block = PlacedBlock {
            index,
            width,
            center,
            is_perfect_drop: kind != DropKind::Clipped,
            is_artifact,
        };
        self.stack.push(block);
        self.score = index;

        let record_crossed = self.starting_best > 0 && self.score == self.starting_best + 1;
        if record_crossed {
            log::info!("New record: {}", self.score);
        }

        let side = self.spawner.next_side();
        let next = spawn_block(&self.tuning, width, self.score, side);
        log::debug!(
            "Placed #{index} {kind:?} width={width:.2} center={center:.2}; next from {side:?} at speed {:.4}",
            next.speed
        );
        self.motion.replace(next);

        CommitResult {
            appended: Some(block),
            kind: Some(kind),
            score: self.score,
            game_over: false,
            record_crossed,
        }
    }

    /// Top of the stack
    pub fn top(&self) -> &PlacedBlock {
        &self.stack[self.stack.len() - 1]
    }

    pub fn stack(&self) -> &[PlacedBlock] {
        &self.stack
    }

    pub fn moving(&self) -> MovingBlock {
        self.motion.block()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// A run is in progress and accepts taps
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether the block currently moving will be an artifact if placed
    pub fn next_is_artifact(&self) -> bool {
        is_artifact_index(&self.tuning, self.score + 1)
    }

    /// Offset of the moving block from the top of the stack
    pub fn offset(&self) -> f32 {
        self.motion.block().center - self.top().center
    }

    pub fn snapshot(&self) -> EngineState {
        EngineState {
            stack: self.stack.clone(),
            moving: self.motion.block(),
            score: self.score,
            game_over: self.game_over,
        }
    }

    /// Place the moving block directly (tests and replays only)
    #[doc(hidden)]
    pub fn set_moving_center_for_test(&mut self, center: f32) {
        self.motion.set_center_for_test(center);
    }
}

impl Default for StackEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Base block plus the first moving block, which starts over the base
fn initial_layout(tuning: &Tuning) -> (Vec<PlacedBlock>, MovingBlock) {
    let base = PlacedBlock::base(tuning.initial_width, tuning.base_center);
    let moving = MovingBlock {
        width: tuning.initial_width,
        center: tuning.base_center,
        direction: Direction::Right,
        speed: tuning.initial_speed,
    };
    (vec![base], moving)
}

/// Next moving block, entering from `side` already clamped onto the axis
fn spawn_block(tuning: &Tuning, width: f32, score: u32, side: SpawnSide) -> MovingBlock {
    let edge = match side {
        SpawnSide::Left => crate::consts::AXIS_MIN,
        SpawnSide::Right => crate::consts::AXIS_MAX,
    };
    MovingBlock {
        width,
        center: clamp_center(edge, width),
        direction: side.direction(),
        speed: speed_for_score(tuning, score),
    }
}
