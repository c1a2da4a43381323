//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Discrete ticks only, no wall clock
//! - Seeded or scripted spawn sides only
//! - No rendering, storage or platform dependencies

pub mod difficulty;
pub mod engine;
pub mod events;
pub mod motion;
pub mod session;
pub mod spawn;
pub mod state;
pub mod tick;

pub use difficulty::{is_artifact_index, speed_for_score};
pub use engine::{CommitResult, DropKind, StackEngine};
pub use events::{Effect, EffectKind, EffectQueue, GameEvent};
pub use motion::{MotionController, advance};
pub use session::{RunStats, Session};
pub use spawn::{SpawnSide, SpawnSource};
pub use state::{Direction, EngineState, GamePhase, MovingBlock, PlacedBlock};
pub use tick::{TickInput, tick};
