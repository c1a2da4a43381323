//! Game state and core simulation types
//!
//! Everything the presentation layer reads lives here. Positions and widths
//! are percentages of the horizontal axis (0-100).

use serde::{Deserialize, Serialize};

use crate::consts::CAMERA_FOLLOW_AFTER;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for a start tap
    #[default]
    Menu,
    /// Active gameplay
    Playing,
    /// Frozen mid-run; engine and motion state untouched
    Paused,
    /// Run ended on a miss
    GameOver,
}

/// Horizontal travel direction of the moving block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Signed unit step along the axis
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }
}

/// A committed block. Never mutated once pushed onto the stack.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacedBlock {
    /// Position in the stack (0 = base)
    pub index: u32,
    pub width: f32,
    pub center: f32,
    /// Landed within tolerance and snapped onto the block below
    pub is_perfect_drop: bool,
    /// Index is a positive multiple of the artifact interval
    pub is_artifact: bool,
}

impl PlacedBlock {
    /// The base block: full width, treated as perfect, never an artifact
    pub fn base(width: f32, center: f32) -> Self {
        Self {
            index: 0,
            width,
            center,
            is_perfect_drop: true,
            is_artifact: false,
        }
    }
}

/// The single live block sliding above the stack
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovingBlock {
    pub width: f32,
    pub center: f32,
    pub direction: Direction,
    /// Percent per tick, always in (0, max_speed]
    pub speed: f32,
}

/// Read-only snapshot of the engine for presentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineState {
    /// Placed blocks, base first. `stack[i].index == i`.
    pub stack: Vec<PlacedBlock>,
    pub moving: MovingBlock,
    /// Successful commits since reset (`stack.len() - 1`)
    pub score: u32,
    pub game_over: bool,
}

impl EngineState {
    /// Top of the stack. The base block is always present.
    pub fn top(&self) -> &PlacedBlock {
        &self.stack[self.stack.len() - 1]
    }

    /// Rows the camera has scrolled to keep the top of the stack in view
    pub fn camera_rows(&self) -> usize {
        self.stack.len().saturating_sub(CAMERA_FOLLOW_AFTER)
    }
}
