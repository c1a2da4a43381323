//! Horizontal motion of the moving block
//!
//! The block slides at a constant speed and reflects off the axis edges.
//! Both edges are checked on every step, so a block whose step is wider
//! than the free travel range still ends up clamped inside the axis.

use super::state::{Direction, MovingBlock};
use crate::consts::{AXIS_MAX, AXIS_MIN};
use crate::half;

/// Advance a moving block by one tick
pub fn advance(block: MovingBlock) -> MovingBlock {
    let mut next = block;
    next.center = block.center + block.speed * block.direction.sign();

    let max_center = AXIS_MAX - half(block.width);
    let min_center = AXIS_MIN + half(block.width);

    if next.center > max_center {
        next.center = max_center;
        next.direction = Direction::Left;
    }
    if next.center < min_center {
        next.center = min_center;
        next.direction = Direction::Right;
    }

    next
}

/// Clamp a center so the whole block lies on the axis
pub fn clamp_center(center: f32, width: f32) -> f32 {
    center.clamp(AXIS_MIN + half(width), AXIS_MAX - half(width))
}

/// Owns the live moving block and steps it once per tick
#[derive(Debug, Clone, PartialEq)]
pub struct MotionController {
    block: MovingBlock,
}

impl MotionController {
    pub fn new(block: MovingBlock) -> Self {
        Self { block }
    }

    /// Current block
    #[inline]
    pub fn block(&self) -> MovingBlock {
        self.block
    }

    /// Step one tick and return the new state
    pub fn advance(&mut self) -> MovingBlock {
        self.block = advance(self.block);
        self.block
    }

    /// Replace the block wholesale with a freshly spawned one
    pub fn replace(&mut self, block: MovingBlock) {
        self.block = block;
    }

    /// Teleport the block (tests and replays only)
    #[doc(hidden)]
    pub fn set_center_for_test(&mut self, center: f32) {
        self.block.center = center;
    }
}
