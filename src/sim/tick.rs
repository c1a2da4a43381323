//! Fixed-step frame update
//!
//! The only entry point that mutates a [`Session`]. Each call handles the
//! frame's inputs in a fixed order: pause toggle, start, taps (against the
//! position from the previous frame), then one motion step.

use super::events::GameEvent;
use super::session::Session;
use super::state::GamePhase;

/// Input commands for a single frame (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Start a run (from menu or game over)
    pub start: bool,
    /// Taps received since the last frame
    pub taps: u32,
    /// Pause toggle
    pub pause: bool,
    /// Demo mode - tap automatically when the drop would be perfect
    pub autoplay: bool,
}

impl TickInput {
    pub fn tap() -> Self {
        Self {
            taps: 1,
            ..Default::default()
        }
    }

    pub fn start() -> Self {
        Self {
            start: true,
            ..Default::default()
        }
    }
}

/// Advance the session by one frame, returning what happened
pub fn tick(session: &mut Session, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();
    session.frame += 1;

    if input.pause {
        session.toggle_pause(&mut events);
    }

    // A start tap never doubles as a commit
    let was_playing = session.phase() == GamePhase::Playing;
    if input.start {
        session.start(&mut events);
    }

    if was_playing {
        let mut taps = input.taps;
        if input.autoplay && taps == 0 {
            let engine = session.engine();
            if engine.offset().abs() <= engine.tuning().tolerance {
                taps = 1;
            }
        }

        for _ in 0..taps {
            if !session.commit(&mut events) {
                break;
            }
        }

        if session.phase() == GamePhase::Playing {
            session.advance_motion();
        }
    }

    session.age_effects();
    events
}
