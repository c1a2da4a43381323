//! Side-channel notifications
//!
//! Events describe what happened during a tick so presentation can react
//! (popups, haptics, sound). Effects are the transient on-screen popups
//! derived from them. Neither feeds back into the engine.

use serde::{Deserialize, Serialize};

use super::state::PlacedBlock;
use crate::consts::{BASE_CENTER, TICKS_PER_SECOND};

/// Lifetime of a minor popup (PERFECT!, EXPANDED!), 800 ms
pub const MINOR_EFFECT_TICKS: u32 = TICKS_PER_SECOND * 4 / 5;
/// Lifetime of a major popup (NEW RECORD!), 2 s
pub const MAJOR_EFFECT_TICKS: u32 = TICKS_PER_SECOND * 2;

/// Something observable happened during a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// A run began
    Started,
    /// A block landed
    Placed(PlacedBlock),
    /// The placed block was a perfect drop without bonus
    Perfect { index: u32, center: f32 },
    /// The placed block was a perfect artifact drop and regained width
    Expanded { index: u32, center: f32, width: f32 },
    /// Score just passed the best at the start of the run
    NewRecord { score: u32 },
    /// Missed; the run is over
    GameOver { score: u32 },
    Paused,
    Resumed,
}

/// Popup text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    Perfect,
    Expanded,
    NewRecord,
}

impl EffectKind {
    pub fn text(&self) -> &'static str {
        match self {
            EffectKind::Perfect => "PERFECT!",
            EffectKind::Expanded => "EXPANDED!",
            EffectKind::NewRecord => "NEW RECORD!",
        }
    }

    /// Major effects are larger and linger longer
    pub fn is_major(&self) -> bool {
        matches!(self, EffectKind::NewRecord)
    }
}

/// A transient popup anchored on the axis at a stack row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Effect {
    pub id: u32,
    pub kind: EffectKind,
    /// Horizontal anchor (percent)
    pub x: f32,
    /// Stack row the popup appears at
    pub row: u32,
    pub ttl_ticks: u32,
}

/// Live popups, aged once per frame
#[derive(Debug, Clone, Default)]
pub struct EffectQueue {
    effects: Vec<Effect>,
    next_id: u32,
}

impl EffectQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: EffectKind, x: f32, row: u32) {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        let ttl_ticks = if kind.is_major() {
            MAJOR_EFFECT_TICKS
        } else {
            MINOR_EFFECT_TICKS
        };
        self.effects.push(Effect {
            id,
            kind,
            x,
            row,
            ttl_ticks,
        });
    }

    /// Derive popups from an event
    pub fn observe(&mut self, event: &GameEvent) {
        match *event {
            GameEvent::Perfect { index, center } => self.push(EffectKind::Perfect, center, index),
            GameEvent::Expanded { index, center, .. } => {
                self.push(EffectKind::Expanded, center, index)
            }
            GameEvent::NewRecord { score } => self.push(EffectKind::NewRecord, BASE_CENTER, score + 2),
            _ => {}
        }
    }

    /// Age every popup by one frame and drop the expired ones
    pub fn age(&mut self) {
        for effect in &mut self.effects {
            effect.ttl_ticks = effect.ttl_ticks.saturating_sub(1);
        }
        self.effects.retain(|e| e.ttl_ticks > 0);
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Effect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}
