//! Difficulty curve and artifact cadence

use crate::tuning::Tuning;

/// Speed of the block spawned after `score` successful commits.
///
/// Non-decreasing in `score` and never above `max_speed`.
pub fn speed_for_score(tuning: &Tuning, score: u32) -> f32 {
    (tuning.initial_speed + score as f32 * tuning.speed_step()).min(tuning.max_speed)
}

/// Whether the block at stack position `index` is an artifact
#[inline]
pub fn is_artifact_index(tuning: &Tuning, index: u32) -> bool {
    index > 0 && index % tuning.artifact_interval == 0
}

/// Width of a perfect drop onto a block of `below_width`
pub fn perfect_width(tuning: &Tuning, below_width: f32, artifact: bool) -> f32 {
    if artifact {
        (below_width + tuning.artifact_bonus_width).min(tuning.initial_width)
    } else {
        below_width
    }
}
