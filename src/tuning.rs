//! Data-driven game balance
//!
//! Every number the engine consults lives in [`Tuning`]. The defaults mirror
//! [`crate::consts`]; alternative balances can be loaded from JSON.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Rejected tuning values
#[derive(Debug, Clone, PartialEq)]
pub enum TuningError {
    /// JSON could not be parsed
    Parse(String),
    /// A width that must be in (0, 100] is not
    Width { field: &'static str, value: f32 },
    /// A speed that must be positive is not
    Speed { field: &'static str, value: f32 },
    /// initial_speed exceeds max_speed
    SpeedOrder { initial: f32, max: f32 },
    /// Tolerance is negative
    Tolerance(f32),
    /// Artifact interval of zero
    ArtifactInterval,
    /// Base block would hang off the axis
    BaseCenter(f32),
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Parse(msg) => write!(f, "invalid tuning json: {msg}"),
            TuningError::Width { field, value } => {
                write!(f, "{field} must be in (0, 100], got {value}")
            }
            TuningError::Speed { field, value } => {
                write!(f, "{field} must be positive, got {value}")
            }
            TuningError::SpeedOrder { initial, max } => {
                write!(f, "initial_speed {initial} exceeds max_speed {max}")
            }
            TuningError::Tolerance(value) => {
                write!(f, "tolerance must not be negative, got {value}")
            }
            TuningError::ArtifactInterval => write!(f, "artifact_interval must be at least 1"),
            TuningError::BaseCenter(value) => {
                write!(f, "base_center {value} puts the base block off the axis")
            }
        }
    }
}

impl std::error::Error for TuningError {}

/// Game balance knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Width of the base block and of the first moving block
    pub initial_width: f32,
    /// Center of the base block
    pub base_center: f32,
    /// Moving block speed right after reset (percent per tick)
    pub initial_speed: f32,
    /// Speed gained per point, before scaling by `speed_step_scale`
    pub speed_increment: f32,
    pub speed_step_scale: f32,
    /// Speed ceiling
    pub max_speed: f32,
    /// Max offset magnitude still counted as perfect
    pub tolerance: f32,
    /// Every Nth placed block is an artifact
    pub artifact_interval: u32,
    /// Width regained on a perfect artifact drop (capped at initial_width)
    pub artifact_bonus_width: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            initial_width: INITIAL_WIDTH,
            base_center: BASE_CENTER,
            initial_speed: INITIAL_SPEED,
            speed_increment: SPEED_INCREMENT,
            speed_step_scale: SPEED_STEP_SCALE,
            max_speed: MAX_SPEED,
            tolerance: TOLERANCE,
            artifact_interval: ARTIFACT_INTERVAL,
            artifact_bonus_width: ARTIFACT_BONUS_WIDTH,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON balance file. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning =
            serde_json::from_str(json).map_err(|e| TuningError::Parse(e.to_string()))?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Per-point speed step applied by the difficulty curve
    #[inline]
    pub fn speed_step(&self) -> f32 {
        self.speed_increment * self.speed_step_scale
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        let width_ok = |w: f32| w > 0.0 && w <= AXIS_MAX;
        if !width_ok(self.initial_width) {
            return Err(TuningError::Width {
                field: "initial_width",
                value: self.initial_width,
            });
        }
        if !(self.artifact_bonus_width >= 0.0 && self.artifact_bonus_width <= AXIS_MAX) {
            return Err(TuningError::Width {
                field: "artifact_bonus_width",
                value: self.artifact_bonus_width,
            });
        }
        if !(self.initial_speed > 0.0) {
            return Err(TuningError::Speed {
                field: "initial_speed",
                value: self.initial_speed,
            });
        }
        if !(self.max_speed > 0.0) {
            return Err(TuningError::Speed {
                field: "max_speed",
                value: self.max_speed,
            });
        }
        if !(self.speed_step() >= 0.0) {
            return Err(TuningError::Speed {
                field: "speed_increment",
                value: self.speed_increment,
            });
        }
        if self.initial_speed > self.max_speed {
            return Err(TuningError::SpeedOrder {
                initial: self.initial_speed,
                max: self.max_speed,
            });
        }
        if !(self.tolerance >= 0.0) {
            return Err(TuningError::Tolerance(self.tolerance));
        }
        if self.artifact_interval == 0 {
            return Err(TuningError::ArtifactInterval);
        }
        let half_width = crate::half(self.initial_width);
        if !(self.base_center - half_width >= AXIS_MIN && self.base_center + half_width <= AXIS_MAX) {
            return Err(TuningError::BaseCenter(self.base_center));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert!((tuning.speed_step() - 0.0001).abs() < 1e-9);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let tuning = Tuning::from_json(r#"{ "tolerance": 1.5, "artifact_interval": 3 }"#).unwrap();
        assert_eq!(tuning.tolerance, 1.5);
        assert_eq!(tuning.artifact_interval, 3);
        assert_eq!(tuning.initial_width, INITIAL_WIDTH);
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut tuning = Tuning::default();
        tuning.artifact_interval = 0;
        assert_eq!(tuning.validate(), Err(TuningError::ArtifactInterval));

        let mut tuning = Tuning::default();
        tuning.initial_speed = 3.0;
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::SpeedOrder { .. })
        ));

        let mut tuning = Tuning::default();
        tuning.base_center = 10.0;
        assert!(matches!(tuning.validate(), Err(TuningError::BaseCenter(_))));

        let mut tuning = Tuning::default();
        tuning.base_center = f32::NAN;
        assert!(matches!(tuning.validate(), Err(TuningError::BaseCenter(_))));

        let mut tuning = Tuning::default();
        tuning.artifact_bonus_width = f32::NAN;
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::Width {
                field: "artifact_bonus_width",
                ..
            })
        ));

        let mut tuning = Tuning::default();
        tuning.speed_increment = f32::NAN;
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::Speed {
                field: "speed_increment",
                ..
            })
        ));

        assert!(matches!(
            Tuning::from_json("not json"),
            Err(TuningError::Parse(_))
        ));
    }
}
