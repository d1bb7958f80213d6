//! Data-driven game balance
//!
//! Every knob a run reads lives here. `Tuning::default()` reproduces the
//! constants in `crate::consts`; a JSON document can override any subset.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Rejected tuning documents
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("Tuning parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid tuning value: {field} {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Balance parameters for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Scroll speed at the start of a run (units/s)
    pub base_speed: f32,
    /// Speed gained per elapsed millisecond
    pub acceleration: f32,
    /// Optional ceiling for the scroll speed. `None` lets speed grow forever.
    pub speed_cap: Option<f32>,

    pub obstacle_min_distance: u32,
    pub obstacle_max_distance: u32,
    pub obstacle_min_height: u32,
    pub obstacle_max_height: u32,

    /// Chance that an obstacle group carries a powerup (0.0 - 1.0)
    pub powerup_chance: f64,
    /// Seconds a collected powerup stays active
    pub powerup_duration: f32,
    pub magnet_radius: f32,

    pub coin_value: u32,
    pub distance_multiplier: f32,

    pub viewport_width: f32,
    pub viewport_height: f32,

    /// Fixed RNG seed (replays), otherwise the caller picks one
    pub seed: Option<u64>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            base_speed: GAME_SPEED,
            acceleration: GAME_ACCELERATION,
            speed_cap: None,

            obstacle_min_distance: OBSTACLE_MIN_DISTANCE,
            obstacle_max_distance: OBSTACLE_MAX_DISTANCE,
            obstacle_min_height: OBSTACLE_MIN_HEIGHT,
            obstacle_max_height: OBSTACLE_MAX_HEIGHT,

            powerup_chance: POWERUP_SPAWN_CHANCE,
            powerup_duration: POWERUP_DURATION,
            magnet_radius: MAGNET_RADIUS,

            coin_value: COIN_VALUE,
            distance_multiplier: DISTANCE_SCORE_MULTIPLIER,

            viewport_width: GAME_WIDTH,
            viewport_height: GAME_HEIGHT,

            seed: None,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Tuning with the documented top speed enforced
    pub fn capped() -> Self {
        Self {
            speed_cap: Some(MAX_GAME_SPEED),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> TuningError {
            TuningError::Invalid {
                field,
                reason: reason.into(),
            }
        }

        if !(self.base_speed > 0.0) {
            return Err(invalid("base_speed", "must be positive"));
        }
        // Speed must never decrease during a run
        if !(self.acceleration >= 0.0) {
            return Err(invalid("acceleration", "must not be negative"));
        }
        if let Some(cap) = self.speed_cap {
            if !(cap >= self.base_speed) {
                return Err(invalid("speed_cap", "must be at least base_speed"));
            }
        }
        if self.obstacle_min_distance == 0 || self.obstacle_min_distance > self.obstacle_max_distance {
            return Err(invalid(
                "obstacle_min_distance",
                format!(
                    "must be in 1..={} (got {})",
                    self.obstacle_max_distance, self.obstacle_min_distance
                ),
            ));
        }
        if self.obstacle_min_height == 0 || self.obstacle_min_height > self.obstacle_max_height {
            return Err(invalid(
                "obstacle_min_height",
                format!(
                    "must be in 1..={} (got {})",
                    self.obstacle_max_height, self.obstacle_min_height
                ),
            ));
        }
        if !(0.0..=1.0).contains(&self.powerup_chance) {
            return Err(invalid("powerup_chance", "must be between 0 and 1"));
        }
        if !(self.powerup_duration > 0.0) {
            return Err(invalid("powerup_duration", "must be positive"));
        }
        if !(self.magnet_radius > 0.0) {
            return Err(invalid("magnet_radius", "must be positive"));
        }
        if !(self.distance_multiplier >= 0.0) {
            return Err(invalid("distance_multiplier", "must not be negative"));
        }
        if !(self.viewport_width > 0.0 && self.viewport_height > GROUND_HEIGHT) {
            return Err(invalid("viewport", "too small to hold the ground strip"));
        }
        Ok(())
    }

    /// X coordinate where new obstacles appear
    pub fn spawn_x(&self) -> f32 {
        self.viewport_width + SPAWN_MARGIN
    }

    /// Y coordinate of the ground line
    pub fn ground_y(&self) -> f32 {
        crate::ground_line(self.viewport_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_consts() {
        let tuning = Tuning::default();
        assert_eq!(tuning.base_speed, 300.0);
        assert_eq!(tuning.coin_value, 10);
        assert_eq!(tuning.speed_cap, None);
        assert_eq!(tuning.spawn_x(), 900.0);
        assert_eq!(tuning.ground_y(), 536.0);
        assert!(tuning.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{"acceleration": 0.0, "seed": 7}"#).unwrap();
        assert_eq!(tuning.acceleration, 0.0);
        assert_eq!(tuning.seed, Some(7));
        assert_eq!(tuning.obstacle_max_distance, 800);
    }

    #[test]
    fn test_rejects_inverted_ranges() {
        let err = Tuning::from_json(r#"{"obstacle_min_distance": 900}"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "obstacle_min_distance",
                ..
            }
        ));

        let err = Tuning::from_json(r#"{"acceleration": -1.0}"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "acceleration", .. }));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            Tuning::from_json("{not json"),
            Err(TuningError::Parse(_))
        ));
    }

    #[test]
    fn test_capped_preset() {
        let tuning = Tuning::capped();
        assert_eq!(tuning.speed_cap, Some(MAX_GAME_SPEED));
        assert!(tuning.validate().is_ok());
    }
}
