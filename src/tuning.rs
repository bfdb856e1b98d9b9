//! Data-driven game balance
//!
//! Every gameplay constant lives in [`Tuning`]. Defaults reproduce the shipped
//! game; a JSON document may override any subset of fields.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::{CollisionMode, JumpMode};

/// Errors produced while loading or validating a [`Tuning`]
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to parse tuning JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("`{field}` must be positive and finite, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("`{field}` range is empty: min {min} >= max {max}")]
    EmptyRange {
        field: &'static str,
        min: f64,
        max: f64,
    },
    #[error("max platform step {step} exceeds the reachable jump height {reach}")]
    Unreachable { step: f64, reach: f64 },
    #[error("platform count must be at least 2, got {0}")]
    PoolTooSmall(usize),
}

/// Tunable gameplay parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    /// Downward acceleration (units/s²)
    pub gravity: f64,
    /// Vertical launch speed of a jump (units/s)
    pub jump_power: f64,
    /// Horizontal speed at full intent (units/s)
    pub move_speed: f64,
    /// Horizontal speed multiplier while airborne
    pub air_control: f64,
    /// Full extents of the player box
    pub player_size: DVec3,
    /// Per-tick squash approach rate while grounded
    pub squash_grounded_rate: f64,
    /// Per-tick squash approach rate while airborne
    pub squash_airborne_rate: f64,
    pub jump_mode: JumpMode,
    pub collision_mode: CollisionMode,

    // === Frame clock ===
    /// Largest integration step (s); longer frames are clamped
    pub max_dt: f64,
    /// Smallest integration step (s); zero/negative frames are raised to it
    pub min_dt: f64,

    // === Platforms ===
    /// Live platforms kept in the streaming window, spawn platform included
    pub platform_count: usize,
    pub spawn_size: DVec3,
    pub platform_thickness: f64,
    pub platform_min_size: f64,
    pub platform_max_size: f64,
    pub min_y_step: f64,
    pub max_y_step: f64,
    /// Largest horizontal offset between consecutive platforms
    pub max_xz_step: f64,
    /// Smallest horizontal offset between consecutive platforms
    pub min_xz_gap: f64,
    /// Platforms further than this below the player are evicted
    pub evict_distance: f64,
    /// Falling this far below the lowest platform resets the run
    pub fall_depth: f64,

    // === Camera ===
    pub camera_offset: DVec3,
    /// Rotation of the camera offset around the player (radians)
    pub camera_yaw: f64,
    pub camera_smoothing: f64,
    pub camera_eye_height: f64,
    pub camera_start: DVec3,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 30.0,
            jump_power: 20.0,
            move_speed: 15.0,
            air_control: 0.6,
            player_size: DVec3::new(0.6, 1.0, 0.6),
            squash_grounded_rate: 0.2,
            squash_airborne_rate: 0.15,
            jump_mode: JumpMode::AutoBounce,
            collision_mode: CollisionMode::TopBottom,

            max_dt: 0.05,
            min_dt: 1.0e-4,

            platform_count: 28,
            spawn_size: DVec3::new(4.0, 0.6, 4.0),
            platform_thickness: 0.5,
            platform_min_size: 2.0,
            platform_max_size: 5.0,
            min_y_step: 4.0,
            max_y_step: 6.0,
            max_xz_step: 8.0,
            min_xz_gap: 2.0,
            evict_distance: 30.0,
            fall_depth: 60.0,

            camera_offset: DVec3::new(0.0, 6.0, 12.0),
            camera_yaw: -0.35,
            camera_smoothing: 0.15,
            camera_eye_height: 0.9,
            camera_start: DVec3::new(0.0, 8.0, 14.0),
        }
    }
}

impl Tuning {
    /// Parse a JSON override document and validate the result
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Apex height of a jump launched at `jump_power` under `gravity`
    pub fn max_jump_height(&self) -> f64 {
        self.jump_power * self.jump_power / (2.0 * self.gravity)
    }

    /// Check every invariant the simulation relies on
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("gravity", self.gravity),
            ("jump_power", self.jump_power),
            ("move_speed", self.move_speed),
            ("air_control", self.air_control),
            ("max_dt", self.max_dt),
            ("min_dt", self.min_dt),
            ("platform_thickness", self.platform_thickness),
            ("platform_min_size", self.platform_min_size),
            ("min_y_step", self.min_y_step),
            ("max_xz_step", self.max_xz_step),
            ("evict_distance", self.evict_distance),
            ("fall_depth", self.fall_depth),
            ("camera_smoothing", self.camera_smoothing),
        ];
        for (field, value) in positive {
            check_positive(field, value)?;
        }
        for (field, size) in [
            ("player_size", self.player_size),
            ("spawn_size", self.spawn_size),
        ] {
            for value in size.to_array() {
                check_positive(field, value)?;
            }
        }

        check_range("dt", self.min_dt, self.max_dt)?;
        check_range("platform_size", self.platform_min_size, self.platform_max_size)?;
        check_range("y_step", self.min_y_step, self.max_y_step)?;
        if self.min_xz_gap < 0.0 || self.min_xz_gap > self.max_xz_step {
            return Err(TuningError::EmptyRange {
                field: "xz_step",
                min: self.min_xz_gap,
                max: self.max_xz_step,
            });
        }

        if self.platform_count < 2 {
            return Err(TuningError::PoolTooSmall(self.platform_count));
        }

        let reach = self.max_jump_height();
        if self.max_y_step > reach {
            return Err(TuningError::Unreachable {
                step: self.max_y_step,
                reach,
            });
        }

        Ok(())
    }
}

fn check_positive(field: &'static str, value: f64) -> Result<(), TuningError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(TuningError::NotPositive { field, value })
    }
}

fn check_range(field: &'static str, min: f64, max: f64) -> Result<(), TuningError> {
    if min < max {
        Ok(())
    } else {
        Err(TuningError::EmptyRange { field, min, max })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_default_jump_reaches_max_step() {
        let tuning = Tuning::default();
        // 20² / 60
        assert!((tuning.max_jump_height() - 6.666_666).abs() < 1e-3);
        assert!(tuning.max_y_step <= tuning.max_jump_height());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "gravity": 25.0, "jump_mode": "OnInput" }"#).unwrap();
        assert_eq!(tuning.gravity, 25.0);
        assert_eq!(tuning.jump_mode, JumpMode::OnInput);
        assert_eq!(tuning.platform_count, 28);
    }

    #[test]
    fn test_unreachable_step_rejected() {
        let result = Tuning::from_json(r#"{ "max_y_step": 9.0 }"#);
        assert!(matches!(result, Err(TuningError::Unreachable { .. })));
    }

    #[test]
    fn test_bad_json_rejected() {
        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(TuningError::Json(_))
        ));
    }

    #[test]
    fn test_non_positive_rejected() {
        let tuning = Tuning {
            gravity: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::NotPositive { field: "gravity", .. })
        ));

        let tuning = Tuning {
            player_size: DVec3::new(0.6, -1.0, 0.6),
            ..Default::default()
        };
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_inverted_ranges_rejected() {
        let tuning = Tuning {
            min_y_step: 6.0,
            max_y_step: 4.0,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::EmptyRange { field: "y_step", .. })
        ));

        let tuning = Tuning {
            min_xz_gap: 9.0,
            ..Default::default()
        };
        assert!(tuning.validate().is_err());
    }
}
