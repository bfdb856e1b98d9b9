//! Trailing follow camera

use glam::{DQuat, DVec3};
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Smoothed camera that trails the player at a yawed offset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraRig {
    pub position: DVec3,
    pub look_at: DVec3,
    offset: DVec3,
    yaw: f64,
    smoothing: f64,
    eye_height: f64,
}

impl CameraRig {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            position: tuning.camera_start,
            look_at: DVec3::new(0.0, 2.0, 0.0),
            offset: tuning.camera_offset,
            yaw: tuning.camera_yaw,
            smoothing: tuning.camera_smoothing,
            eye_height: tuning.camera_eye_height,
        }
    }

    /// Where the camera is heading for a given player position
    pub fn target_for(&self, player: DVec3) -> DVec3 {
        player + DQuat::from_rotation_y(self.yaw) * self.offset
    }

    /// Ease toward the target by a fixed fraction per frame (not dt-scaled)
    pub fn follow(&mut self, player: DVec3) {
        let target = self.target_for(player);
        self.position = self.position.lerp(target, self.smoothing);
        self.look_at = player + DVec3::Y * self.eye_height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_rotation_matches_yaw_formula() {
        let rig = CameraRig::new(&Tuning::default());
        let (ox, oy, oz) = (0.0, 6.0, 12.0);
        let yaw: f64 = -0.35;
        let expected = DVec3::new(
            ox * yaw.cos() + oz * yaw.sin(),
            oy,
            -ox * yaw.sin() + oz * yaw.cos(),
        );
        let target = rig.target_for(DVec3::ZERO);
        assert!((target - expected).length() < 1e-9);
    }

    #[test]
    fn test_follow_moves_fraction_of_gap() {
        let mut rig = CameraRig::new(&Tuning::default());
        let player = DVec3::new(0.0, 0.8, 0.0);
        let target = rig.target_for(player);
        let before = rig.position;

        rig.follow(player);

        let expected = before + (target - before) * 0.15;
        assert!((rig.position - expected).length() < 1e-9);
        assert!((rig.look_at - DVec3::new(0.0, 1.7, 0.0)).length() < 1e-12);
    }

    #[test]
    fn test_follow_converges() {
        let mut rig = CameraRig::new(&Tuning::default());
        let player = DVec3::new(3.0, 40.0, -7.0);
        for _ in 0..300 {
            rig.follow(player);
        }
        assert!((rig.position - rig.target_for(player)).length() < 1e-6);
    }
}
