//! Player body and kinematic integration

use glam::DVec3;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;

/// Intent vectors shorter than this are treated as "no input"
const INTENT_DEADZONE_SQ: f64 = 1.0e-4;

/// The player's box
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Aabb,
    pub vel: DVec3,
    /// Landed on a platform during the latest collision pass
    pub on_ground: bool,
    /// Visual squash amount in [0, 1]; never read by physics
    pub squash: f64,
    /// Horizontal speed at full intent
    pub speed: f64,
    /// Vertical launch speed
    pub jump_power: f64,
}

impl Player {
    pub fn new(size: DVec3, speed: f64, jump_power: f64) -> Self {
        Self {
            body: Aabb::new(DVec3::ZERO, size),
            vel: DVec3::ZERO,
            on_ground: false,
            squash: 0.0,
            speed,
            jump_power,
        }
    }

    #[inline]
    pub fn pos(&self) -> DVec3 {
        self.body.center
    }

    /// Stand the player on top of `platform`, centered, at rest
    pub fn place_on(&mut self, platform: &Aabb) {
        self.body.center = DVec3::new(
            platform.center.x,
            platform.top() + self.body.half_extents().y,
            platform.center.z,
        );
        self.vel = DVec3::ZERO;
        self.on_ground = false;
    }

    /// Overwrite horizontal velocity from a normalized intent (x, _, z)
    pub fn steer(&mut self, intent: DVec3, air_control: f64) {
        let control = if self.on_ground { 1.0 } else { air_control };
        self.vel.x = intent.x * self.speed * control;
        self.vel.z = intent.z * self.speed * control;
    }

    /// Apply gravity, then explicit Euler position update
    pub fn integrate(&mut self, gravity: f64, dt: f64) {
        self.vel.y -= gravity * dt;
        self.body.center += self.vel * dt;
    }

    pub fn jump(&mut self) {
        self.vel.y = self.jump_power;
        self.on_ground = false;
    }

    /// Ease squash toward 1 on the ground, toward 0 in the air
    pub fn update_squash(&mut self, grounded: bool, grounded_rate: f64, airborne_rate: f64) {
        if grounded {
            self.squash += (1.0 - self.squash) * grounded_rate;
        } else {
            self.squash += (0.0 - self.squash) * airborne_rate;
        }
        self.squash = self.squash.clamp(0.0, 1.0);
    }

    /// Mesh scale for the current squash: wider and flatter when squashed
    pub fn squash_scale(&self) -> DVec3 {
        let s = self.squash;
        DVec3::new(1.0 + 0.1 * s, 1.0 - 0.2 * s, 1.0 + 0.1 * s)
    }
}

/// Build a normalized XZ intent from the four movement keys.
///
/// Forward moves toward -z, right toward +x.
pub fn move_intent(forward: bool, back: bool, left: bool, right: bool) -> DVec3 {
    let axis = |pos: bool, neg: bool| f64::from(u8::from(pos)) - f64::from(u8::from(neg));
    let intent = DVec3::new(axis(right, left), 0.0, axis(back, forward));
    if intent.length_squared() > INTENT_DEADZONE_SQ {
        intent.normalize()
    } else {
        DVec3::ZERO
    }
}
