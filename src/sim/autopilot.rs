//! Idle/demo mode: steer toward the next platform up
//!
//! Produces ordinary [`TickInput`] flags, so the simulation cannot tell a
//! demo run from a human one.

use super::state::World;
use super::tick::TickInput;

/// Horizontal distance at which the autopilot stops pressing a direction
const STEER_DEADZONE: f64 = 0.3;
/// A platform counts as "next" once its top clears the feet by this much
const STEP_CLEARANCE: f64 = 0.5;

/// Input that walks the player toward the lowest platform above its feet
pub fn autopilot_input(world: &World) -> TickInput {
    let feet = world.player.body.bottom();
    let pos = world.player.pos();

    let target = world
        .platforms
        .iter()
        .filter(|p| p.body.top() > feet + STEP_CLEARANCE)
        .min_by(|a, b| a.body.center.y.total_cmp(&b.body.center.y));

    let Some(target) = target else {
        return TickInput::default();
    };
    let delta = target.body.center - pos;

    TickInput {
        right: delta.x > STEER_DEADZONE,
        left: delta.x < -STEER_DEADZONE,
        back: delta.z > STEER_DEADZONE,
        forward: delta.z < -STEER_DEADZONE,
        jump: world.player.on_ground,
        pause: false,
    }
}
