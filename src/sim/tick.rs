//! Per-frame simulation step
//!
//! Order within a tick: input → integrate → collide → jump policy →
//! fall reset → stream maintenance → HUD height → camera.

use glam::DVec3;
use serde::Serialize;

use super::collision::resolve_collisions;
use super::player::move_intent;
use super::state::{JumpMode, World, clamp_dt};
use crate::tuning::Tuning;

/// Logical input flags for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    /// Jump action held (edges are detected by the simulation)
    pub jump: bool,
    /// One-shot pause toggle
    pub pause: bool,
}

/// Player mesh placement
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PlayerTransform {
    pub position: DVec3,
    /// Mesh scale derived from squash
    pub scale: DVec3,
}

/// Platform mesh placement
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PlatformTransform {
    pub id: u32,
    pub center: DVec3,
    pub size: DVec3,
    pub spawn: bool,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct CameraTransform {
    pub position: DVec3,
    pub look_at: DVec3,
}

/// Everything the renderer and HUD need after a tick
#[derive(Debug, Clone, Serialize)]
pub struct FrameSnapshot {
    pub player: PlayerTransform,
    pub squash: f64,
    pub platforms: Vec<PlatformTransform>,
    pub camera: CameraTransform,
    /// Floored Y of the highest platform under the player's feet
    pub height: u32,
    /// The player landed this tick
    pub landed: bool,
    /// The run was reset by falling this tick
    pub fell: bool,
}

impl FrameSnapshot {
    fn capture(world: &World, landed: bool, fell: bool) -> Self {
        Self {
            player: PlayerTransform {
                position: world.player.pos(),
                scale: world.player.squash_scale(),
            },
            squash: world.player.squash,
            platforms: world
                .platforms
                .iter()
                .map(|p| PlatformTransform {
                    id: p.id,
                    center: p.body.center,
                    size: p.body.size,
                    spawn: p.spawn,
                })
                .collect(),
            camera: CameraTransform {
                position: world.camera.position,
                look_at: world.camera.look_at,
            },
            height: world.height,
            landed,
            fell,
        }
    }
}

/// Advance the world by one timestep.
///
/// `dt` is clamped to `[min_dt, max_dt]` first; NaN and non-positive deltas
/// become `min_dt`.
pub fn step(world: &mut World, input: &TickInput, dt: f64) -> FrameSnapshot {
    let dt = clamp_dt(dt, world.tuning.min_dt, world.tuning.max_dt);
    let Tuning {
        gravity,
        air_control,
        jump_mode,
        collision_mode,
        evict_distance,
        squash_grounded_rate,
        squash_airborne_rate,
        ..
    } = world.tuning;

    world.time_ticks += 1;

    // Horizontal control uses last tick's grounded state
    let intent = move_intent(input.forward, input.back, input.left, input.right);
    world.player.steer(intent, air_control);

    let jump_pressed = input.jump && !world.jump_held;
    world.jump_held = input.jump;
    if jump_mode == JumpMode::OnInput && jump_pressed && world.player.on_ground {
        world.player.jump();
    }

    let start = world.player.body;
    world.player.integrate(gravity, dt);

    let contacts = resolve_collisions(
        &mut world.player,
        &start,
        world.platforms.as_slice(),
        collision_mode,
    );

    let grounded = world.player.on_ground;
    world
        .player
        .update_squash(grounded, squash_grounded_rate, squash_airborne_rate);

    if jump_mode == JumpMode::AutoBounce && grounded && !world.was_grounded {
        world.player.jump();
    }
    world.was_grounded = world.player.on_ground;

    let fell = world.player.pos().y < world.fall_threshold();
    if fell {
        log::info!(
            "Fell below {:.1} from height {}; resetting run",
            world.fall_threshold(),
            world.height
        );
        world.reset_run();
    }

    world.platforms.maintain(world.player.pos().y, evict_distance);
    debug_assert_eq!(world.platforms.len(), world.platforms.target());

    world.height = world.platforms.height_below(world.player.body.bottom());
    world.camera.follow(world.player.pos());

    FrameSnapshot::capture(world, contacts.landed, fell)
}
