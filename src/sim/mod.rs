//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and deterministic:
//! - Clamped timestep, supplied by the caller
//! - Seeded RNG only
//! - Stable iteration order (platforms in generation order)
//! - No rendering or platform dependencies

pub mod aabb;
pub mod autopilot;
pub mod camera;
pub mod collision;
pub mod platforms;
pub mod player;
pub mod state;
pub mod tick;

pub use aabb::Aabb;
pub use autopilot::autopilot_input;
pub use camera::CameraRig;
pub use collision::{CollisionMode, Contacts, resolve_collisions};
pub use platforms::{Platform, PlatformPool};
pub use player::{Player, move_intent};
pub use state::{JumpMode, Session, SessionPhase, World, clamp_dt};
pub use tick::{FrameSnapshot, PlatformTransform, PlayerTransform, TickInput, step};
