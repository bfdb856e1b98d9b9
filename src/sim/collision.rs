//! Player-versus-platform collision resolution
//!
//! Two policies are available and one is picked per session:
//! - [`CollisionMode::TopBottom`] only resolves landings and ceiling bonks,
//!   judged by where the player was at the start of the tick. Side entry is
//!   left alone, so the player can slide through a platform's edge.
//! - [`CollisionMode::MinimumAxis`] pushes the player out along the axis of
//!   least penetration, which also stops sideways motion into platforms.
//!
//! Overlaps are resolved one platform at a time in pool order. Platforms
//! never touch each other, so no iterative solving is needed.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::platforms::Platform;
use super::player::Player;

/// Slack when comparing start-of-tick faces, absorbs rounding after a snap
const FACE_EPSILON: f64 = 1.0e-6;

/// Collision resolution policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CollisionMode {
    /// Vertical-only: land on tops, bonk on bottoms
    #[default]
    TopBottom,
    /// Push out along the least-penetrating axis (ties: Y, then X, then Z)
    MinimumAxis,
}

/// What the resolver did this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Contacts {
    /// Snapped onto a platform top
    pub landed: bool,
    /// Snapped under a platform bottom while rising
    pub bonked: bool,
    /// Horizontal push-outs (MinimumAxis only)
    pub pushed: u32,
}

/// Axis of a push-out, in tie-break priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Y,
    X,
    Z,
}

impl Axis {
    fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Smallest penetration axis; ties go to Y, then X, then Z
    fn of_least(depth: DVec3) -> Self {
        if depth.y <= depth.x && depth.y <= depth.z {
            Axis::Y
        } else if depth.x <= depth.z {
            Axis::X
        } else {
            Axis::Z
        }
    }
}

/// Resolve the player against every platform.
///
/// `start` is the player's box before this tick's integration. The grounded
/// flag is cleared first and only set by a landing resolved here.
pub fn resolve_collisions(
    player: &mut Player,
    start: &Aabb,
    platforms: &[Platform],
    mode: CollisionMode,
) -> Contacts {
    player.on_ground = false;
    let mut contacts = Contacts::default();

    for platform in platforms {
        if !player.body.overlaps(&platform.body) {
            continue;
        }
        match mode {
            CollisionMode::TopBottom => {
                resolve_top_bottom(player, start, &platform.body, &mut contacts)
            }
            CollisionMode::MinimumAxis => {
                resolve_minimum_axis(player, &platform.body, &mut contacts)
            }
        }
    }

    contacts
}

fn resolve_top_bottom(player: &mut Player, start: &Aabb, platform: &Aabb, contacts: &mut Contacts) {
    let half_h = player.body.half_extents().y;
    let top = platform.top();
    let bottom = platform.bottom();

    if player.vel.y <= 0.0 && start.bottom() >= top - FACE_EPSILON {
        player.body.center.y = top + half_h;
        player.vel.y = 0.0;
        player.on_ground = true;
        contacts.landed = true;
    } else if player.vel.y > 0.0 && start.top() <= bottom + FACE_EPSILON {
        player.body.center.y = bottom - half_h;
        player.vel.y = 0.0;
        contacts.bonked = true;
    }
}

fn resolve_minimum_axis(player: &mut Player, platform: &Aabb, contacts: &mut Contacts) {
    let Some(depth) = player.body.penetration(platform) else {
        return;
    };
    let axis = Axis::of_least(depth);
    let i = axis.index();

    // Push away from the platform center; dead-center pushes go positive (up)
    let dir = if player.body.center[i] >= platform.center[i] {
        1.0
    } else {
        -1.0
    };
    player.body.center[i] += dir * depth[i];

    match axis {
        Axis::Y if dir > 0.0 => {
            if player.vel.y <= 0.0 {
                player.vel.y = 0.0;
                player.on_ground = true;
                contacts.landed = true;
            }
        }
        Axis::Y => {
            if player.vel.y > 0.0 {
                player.vel.y = 0.0;
                contacts.bonked = true;
            }
        }
        Axis::X | Axis::Z => {
            if player.vel[i] * dir < 0.0 {
                player.vel[i] = 0.0;
            }
            contacts.pushed += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn platform(center: DVec3, size: DVec3) -> Platform {
        Platform {
            id: 0,
            body: Aabb::new(center, size),
            spawn: false,
        }
    }

    fn spawn() -> Platform {
        platform(DVec3::ZERO, DVec3::new(4.0, 0.6, 4.0))
    }

    fn player_at(pos: DVec3, vel: DVec3) -> Player {
        let mut player = Player::new(DVec3::new(0.6, 1.0, 0.6), 15.0, 20.0);
        player.body.center = pos;
        player.vel = vel;
        player
    }

    #[test]
    fn test_falling_player_lands() {
        // Feet 0.05 above the top when the tick starts
        let mut player = player_at(DVec3::new(0.0, 0.3 + 0.05 + 0.5, 0.0), DVec3::new(0.0, -5.0, 0.0));
        let start = player.body;
        player.integrate(30.0, 0.016);
        assert!(player.body.bottom() < 0.3, "feet should penetrate after integration");

        let contacts = resolve_collisions(&mut player, &start, &[spawn()], CollisionMode::TopBottom);

        assert!(contacts.landed);
        assert!((player.pos().y - 0.8).abs() < 1e-12);
        assert_eq!(player.vel.y, 0.0);
        assert!(player.on_ground);
    }

    #[test]
    fn test_resting_player_stays_put() {
        let mut player = player_at(DVec3::new(0.0, 0.8, 0.0), DVec3::ZERO);
        let platforms = [spawn()];
        for _ in 0..120 {
            let start = player.body;
            player.integrate(30.0, 0.016);
            resolve_collisions(&mut player, &start, &platforms, CollisionMode::TopBottom);
            assert!((player.pos().y - 0.8).abs() < 1e-12);
            assert!(player.on_ground);
        }
    }

    #[test]
    fn test_ceiling_bonk() {
        // Head just under a platform bottom at y = 4.75
        let overhead = platform(DVec3::new(0.0, 5.0, 0.0), DVec3::new(3.0, 0.5, 3.0));
        let mut player = player_at(DVec3::new(0.0, 4.2, 0.0), DVec3::new(0.0, 10.0, 0.0));
        let start = player.body;
        player.integrate(30.0, 0.016);
        assert!(player.body.top() > 4.75);

        let contacts = resolve_collisions(&mut player, &start, &[overhead], CollisionMode::TopBottom);

        assert!(contacts.bonked);
        assert!(!contacts.landed);
        assert!((player.body.top() - 4.75).abs() < 1e-12);
        assert_eq!(player.vel.y, 0.0);
        assert!(!player.on_ground);
    }

    #[test]
    fn test_side_entry_is_not_snapped() {
        // Player at platform height walks into its side: feet were below the top
        let ledge = platform(DVec3::new(2.0, 0.0, 0.0), DVec3::new(2.0, 0.5, 2.0));
        let mut player = player_at(DVec3::new(0.65, 0.1, 0.0), DVec3::new(15.0, -1.0, 0.0));
        let start = player.body;
        player.integrate(30.0, 0.016);
        assert!(player.body.overlaps(&ledge.body));

        let before = player.pos();
        let contacts = resolve_collisions(&mut player, &start, &[ledge], CollisionMode::TopBottom);

        assert_eq!(contacts, Contacts::default());
        assert_eq!(player.pos(), before);
        assert!(!player.on_ground);
    }

    #[test]
    fn test_grounded_cleared_without_contact() {
        let mut player = player_at(DVec3::new(50.0, 50.0, 50.0), DVec3::ZERO);
        player.on_ground = true;
        let start = player.body;
        resolve_collisions(&mut player, &start, &[spawn()], CollisionMode::TopBottom);
        assert!(!player.on_ground);
    }

    #[test]
    fn test_min_axis_lands_on_top() {
        let mut player = player_at(DVec3::new(0.0, 0.78, 0.0), DVec3::new(0.0, -3.0, 0.0));
        let start = player.body;
        let contacts = resolve_collisions(&mut player, &start, &[spawn()], CollisionMode::MinimumAxis);
        assert!(contacts.landed);
        assert!((player.pos().y - 0.8).abs() < 1e-12);
        assert!(player.on_ground);
    }

    #[test]
    fn test_min_axis_side_push() {
        // Overlap the ledge's left face by 0.05 while deep in Y
        let ledge = platform(DVec3::new(2.0, 0.0, 0.0), DVec3::new(2.0, 2.0, 2.0));
        let mut player = player_at(DVec3::new(0.75, 0.0, 0.0), DVec3::new(15.0, 0.0, 0.0));
        let start = player.body;

        let contacts = resolve_collisions(&mut player, &start, &[ledge], CollisionMode::MinimumAxis);

        assert_eq!(contacts.pushed, 1);
        assert!((player.pos().x - 0.7).abs() < 1e-12);
        assert_eq!(player.vel.x, 0.0);
        assert!(!player.on_ground);
    }

    #[test]
    fn test_min_axis_tie_prefers_y_then_x() {
        assert_eq!(Axis::of_least(DVec3::new(0.1, 0.1, 0.1)), Axis::Y);
        assert_eq!(Axis::of_least(DVec3::new(0.1, 0.2, 0.1)), Axis::X);
        assert_eq!(Axis::of_least(DVec3::new(0.3, 0.2, 0.1)), Axis::Z);
    }

    #[test]
    fn test_min_axis_corner_graze_pushes_x() {
        // Equal X and Z overlap at a corner, Y overlap larger
        let block = platform(DVec3::ZERO, DVec3::new(2.0, 2.0, 2.0));
        let mut player = player_at(DVec3::new(1.2, 0.0, 1.2), DVec3::new(-5.0, 0.0, -5.0));
        let start = player.body;

        let contacts = resolve_collisions(&mut player, &start, &[block], CollisionMode::MinimumAxis);

        assert_eq!(contacts.pushed, 1);
        assert!((player.pos().x - 1.3).abs() < 1e-12);
        assert_eq!(player.pos().z, 1.2);
        assert_eq!(player.vel.x, 0.0);
        assert_eq!(player.vel.z, -5.0);
    }

    #[test]
    fn test_straddling_two_ledges_lands_on_higher() {
        // Ledges with a 0.2 gap between them, the right one 0.1 higher
        let left = platform(DVec3::new(-1.0, 0.0, 0.0), DVec3::new(1.8, 0.5, 2.0));
        let right = platform(DVec3::new(1.0, 0.1, 0.0), DVec3::new(1.8, 0.5, 2.0));
        let mut player = player_at(DVec3::new(0.0, 0.95, 0.0), DVec3::new(0.0, -1.0, 0.0));
        let start = player.body;
        player.body.center.y = 0.7;

        let contacts =
            resolve_collisions(&mut player, &start, &[left, right], CollisionMode::TopBottom);

        assert!(contacts.landed);
        assert!((player.body.bottom() - 0.35).abs() < 1e-12);
        assert!(player.on_ground);
    }
}
