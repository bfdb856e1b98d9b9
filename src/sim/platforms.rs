//! Platform pool: procedural generation and the streaming window
//!
//! A fixed number of platforms is kept alive around the player. Platforms that
//! drop far enough below are evicted and replacements are stacked on top of the
//! highest survivor, so a small pool reads as an endless tower.

use glam::DVec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use crate::tuning::Tuning;

/// A floating platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    /// Creation order, never reused within a session
    pub id: u32,
    pub body: Aabb,
    /// The run's starting platform (drawn in a different color)
    pub spawn: bool,
}

/// Generation parameters copied out of [`Tuning`]
#[derive(Debug, Clone)]
struct Layout {
    target: usize,
    spawn_size: DVec3,
    thickness: f64,
    min_size: f64,
    max_size: f64,
    min_y_step: f64,
    max_y_step: f64,
    max_xz_step: f64,
    min_xz_gap: f64,
}

impl From<&Tuning> for Layout {
    fn from(t: &Tuning) -> Self {
        Self {
            target: t.platform_count,
            spawn_size: t.spawn_size,
            thickness: t.platform_thickness,
            min_size: t.platform_min_size,
            max_size: t.platform_max_size,
            min_y_step: t.min_y_step,
            max_y_step: t.max_y_step,
            max_xz_step: t.max_xz_step,
            min_xz_gap: t.min_xz_gap,
        }
    }
}

/// Live platforms in generation order
#[derive(Debug, Clone)]
pub struct PlatformPool {
    platforms: Vec<Platform>,
    layout: Layout,
    rng: Pcg32,
    next_id: u32,
}

impl PlatformPool {
    /// Create a pool seeded for reproducible layouts and fill it.
    ///
    /// `tuning` must pass [`Tuning::validate`]; empty size or step ranges
    /// cannot be sampled.
    pub fn new(tuning: &Tuning, seed: u64) -> Self {
        debug_assert!(tuning.validate().is_ok(), "unvalidated tuning: {:?}", tuning.validate());
        let mut pool = Self {
            platforms: Vec::with_capacity(tuning.platform_count + 1),
            layout: Layout::from(tuning),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 0,
        };
        pool.regenerate();
        pool
    }

    /// Drop every platform and rebuild from a fresh spawn platform at the origin.
    ///
    /// The RNG keeps its stream, so consecutive runs in a session differ.
    pub fn regenerate(&mut self) {
        self.platforms.clear();
        self.push_spawn(DVec3::ZERO);
        self.refill();
    }

    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }

    /// Target live count
    pub fn target(&self) -> usize {
        self.layout.target
    }

    pub fn iter(&self) -> impl Iterator<Item = &Platform> {
        self.platforms.iter()
    }

    pub fn as_slice(&self) -> &[Platform] {
        &self.platforms
    }

    /// The spawn platform, if it has not been evicted yet
    pub fn spawn(&self) -> Option<&Platform> {
        self.platforms.iter().find(|p| p.spawn)
    }

    pub fn highest(&self) -> Option<&Platform> {
        self.platforms
            .iter()
            .max_by(|a, b| a.body.center.y.total_cmp(&b.body.center.y))
    }

    pub fn lowest(&self) -> Option<&Platform> {
        self.platforms
            .iter()
            .min_by(|a, b| a.body.center.y.total_cmp(&b.body.center.y))
    }

    /// Evict platforms below `player_y - distance`, then restore the target count.
    ///
    /// Returns how many platforms were recycled.
    pub fn maintain(&mut self, player_y: f64, distance: f64) -> usize {
        let cutoff = player_y - distance;
        let before = self.platforms.len();
        self.platforms.retain(|p| p.body.center.y >= cutoff);
        let evicted = before - self.platforms.len();

        debug_assert!(
            !self.platforms.is_empty(),
            "platform pool emptied at player y {player_y}"
        );
        if self.platforms.is_empty() {
            self.recover_empty(player_y, distance);
        }

        if evicted > 0 {
            log::trace!("Evicted {evicted} platforms below y {cutoff:.1}");
        }
        self.refill();
        evicted
    }

    /// Rebuild an emptied pool from a spawn platform inside the live window below `player_y`
    fn recover_empty(&mut self, player_y: f64, distance: f64) {
        log::error!("Platform pool emptied at y {player_y:.1}; reseeding under player");
        self.platforms.clear();
        self.push_spawn(DVec3::new(0.0, player_y - distance * 0.5, 0.0));
        self.refill();
    }

    /// Spawn platforms on top of the stack until the target count is met
    fn refill(&mut self) {
        while self.platforms.len() < self.layout.target {
            let Some(top) = self.highest().map(|p| p.body.center) else {
                return;
            };
            let body = self.next_body(top);
            self.push(body, false);
        }
    }

    /// Sample the next platform relative to the previous top.
    ///
    /// Horizontal offsets are drawn from `[-max, -gap] ∪ [gap, max]` so the new
    /// platform never sits directly over the previous one.
    fn next_body(&mut self, prev: DVec3) -> Aabb {
        let l = &self.layout;
        let (gap, max) = (l.min_xz_gap, l.max_xz_step);
        let dx = signed_offset(&mut self.rng, gap, max);
        let dz = signed_offset(&mut self.rng, gap, max);
        let dy = self.rng.random_range(l.min_y_step..=l.max_y_step);
        let w = self.rng.random_range(l.min_size..l.max_size);
        let d = self.rng.random_range(l.min_size..l.max_size);

        Aabb::new(
            prev + DVec3::new(dx, dy, dz),
            DVec3::new(w, l.thickness, d),
        )
    }

    fn push_spawn(&mut self, center: DVec3) {
        let body = Aabb::new(center, self.layout.spawn_size);
        self.push(body, true);
    }

    fn push(&mut self, body: Aabb, spawn: bool) {
        let id = self.next_id;
        self.next_id += 1;
        self.platforms.push(Platform { id, body, spawn });
    }

    /// HUD height: Y of the highest platform at or below `feet_y`, floored, never negative
    pub fn height_below(&self, feet_y: f64) -> u32 {
        let best = self
            .platforms
            .iter()
            .map(|p| p.body.center.y)
            .filter(|&y| y <= feet_y)
            .fold(f64::NEG_INFINITY, f64::max);
        best.max(0.0).floor() as u32
    }

    #[cfg(test)]
    pub(crate) fn platforms_mut(&mut self) -> &mut Vec<Platform> {
        &mut self.platforms
    }
}

/// Uniform magnitude in `[gap, max]` with a random sign
fn signed_offset(rng: &mut Pcg32, gap: f64, max: f64) -> f64 {
    let magnitude = if gap < max {
        rng.random_range(gap..=max)
    } else {
        max
    };
    if rng.random_bool(0.5) {
        magnitude
    } else {
        -magnitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(seed: u64) -> PlatformPool {
        PlatformPool::new(&Tuning::default(), seed)
    }

    #[test]
    fn test_initial_fill() {
        let pool = pool(7);
        assert_eq!(pool.len(), 28);
        let first = &pool.as_slice()[0];
        assert!(first.spawn);
        assert_eq!(first.id, 0);
        assert_eq!(first.body.center, DVec3::ZERO);
        assert_eq!(first.body.size, DVec3::new(4.0, 0.6, 4.0));
        assert_eq!(pool.iter().filter(|p| p.spawn).count(), 1);
    }

    #[test]
    fn test_consecutive_steps_in_bounds() {
        let tuning = Tuning::default();
        let pool = pool(42);
        for pair in pool.as_slice().windows(2) {
            let delta = pair[1].body.center - pair[0].body.center;
            let eps = 1e-9;
            assert!(delta.y >= tuning.min_y_step - eps && delta.y <= tuning.max_y_step + eps);
            assert!(delta.y <= tuning.max_jump_height());
            for offset in [delta.x.abs(), delta.z.abs()] {
                assert!(offset >= tuning.min_xz_gap - eps && offset <= tuning.max_xz_step + eps);
            }

            let size = pair[1].body.size;
            assert!(size.x >= 2.0 && size.x < 5.0);
            assert!(size.z >= 2.0 && size.z < 5.0);
            assert_eq!(size.y, 0.5);
        }
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = pool(1234);
        let b = pool(1234);
        for (pa, pb) in a.iter().zip(b.iter()) {
            assert_eq!(pa.body, pb.body);
        }
        let c = pool(4321);
        assert!(a.iter().zip(c.iter()).skip(1).any(|(pa, pc)| pa.body != pc.body));
    }

    #[test]
    fn test_maintain_recycles_low_platforms() {
        let mut pool = pool(9);
        let before_top = pool.highest().unwrap().body.center.y;

        // Player climbed far enough that the spawn and a few more fall out
        let evicted = pool.maintain(45.0, 30.0);
        assert!(evicted >= 1);
        assert_eq!(pool.len(), 28);
        assert!(pool.spawn().is_none());
        assert!(pool.iter().all(|p| p.body.center.y >= 15.0));
        assert!(pool.highest().unwrap().body.center.y > before_top);

        // Ids keep increasing in generation order
        let ids: Vec<u32> = pool.iter().map(|p| p.id).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_maintain_without_eviction_is_noop() {
        let mut pool = pool(9);
        let ids: Vec<u32> = pool.iter().map(|p| p.id).collect();
        assert_eq!(pool.maintain(0.8, 30.0), 0);
        let after: Vec<u32> = pool.iter().map(|p| p.id).collect();
        assert_eq!(ids, after);
    }

    #[test]
    fn test_regenerate_restores_spawn() {
        let mut pool = pool(5);
        pool.maintain(80.0, 30.0);
        assert!(pool.spawn().is_none());

        pool.regenerate();
        assert_eq!(pool.len(), 28);
        let spawn = pool.spawn().unwrap();
        assert_eq!(spawn.body.center, DVec3::ZERO);
        // Fresh ids, not reused
        assert!(spawn.id >= 28);
    }

    #[test]
    #[should_panic(expected = "platform pool emptied")]
    fn test_emptied_pool_trips_assertion() {
        let mut pool = pool(13);
        pool.platforms_mut().clear();
        pool.maintain(50.0, 30.0);
    }

    #[test]
    fn test_recover_empty_reseeds_under_player() {
        let mut pool = pool(13);
        pool.platforms_mut().clear();
        pool.recover_empty(50.0, 30.0);

        assert_eq!(pool.len(), pool.target());
        let spawn = pool.spawn().unwrap();
        assert_eq!(spawn.body.center.y, 35.0);
        assert!(spawn.body.top() < 50.0);
        // Survives the next eviction pass at the same height
        assert_eq!(pool.maintain(50.0, 30.0), 0);
        assert!(pool.spawn().is_some());
    }

    #[test]
    fn test_height_below() {
        let pool = pool(3);
        assert_eq!(pool.height_below(0.3), 0);
        assert_eq!(pool.height_below(-5.0), 0);

        let second = pool.as_slice()[1].body.center.y;
        assert_eq!(pool.height_below(second + 0.25), second.floor() as u32);
    }
}
