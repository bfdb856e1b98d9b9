//! Axis-aligned box geometry
//!
//! Boxes are stored as a center plus full extents, matching how the renderer
//! sizes its meshes. All collision math works on half extents.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// An axis-aligned box: `center` plus full `size` (w, h, d)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub center: DVec3,
    /// Full extents, all components > 0
    pub size: DVec3,
}

impl Aabb {
    pub fn new(center: DVec3, size: DVec3) -> Self {
        debug_assert!(
            size.cmpgt(DVec3::ZERO).all(),
            "box extents must be positive: {size:?}"
        );
        Self { center, size }
    }

    #[inline]
    pub fn half_extents(&self) -> DVec3 {
        self.size * 0.5
    }

    /// Y of the top face
    #[inline]
    pub fn top(&self) -> f64 {
        self.center.y + self.size.y * 0.5
    }

    /// Y of the bottom face
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.center.y - self.size.y * 0.5
    }

    /// Separating-axis test; touching faces count as overlap
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let gap = (self.center - other.center).abs();
        let reach = self.half_extents() + other.half_extents();
        gap.cmple(reach).all()
    }

    /// Per-axis penetration depth, or `None` when the boxes are apart
    pub fn penetration(&self, other: &Aabb) -> Option<DVec3> {
        if !self.overlaps(other) {
            return None;
        }
        let gap = (self.center - other.center).abs();
        Some(self.half_extents() + other.half_extents() - gap)
    }
}
