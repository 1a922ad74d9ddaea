//! Collision volumes: the player's `BoundingBox` and world-space `Aabb`s.

use super::Vector3;
use serde::{Deserialize, Serialize};

/// Overlap below this depth counts as touching, not colliding.
pub const CONTACT_EPSILON: f64 = 1e-7;

/// Player collision footprint: a vertical prism centred on the position.
///
/// `width` applies to both horizontal axes, `height` grows upward from the
/// feet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// World-space box for a player whose feet centre sits at `position`.
    #[must_use]
    pub fn uncenter(&self, position: Vector3) -> Aabb {
        let half = self.width / 2.0;
        let min = position - Vector3::new(half, 0.0, half);
        Aabb::new(min, min + Vector3::new(self.width, self.height, self.width))
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::new(0.6, 1.8)
    }
}

/// Axis-aligned box given by its min and max corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vector3,
    pub max: Vector3,
}

impl Aabb {
    #[must_use]
    pub const fn new(min: Vector3, max: Vector3) -> Self {
        Self { min, max }
    }

    /// The unit cube at the origin, i.e. a full block in block-local space.
    #[must_use]
    pub const fn unit() -> Self {
        Self::new(Vector3::ZERO, Vector3::new(1.0, 1.0, 1.0))
    }

    #[must_use]
    pub fn translate(&self, offset: Vector3) -> Self {
        Self::new(self.min + offset, self.max + offset)
    }

    /// Signed overlap depth on `axis`; `<= 0` means the boxes are apart there.
    #[must_use]
    pub fn overlap(&self, other: &Aabb, axis: usize) -> f64 {
        self.max[axis].min(other.max[axis]) - self.min[axis].max(other.min[axis])
    }

    /// Strict intersection: every axis overlaps by more than `CONTACT_EPSILON`.
    #[must_use]
    pub fn intersects(&self, other: &Aabb) -> bool {
        (0..3).all(|axis| self.overlap(other, axis) > CONTACT_EPSILON)
    }

    /// Smallest single-axis vector that moves `self` out of `other` along
    /// `axis`, choosing the exit with least penetration.
    ///
    /// An exact tie resolves toward the positive side, so a player sunk
    /// half-way into a floor pops up rather than down.
    #[must_use]
    pub fn separation(&self, other: &Aabb, axis: usize) -> Vector3 {
        let push_pos = other.max[axis] - self.min[axis];
        let push_neg = other.min[axis] - self.max[axis];
        let amount = if push_pos <= -push_neg { push_pos } else { push_neg };
        let mut v = Vector3::ZERO;
        v[axis] = amount;
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uncenter_puts_feet_at_position() {
        let bb = BoundingBox::new(0.6, 1.8);
        let aabb = bb.uncenter(Vector3::new(0.5, 1.0, 0.5));
        assert!((aabb.min.x - 0.2).abs() < 1e-12);
        assert!((aabb.max.z - 0.8).abs() < 1e-12);
        assert_eq!(aabb.min.y, 1.0);
        assert!((aabb.max.y - 2.8).abs() < 1e-12);
    }

    #[test]
    fn touching_boxes_do_not_intersect() {
        let floor = Aabb::unit();
        let standing = Aabb::new(Vector3::new(0.2, 1.0, 0.2), Vector3::new(0.8, 2.8, 0.8));
        assert!(!floor.intersects(&standing));
        let sunk = standing.translate(Vector3::new(0.0, -0.1, 0.0));
        assert!(sunk.intersects(&floor));
    }

    #[test]
    fn separation_picks_shallow_side() {
        let floor = Aabb::unit();
        let sunk = Aabb::new(Vector3::new(0.2, 0.9, 0.2), Vector3::new(0.8, 2.7, 0.8));
        let up = sunk.separation(&floor, 1);
        assert!((up.y - 0.1).abs() < 1e-12);
        assert_eq!(up.x, 0.0);
        let offset = sunk.translate(Vector3::new(0.1, 0.0, 0.0));
        let side = offset.separation(&floor, 0);
        // Leaving through +x costs 0.7, through -x costs 0.9.
        assert!((side.x - 0.7).abs() < 1e-12);
    }
}
