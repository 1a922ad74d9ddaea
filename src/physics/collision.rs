//! Collision resolution against the voxel world.
//!
//! Blocks are decomposed into axis-aligned boxes (a full cube, or the boxes a
//! partial block such as a slab declares). For a box that overlaps some of
//! them, separating-axis resolution gives one push-out vector per overlapping
//! block and axis. Concave contact (a floor meeting a wall, a stair) needs
//! several such pushes combined, which is what the breadth-first search in
//! [`CollisionResolver::find_mtv`] assembles.
//!
//! Search policy:
//! * a correction is only explored while `|velocity + correction|²` stays
//!   within `|velocity|² + fp_slack`, so corrections never speed the player up;
//! * the first clear candidate fixes the search depth, remaining queued
//!   candidates are checked but not expanded;
//! * the smallest clear candidate wins, and exact ties go to the one found
//!   first in BFS order. That tie-break is an arbitrary but stable policy;
//! * visited candidates (quantized), `max_hops` and `max_candidates` bound
//!   the search regardless of floating-point behaviour.

use crate::block::BlockRegistry;
use crate::math::{Aabb, BoundingBox, Vector3};
use crate::settings::CollisionSettings;
use crate::world::BlockSource;
use bevy::log::debug;
use std::collections::{HashSet, VecDeque};

/// Candidates closer than this (per component) are the same candidate.
const QUANTUM: f64 = 1e-9;

/// Result of a minimum-translation-vector search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mtv {
    /// A correction that leaves the player clear of every solid box. Zero when
    /// the requested displacement is already clear.
    Resolved(Vector3),
    /// No admissible correction exists; the caller should stop the player.
    Deadlock { examined: usize },
}

impl Mtv {
    /// The correction to apply: the resolved vector, or zero on deadlock.
    #[must_use]
    pub fn vector(&self) -> Vector3 {
        match self {
            Mtv::Resolved(v) => *v,
            Mtv::Deadlock { .. } => Vector3::ZERO,
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn quantize(v: Vector3) -> (i64, i64, i64) {
    (
        (v.x / QUANTUM).round() as i64,
        (v.y / QUANTUM).round() as i64,
        (v.z / QUANTUM).round() as i64,
    )
}

#[allow(clippy::cast_possible_truncation)]
fn block_span(min: f64, max: f64) -> std::ops::RangeInclusive<i32> {
    (min.floor() as i32)..=(max.floor() as i32)
}

/// Collision queries for one player box against one world snapshot.
pub struct CollisionResolver<'a, W: BlockSource + ?Sized> {
    world: &'a W,
    registry: &'a BlockRegistry,
    bbox: BoundingBox,
    settings: &'a CollisionSettings,
}

impl<'a, W: BlockSource + ?Sized> CollisionResolver<'a, W> {
    #[must_use]
    pub fn new(
        world: &'a W,
        registry: &'a BlockRegistry,
        bbox: BoundingBox,
        settings: &'a CollisionSettings,
    ) -> Self {
        Self { world, registry, bbox, settings }
    }

    /// World-space solid boxes that strictly intersect `aabb`.
    ///
    /// One extra layer below the box is scanned for shapes taller than a
    /// block (fences, walls).
    pub fn solid_boxes(&self, aabb: &Aabb) -> Vec<Aabb> {
        let mut out = Vec::new();
        for x in block_span(aabb.min.x, aabb.max.x) {
            for y in block_span(aabb.min.y - 1.0, aabb.max.y) {
                for z in block_span(aabb.min.z, aabb.max.z) {
                    let id = self.world.get_block(x, y, z);
                    if !self.registry.is_solid(id) {
                        continue;
                    }
                    let origin = Vector3::new(f64::from(x), f64::from(y), f64::from(z));
                    out.extend(
                        self.registry
                            .collision_boxes(id)
                            .iter()
                            .map(|local| local.translate(origin))
                            .filter(|world_box| world_box.intersects(aabb)),
                    );
                }
            }
        }
        out
    }

    /// Single-axis corrections needed to move the player box, placed with its
    /// feet at `position` and then shifted by `correction`, out of each solid
    /// box it overlaps.
    ///
    /// An empty result means the placement is clear.
    pub fn check_collision(&self, position: Vector3, correction: Vector3) -> Vec<Vector3> {
        self.corrections(&self.bbox.uncenter(position).translate(correction))
    }

    fn corrections(&self, aabb: &Aabb) -> Vec<Vector3> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for block in self.solid_boxes(aabb) {
            for axis in 0..3 {
                let push = aabb.separation(&block, axis);
                if seen.insert(quantize(push)) {
                    out.push(push);
                }
            }
        }
        out
    }

    fn is_clear(&self, aabb: &Aabb) -> bool {
        self.solid_boxes(aabb).is_empty()
    }

    /// Breadth-first search for the smallest correction that keeps the player
    /// box, moved from `position` by `velocity`, out of solid geometry.
    pub fn find_mtv(&self, position: Vector3, velocity: Vector3) -> Mtv {
        let base = self.bbox.uncenter(position + velocity);
        let limit = velocity.dist_sq() + self.settings.fp_slack;

        let mut queue = VecDeque::from([(Vector3::ZERO, 0u32)]);
        let mut visited = HashSet::from([quantize(Vector3::ZERO)]);
        let mut examined = 0usize;
        let mut baseline = None;

        while let Some((candidate, hops)) = queue.pop_front() {
            examined += 1;
            if examined > self.settings.max_candidates {
                break;
            }
            let corrections = self.corrections(&base.translate(candidate));
            if corrections.is_empty() {
                baseline = Some(candidate);
                break;
            }
            if hops >= self.settings.max_hops {
                continue;
            }
            for correction in corrections {
                let next = candidate + correction;
                if (velocity + next).dist_sq() > limit {
                    continue;
                }
                if visited.insert(quantize(next)) {
                    queue.push_back((next, hops + 1));
                }
            }
        }

        let Some(first) = baseline else {
            debug!(
                "no admissible MTV after {examined} candidates at {position} moving {velocity}, stopping"
            );
            return Mtv::Deadlock { examined };
        };

        let best = queue
            .into_iter()
            .map(|(candidate, _)| candidate)
            .filter(|candidate| self.is_clear(&base.translate(*candidate)))
            .fold(first, |best, candidate| {
                if candidate.cmp_magnitude(&best).is_lt() {
                    candidate
                } else {
                    best
                }
            });
        Mtv::Resolved(best)
    }
}
