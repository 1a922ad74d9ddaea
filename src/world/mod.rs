//! World storage and block access helpers.
//!
//! This module provides the `World` resource which holds loaded chunks
//! (a `HashMap<(chunk_x, chunk_z), Chunk>`) and the `BlockSource` trait the
//! physics core reads blocks through. Streaming chunks in from the server
//! is someone else's job; this type only stores what it is given.
//!
//! # Example:
//!
//! ```
//! use strider::world::{BlockSource, World};
//!
//! let mut world = World::new();
//! world.set_block(10, 64, -5, 1);
//! assert_eq!(world.get_block(10, 64, -5), 1);
//! // Unloaded space reads as air
//! assert_eq!(world.get_block(1000, 64, 1000), 0);
//! ```

pub mod chunk;

use crate::block::{blocks, BlockId};
use bevy::prelude::*;
use std::collections::HashMap;

pub use chunk::{Chunk, CHUNK_SIZE};

/// Maximum world build height (exclusive upper bound).
pub const MAX_HEIGHT: usize = 256;

/// Read-only block lookup by integer coordinate.
///
/// Implementations must be cheap and side-effect free: the collision search
/// calls this many times per tick. Missing data reads as `AIR`.
pub trait BlockSource {
    fn get_block(&self, x: i32, y: i32, z: i32) -> BlockId;
}

/// The `World` resource holds loaded chunks keyed by `(chunk_x, chunk_z)`.
#[derive(Resource, Default, Clone)]
pub struct World {
    pub chunks: HashMap<(i32, i32), Chunk>,
}

#[allow(clippy::cast_possible_wrap)]
const CHUNK_SIZE_I32: i32 = CHUNK_SIZE as i32;
#[allow(clippy::cast_possible_wrap)]
const MAX_HEIGHT_I32: i32 = MAX_HEIGHT as i32;

/// Split world coordinates into chunk key and local indices, or `None` when
/// `y` is outside the build height.
#[allow(clippy::cast_sign_loss)]
fn locate(x: i32, y: i32, z: i32) -> Option<((i32, i32), (usize, usize, usize))> {
    if !(0..MAX_HEIGHT_I32).contains(&y) {
        return None;
    }
    let key = (x.div_euclid(CHUNK_SIZE_I32), z.div_euclid(CHUNK_SIZE_I32));
    // rem_euclid and the range check above make every index non-negative.
    let local = (
        x.rem_euclid(CHUNK_SIZE_I32) as usize,
        y as usize,
        z.rem_euclid(CHUNK_SIZE_I32) as usize,
    );
    Some((key, local))
}

impl World {
    /// Create an empty `World` resource with no loaded chunks.
    #[must_use]
    pub fn new() -> Self {
        World {
            chunks: HashMap::new(),
        }
    }

    /// Get the block ID at world coordinates (x, y, z).
    ///
    /// # Return
    /// * `BlockId` - block id at the given coordinates, or `AIR` if the chunk
    ///   is not loaded or `y` is out of bounds
    #[must_use]
    pub fn get_block(&self, x: i32, y: i32, z: i32) -> BlockId {
        let Some((key, (lx, ly, lz))) = locate(x, y, z) else {
            return blocks::AIR;
        };
        self.chunks
            .get(&key)
            .map_or(blocks::AIR, |c| c.get(lx, ly, lz))
    }

    /// Set a block at world coordinates, creating an empty chunk if necessary.
    ///
    /// # Return
    /// * `Option<(i32, i32)>` - `(chunk_x, chunk_z)` of the chunk modified, or
    ///   `None` if `y` was outside the build height
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, block: BlockId) -> Option<(i32, i32)> {
        let (key, (lx, ly, lz)) = locate(x, y, z)?;
        self.chunks.entry(key).or_default().set(lx, ly, lz, block);
        Some(key)
    }

    /// Fill the inclusive box `min..=max` with `block`.
    pub fn fill(&mut self, min: (i32, i32, i32), max: (i32, i32, i32), block: BlockId) {
        for x in min.0..=max.0 {
            for y in min.1..=max.1 {
                for z in min.2..=max.2 {
                    self.set_block(x, y, z, block);
                }
            }
        }
    }

    /// Drop a loaded chunk, e.g. when the server unloads it.
    pub fn unload_chunk(&mut self, chunk_x: i32, chunk_z: i32) -> Option<Chunk> {
        self.chunks.remove(&(chunk_x, chunk_z))
    }
}

impl BlockSource for World {
    fn get_block(&self, x: i32, y: i32, z: i32) -> BlockId {
        World::get_block(self, x, y, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_coordinates_round_trip() {
        let mut world = World::new();
        assert_eq!(world.set_block(-1, 3, -17, 4), Some((-1, -2)));
        assert_eq!(world.get_block(-1, 3, -17), 4);
        assert_eq!(world.get_block(-2, 3, -17), blocks::AIR);
    }

    #[test]
    fn out_of_height_is_air_and_unwritable() {
        let mut world = World::new();
        assert_eq!(world.set_block(0, -1, 0, 1), None);
        assert_eq!(world.set_block(0, 256, 0, 1), None);
        assert_eq!(world.get_block(0, -1, 0), blocks::AIR);
    }

    #[test]
    fn unloading_a_chunk_turns_it_to_air() {
        let mut world = World::new();
        world.fill((0, 0, 0), (3, 0, 3), 1);
        assert_eq!(world.chunks[&(0, 0)].solid_count(), 16);
        world.unload_chunk(0, 0);
        assert_eq!(world.get_block(1, 0, 1), blocks::AIR);
    }
}
