//! Column chunk storage: a dense `CHUNK_SIZE × MAX_HEIGHT × CHUNK_SIZE` block
//! array.

use super::MAX_HEIGHT;
use crate::block::{blocks, BlockId};

pub const CHUNK_SIZE: usize = 16;

#[derive(Clone)]
pub struct Chunk {
    pub blocks: Vec<BlockId>,
}

impl Chunk {
    /// Create a new, empty `Chunk` filled with `AIR` blocks.
    #[must_use]
    pub fn new() -> Self {
        Chunk {
            blocks: vec![blocks::AIR; CHUNK_SIZE * MAX_HEIGHT * CHUNK_SIZE],
        }
    }

    /// Read a block ID at the given local chunk coordinates.
    ///
    /// # Return
    /// * `BlockId` - the block id at the given coordinates, or `AIR` if out of bounds.
    #[must_use]
    pub fn get(&self, x: usize, y: usize, z: usize) -> BlockId {
        if x >= CHUNK_SIZE || y >= MAX_HEIGHT || z >= CHUNK_SIZE {
            blocks::AIR
        } else {
            self.blocks[x + y * CHUNK_SIZE + z * CHUNK_SIZE * MAX_HEIGHT]
        }
    }

    /// Set a block ID at the given local chunk coordinates. Out-of-bounds
    /// writes are ignored.
    pub fn set(&mut self, x: usize, y: usize, z: usize, block: BlockId) {
        if x < CHUNK_SIZE && y < MAX_HEIGHT && z < CHUNK_SIZE {
            self.blocks[x + y * CHUNK_SIZE + z * CHUNK_SIZE * MAX_HEIGHT] = block;
        }
    }

    /// Number of non-air blocks stored.
    #[must_use]
    pub fn solid_count(&self) -> usize {
        self.blocks.iter().filter(|&&b| b != blocks::AIR).count()
    }
}

impl Default for Chunk {
    fn default() -> Self {
        Self::new()
    }
}
