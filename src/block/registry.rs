//! This module defines the `Block` material entry and the `BlockRegistry`
//! that the physics core queries for solidity, slipperiness and collision
//! shapes.
//!
//! Example:
//! ```rust
//! use strider::block::registry::{Block, BlockRegistry};
//!
//! let mut registry = BlockRegistry::with_defaults();
//! registry.register(Block {
//!     name: "packed_ice".to_string(),
//!     id: 40,
//!     slipperiness: 0.98,
//!     ..Default::default()
//! });
//! assert_eq!(registry.slipperiness(40), 0.98);
//! ```
//!
use crate::block::{blocks, BlockId};
use crate::math::{Aabb, Vector3};
use bevy::log::warn;
use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Slipperiness of ordinary ground (stone, dirt, planks).
pub const DEFAULT_SLIPPERINESS: f64 = 0.6;

/// Slipperiness never exceeds this; above it, drag would add speed.
pub const MAX_SLIPPERINESS: f64 = 1.0;

const FULL_CUBE: [Aabb; 1] = [Aabb::unit()];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub name: String,
    pub id: BlockId,
    #[serde(default = "Block::default_solid")]
    pub solid: bool, // Whether the block takes part in collision at all
    #[serde(default = "Block::default_slipperiness")]
    pub slipperiness: f64, // Surface slip; 0.6 is plain ground, ice is ~0.98

    /// Collision shape in block-local coordinates (`0..1` on each axis; may
    /// exceed 1 vertically for fences and walls). An empty list on a solid
    /// block means a full cube.
    #[serde(default)]
    pub collision: Vec<Aabb>,
}

impl Block {
    fn default_solid() -> bool { true }
    fn default_slipperiness() -> f64 { DEFAULT_SLIPPERINESS }

    /// Collision boxes in block-local space.
    #[must_use]
    pub fn shape(&self) -> &[Aabb] {
        if !self.solid {
            &[]
        } else if self.collision.is_empty() {
            &FULL_CUBE[..]
        } else {
            self.collision.as_slice()
        }
    }
}

impl Default for Block {
    fn default() -> Self {
        Self {
            name: "stone".to_string(),
            id: 1,
            solid: Self::default_solid(),
            slipperiness: Self::default_slipperiness(),
            collision: Vec::new(),
        }
    }
}

#[derive(Resource, Default, Clone, Debug)]
pub struct BlockRegistry {
    pub blocks: HashMap<String, Block>,
    pub blocks_by_id: HashMap<BlockId, String>,
}

impl BlockRegistry {
    /// Registry holding the built-in materials used when no RON data is
    /// available: air, stone, dirt, ice, slime and a bottom slab.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::default();
        registry.register(Block {
            name: "air".to_string(),
            id: blocks::AIR,
            solid: false,
            ..Default::default()
        });
        registry.register(Block::default());
        registry.register(Block {
            name: "dirt".to_string(),
            id: 2,
            ..Default::default()
        });
        registry.register(Block {
            name: "ice".to_string(),
            id: 3,
            slipperiness: 0.98,
            ..Default::default()
        });
        registry.register(Block {
            name: "slime".to_string(),
            id: 4,
            slipperiness: 0.8,
            ..Default::default()
        });
        registry.register(Block {
            name: "stone_slab".to_string(),
            id: 5,
            collision: vec![Aabb::new(Vector3::ZERO, Vector3::new(1.0, 0.5, 1.0))],
            ..Default::default()
        });
        registry
    }

    /// Add `block`, replacing whatever held its id before.
    ///
    /// Slipperiness is kept in `(0, 1]`: zero, negative or NaN values fall
    /// back to the default, larger values are capped.
    pub fn register(&mut self, mut block: Block) {
        if !(block.slipperiness > 0.0) {
            warn!(
                "block {} has non-positive slipperiness {}, using {DEFAULT_SLIPPERINESS}",
                block.name, block.slipperiness
            );
            block.slipperiness = DEFAULT_SLIPPERINESS;
        } else if block.slipperiness > MAX_SLIPPERINESS {
            warn!(
                "block {} has slipperiness {} above {MAX_SLIPPERINESS}, capping",
                block.name, block.slipperiness
            );
            block.slipperiness = MAX_SLIPPERINESS;
        }
        if let Some(previous) = self.blocks_by_id.insert(block.id, block.name.clone())
            && previous != block.name
        {
            self.blocks.remove(&previous);
        }
        self.blocks.insert(block.name.clone(), block);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Block> {
        self.blocks.get(name)
    }

    #[must_use]
    pub fn get_by_id(&self, id: BlockId) -> Option<&Block> {
        self.blocks_by_id
            .get(&id)
            .and_then(|name| self.blocks.get(name))
    }

    /// Lookup numeric ID for a block `name`.
    #[must_use]
    pub fn id_for_name(&self, name: &str) -> Option<BlockId> {
        self.blocks.get(name).map(|b| b.id)
    }

    /// Slipperiness of the block with `id`.
    ///
    /// Unknown ids use the ground default so a stale registry never produces
    /// a runaway acceleration factor.
    #[must_use]
    pub fn slipperiness(&self, id: BlockId) -> f64 {
        self.get_by_id(id).map_or(DEFAULT_SLIPPERINESS, |b| b.slipperiness)
    }

    /// Whether `id` takes part in collision. `AIR` never does; ids missing
    /// from the registry behave as full solid blocks.
    #[must_use]
    pub fn is_solid(&self, id: BlockId) -> bool {
        if id == blocks::AIR {
            return false;
        }
        self.get_by_id(id).is_none_or(|b| b.solid)
    }

    /// Collision boxes for `id` in block-local coordinates.
    #[must_use]
    pub fn collision_boxes(&self, id: BlockId) -> &[Aabb] {
        if id == blocks::AIR {
            return &[];
        }
        match self.get_by_id(id) {
            Some(block) => block.shape(),
            None => &FULL_CUBE[..],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_ids_are_solid_ground() {
        let registry = BlockRegistry::with_defaults();
        assert!(registry.is_solid(200));
        assert_eq!(registry.slipperiness(200), DEFAULT_SLIPPERINESS);
        assert_eq!(registry.collision_boxes(200), &[Aabb::unit()]);
    }

    #[test]
    fn air_has_no_shape() {
        let registry = BlockRegistry::with_defaults();
        assert!(!registry.is_solid(blocks::AIR));
        assert!(registry.collision_boxes(blocks::AIR).is_empty());
    }

    #[test]
    fn slab_uses_declared_box() {
        let registry = BlockRegistry::with_defaults();
        let id = registry.id_for_name("stone_slab").expect("slab registered");
        let boxes = registry.collision_boxes(id);
        assert_eq!(boxes.len(), 1);
        assert_eq!(boxes[0].max.y, 0.5);
    }

    #[test]
    fn reregistering_an_id_replaces_the_old_name() {
        let mut registry = BlockRegistry::with_defaults();
        registry.register(Block {
            name: "blue_ice".to_string(),
            id: 3,
            slipperiness: 0.989,
            ..Default::default()
        });
        assert!(registry.get("ice").is_none());
        assert_eq!(registry.slipperiness(3), 0.989);
    }

    #[test]
    fn register_keeps_slipperiness_in_range() {
        let mut registry = BlockRegistry::default();
        for (id, slip) in [(10, 0.0), (11, -0.5), (12, f64::NAN), (13, 1.5), (14, 1.0)] {
            registry.register(Block {
                name: format!("block_{id}"),
                id,
                slipperiness: slip,
                ..Default::default()
            });
        }
        assert_eq!(registry.slipperiness(10), DEFAULT_SLIPPERINESS);
        assert_eq!(registry.slipperiness(11), DEFAULT_SLIPPERINESS);
        assert_eq!(registry.slipperiness(12), DEFAULT_SLIPPERINESS);
        assert_eq!(registry.slipperiness(13), MAX_SLIPPERINESS);
        assert_eq!(registry.slipperiness(14), 1.0);
    }
}
