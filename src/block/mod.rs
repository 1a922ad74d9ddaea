//! Block identifiers and the material table the physics core consults.
//!
//! It exposes block definitions (`Block`), the `BlockRegistry` which stores
//! all loaded materials, and the runtime loader/watcher used for
//! hot-reloading block data from RON files.
//!
//! Example:
//!
//! ```no_run
//! use bevy::prelude::*;
//! use strider::block::loader as block_loader;
//!
//! let mut app = App::new();
//! app.insert_resource(block_loader::load_blocks_from_dir("data/blocks"));
//! let watcher = block_loader::setup_block_watcher("data/blocks")
//!     .unwrap_or_else(|_| block_loader::BlockWatcher::stub("data/blocks"));
//! app.insert_resource(watcher);
//! app.add_systems(Update, block_loader::check_block_changes);
//! ```

/// Type used throughout the engine to represent a compact block identifier.
///
/// This is intentionally a `u8` to keep chunk storage memory-efficient.
pub type BlockId = u8;

/// Well-known block ids that code can reference without going through the
/// registry.
pub mod blocks {
    use super::BlockId;

    /// The block id used to represent empty space (no block present).
    pub const AIR: BlockId = 0;
    pub const DEFAULT: BlockId = 1;

    /// Convenience lookup helpers for interop with `BlockRegistry`.
    pub mod lookup {
        use super::BlockId;
        use crate::block::registry::BlockRegistry;

        /// Return a numeric id for a block name if present in the registry.
        #[must_use]
        pub fn id_for(registry: &BlockRegistry, name: &str) -> Option<BlockId> {
            registry.get(name).map(|b| b.id)
        }

        /// Return a block name for a numeric id if present in the registry.
        #[must_use]
        pub fn name_for(registry: &BlockRegistry, id: BlockId) -> Option<String> {
            registry.blocks_by_id.get(&id).cloned()
        }
    }
}

/// Loader/watchers for block RON files.
pub mod loader;

/// Block registry and related data structures.
pub mod registry;

pub use registry::{Block, BlockRegistry, DEFAULT_SLIPPERINESS, MAX_SLIPPERINESS};
