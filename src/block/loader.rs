//! Block loader and watcher for loading material definitions from RON files
//! and monitoring changes for hot reloading during a running session.
//! # Example
//! ```no_run
//! use bevy::prelude::*;
//! use strider::block::loader as block_loader;
//!
//! let mut app = App::new();
//!
//! // Load initial registry and insert as a resource
//! app.insert_resource(block_loader::load_blocks_from_dir("data/blocks"));
//!
//! // Create watcher (fallback to stub on error) and insert as resource
//! let watcher = block_loader::setup_block_watcher("data/blocks")
//!     .unwrap_or_else(|_| block_loader::BlockWatcher::stub("data/blocks"));
//! app.insert_resource(watcher);
//!
//! // Reload whenever files change
//! app.add_systems(Update, block_loader::check_block_changes);
//! ```

use super::{blocks, Block, BlockRegistry};
use crate::ron_loader::{load_ron_files, setup_ron_watcher};
use bevy::log::{info, warn};
use bevy::prelude::{Res, ResMut, Resource};

#[derive(Resource)]
pub struct BlockWatcher(pub crate::ron::RonWatcher);

/// Load all block definitions from RON files.
///
/// # Arguments
/// * `path` - The directory path where block RON files are located (e.g., "data/blocks").
///
/// # Returns
/// A `BlockRegistry` containing all loaded block definitions, indexed by both
/// name and numeric ID. `AIR` is always present. When the directory holds no
/// parseable block files the built-in table is returned instead.
#[must_use]
pub fn load_blocks_from_dir(path: &str) -> BlockRegistry {
    let loaded: Vec<Block> = load_ron_files(path);
    if loaded.is_empty() {
        warn!("no block definitions found in {path}, using built-in materials");
        return BlockRegistry::with_defaults();
    }

    let mut registry = BlockRegistry::default();
    for block in loaded {
        registry.register(block);
    }

    // Collision relies on AIR being non-solid regardless of what the data says.
    if registry.get_by_id(blocks::AIR).is_none_or(|b| b.solid) {
        registry.register(Block {
            name: "air".to_string(),
            id: blocks::AIR,
            solid: false,
            ..Default::default()
        });
    }

    registry
}

/// Set up a file watcher to monitor changes in block RON files.
///
/// # Errors
/// Returns a `notify::Error` if the underlying file watcher could not be created or configured.
pub fn setup_block_watcher(path: &str) -> Result<BlockWatcher, notify::Error> {
    setup_ron_watcher(path).map(BlockWatcher)
}

/// Reloads the block registry when the watched directory changes.
///
/// Material edits (slipperiness, collision shapes) take effect on the next
/// physics tick since the integrator reads the registry resource every tick.
#[allow(clippy::needless_pass_by_value)]
pub fn check_block_changes(watcher: Res<BlockWatcher>, mut registry: ResMut<BlockRegistry>) {
    if watcher.0.take_changed() {
        info!("Blocks changed, reloading from {}", watcher.0.path);
        *registry = load_blocks_from_dir(&watcher.0.path);
    }
}

impl BlockWatcher {
    /// Create a stub `BlockWatcher` that does not have an active OS watcher.
    #[must_use]
    pub fn stub(path: &str) -> Self {
        BlockWatcher(crate::ron::RonWatcher::stub(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::prelude::*;

    #[test]
    fn loads_materials_and_forces_air() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join("ice.ron"),
            "(name: \"ice\", id: 3, slipperiness: 0.98)",
        )
        .expect("write");
        std::fs::write(
            dir.path().join("slab.ron"),
            "(name: \"slab\", id: 5, collision: [(min: (x: 0.0, y: 0.0, z: 0.0), max: (x: 1.0, y: 0.5, z: 1.0))])",
        )
        .expect("write");

        let registry = load_blocks_from_dir(dir.path().to_str().expect("utf8 path"));
        assert_eq!(registry.slipperiness(3), 0.98);
        assert_eq!(registry.collision_boxes(5)[0].max.y, 0.5);
        assert!(!registry.is_solid(blocks::AIR));
    }

    #[test]
    fn empty_directory_falls_back_to_builtins() {
        let dir = tempfile::tempdir().expect("tempdir");
        let registry = load_blocks_from_dir(dir.path().to_str().expect("utf8 path"));
        assert!(registry.get("ice").is_some());
    }

    #[test]
    fn non_positive_slipperiness_is_clamped() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join("bad.ron"),
            "(name: \"bad\", id: 9, slipperiness: 0.0)",
        )
        .expect("write");
        let registry = load_blocks_from_dir(dir.path().to_str().expect("utf8 path"));
        assert_eq!(registry.slipperiness(9), crate::block::registry::DEFAULT_SLIPPERINESS);
    }

    #[test]
    fn excessive_slipperiness_is_capped() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join("glass.ron"),
            "(name: \"glass\", id: 9, slipperiness: 1.5)",
        )
        .expect("write");
        let registry = load_blocks_from_dir(dir.path().to_str().expect("utf8 path"));
        assert_eq!(registry.slipperiness(9), crate::block::registry::MAX_SLIPPERINESS);
    }

    #[test]
    fn reload_system_replaces_registry_on_change() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().to_str().expect("utf8 path").to_string();
        std::fs::write(dir.path().join("ice.ron"), "(name: \"ice\", id: 3, slipperiness: 0.98)")
            .expect("write");

        let mut app = App::new();
        app.insert_resource(BlockRegistry::default());
        let watcher = BlockWatcher::stub(&path);
        let flag = watcher.0.changed.clone();
        app.insert_resource(watcher);
        app.add_systems(Update, check_block_changes);

        app.update();
        assert!(app.world().resource::<BlockRegistry>().get("ice").is_none());

        *flag.lock().expect("lock") = true;
        app.update();
        assert_eq!(app.world().resource::<BlockRegistry>().slipperiness(3), 0.98);
    }
}
