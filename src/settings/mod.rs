//! Settings, types and defaults.
//!
//! Settings are stored as a RON file under `data/settings/`. Physics tuning is
//! read once when a session starts and handed to the integrator by value, so
//! two sessions in one process never share mutable tuning state.
use crate::math::BoundingBox;
use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

/// Movement tuning. All speeds are in blocks per tick, accelerations in
/// blocks per tick².
///
/// Defaults are the widely published vanilla values; servers with modified
/// physics should ship their own `physics.ron`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicsSettings {
    #[serde(default = "PhysicsSettings::default_gravity")]
    pub gravity: f64, // Subtracted from vertical velocity every tick
    #[serde(default = "PhysicsSettings::default_base_drag")]
    pub base_drag: f64, // Vertical drag factor, also scales ground acceleration
    #[serde(default = "PhysicsSettings::default_drag_multiplier")]
    pub drag_multiplier: f64, // Horizontal drag is slipperiness × this
    #[serde(default = "PhysicsSettings::default_walking_speed")]
    pub walking_speed: f64, // Base ground acceleration while walking
    #[serde(default = "PhysicsSettings::default_sprint_multiplier")]
    pub sprint_multiplier: f64,
    #[serde(default = "PhysicsSettings::default_air_accel")]
    pub air_accel: f64, // Acceleration while airborne, independent of surface
    #[serde(default = "PhysicsSettings::default_jump_speed")]
    pub jump_speed: f64,
    #[serde(default = "PhysicsSettings::default_jump_sprint_boost")]
    pub jump_sprint_boost: f64, // Horizontal kick added by a sprint jump
    #[serde(default = "PhysicsSettings::default_baseline_slipperiness")]
    pub baseline_slipperiness: f64, // Surface slip at which ground acceleration is unscaled
    #[serde(default)]
    pub bounding_box: BoundingBox,
    #[serde(default)]
    pub collision: CollisionSettings,
}

impl PhysicsSettings {
    fn default_gravity() -> f64 { 0.08 }
    fn default_base_drag() -> f64 { 0.98 }
    fn default_drag_multiplier() -> f64 { 0.91 }
    fn default_walking_speed() -> f64 { 0.1 }
    fn default_sprint_multiplier() -> f64 { 1.3 }
    fn default_air_accel() -> f64 { 0.02 }
    fn default_jump_speed() -> f64 { 0.42 }
    fn default_jump_sprint_boost() -> f64 { 0.2 }
    fn default_baseline_slipperiness() -> f64 { 0.6 }
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: Self::default_gravity(),
            base_drag: Self::default_base_drag(),
            drag_multiplier: Self::default_drag_multiplier(),
            walking_speed: Self::default_walking_speed(),
            sprint_multiplier: Self::default_sprint_multiplier(),
            air_accel: Self::default_air_accel(),
            jump_speed: Self::default_jump_speed(),
            jump_sprint_boost: Self::default_jump_sprint_boost(),
            baseline_slipperiness: Self::default_baseline_slipperiness(),
            bounding_box: BoundingBox::default(),
            collision: CollisionSettings::default(),
        }
    }
}

/// Bounds on the minimum-translation-vector search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollisionSettings {
    #[serde(default = "CollisionSettings::default_fp_slack")]
    pub fp_slack: f64, // Allowed growth of |velocity|² when accepting a correction
    #[serde(default = "CollisionSettings::default_max_hops")]
    pub max_hops: u32, // Corrections chained onto one candidate before giving up on it
    #[serde(default = "CollisionSettings::default_max_candidates")]
    pub max_candidates: usize, // Hard cap on candidates examined per tick
}

impl CollisionSettings {
    fn default_fp_slack() -> f64 { 1e-4 }
    fn default_max_hops() -> u32 { 6 }
    fn default_max_candidates() -> usize { 512 }
}

impl Default for CollisionSettings {
    fn default() -> Self {
        Self {
            fp_slack: Self::default_fp_slack(),
            max_hops: Self::default_max_hops(),
            max_candidates: Self::default_max_candidates(),
        }
    }
}

/// Session wiring: tick cadence and data locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    #[serde(default = "SessionSettings::default_tick_rate")]
    pub tick_rate: f64, // Physics and client ticks per second
    #[serde(default = "SessionSettings::default_blocks_dir")]
    pub blocks_dir: String, // Directory of block material RON files
    #[serde(default = "SessionSettings::default_hot_reload")]
    pub hot_reload_blocks: bool, // Watch `blocks_dir` and reload materials on change
}

impl SessionSettings {
    fn default_tick_rate() -> f64 { 20.0 }
    fn default_blocks_dir() -> String { "data/blocks".to_string() }
    fn default_hot_reload() -> bool { true }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            tick_rate: Self::default_tick_rate(),
            blocks_dir: Self::default_blocks_dir(),
            hot_reload_blocks: Self::default_hot_reload(),
        }
    }
}

/// Top-level Settings
#[derive(Resource, Clone, Debug, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub physics: PhysicsSettings,
    #[serde(default)]
    pub session: SessionSettings,
}

impl Settings {
    #[must_use]
    pub fn defaults() -> Self { Settings::default() }
}

pub mod loader;
