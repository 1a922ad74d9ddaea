//! Client-side movement physics.
//!
//! The player is a single kinematic box. Each tick the [`Integrator`] turns
//! the current [`MovementIntent`] into velocity, asks the
//! [`CollisionResolver`] for the smallest correction that keeps the box out
//! of solid blocks, and moves.
//!
//! # Example:
//!
//! ```
//! use strider::block::BlockRegistry;
//! use strider::math::Vector3;
//! use strider::physics::Integrator;
//! use strider::settings::PhysicsSettings;
//! use strider::world::World;
//!
//! let mut world = World::new();
//! world.fill((-4, 0, -4), (4, 0, 4), 1);
//! let registry = BlockRegistry::with_defaults();
//!
//! let mut player = Integrator::new(PhysicsSettings::default(), Vector3::new(0.5, 3.0, 0.5));
//! for _ in 0..40 {
//!     player.on_tick(&world, &registry);
//! }
//! assert!(player.position().on_ground);
//! ```
pub mod collision;
pub mod integrator;
pub mod intent;
pub mod plugin;

use crate::math::Vector3;

pub use collision::{CollisionResolver, Mtv};
pub use integrator::{Integrator, TickOutcome, TickState};
pub use intent::MovementIntent;
pub use plugin::{
    ClientAbilities, ClientMount, ClientPositionUpdate, ClientUnmount, PhysicsPlugin, PhysicsSet,
    PositionPublished,
};

/// Feet-centre position plus whether the last move ended on a floor.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub coords: Vector3,
    pub on_ground: bool,
}

impl Position {
    #[must_use]
    pub fn new(coords: Vector3) -> Self {
        Self { coords, on_ground: false }
    }
}
