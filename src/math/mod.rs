//! Geometry primitives shared by the block table and the physics core.

pub mod bbox;
pub mod vector;

pub use bbox::{Aabb, BoundingBox, CONTACT_EPSILON};
pub use vector::Vector3;
