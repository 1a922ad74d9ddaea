pub mod block;
pub mod math;
pub mod physics;
pub mod ron;
pub use crate::ron as ron_loader;
pub mod settings;
pub mod world;
