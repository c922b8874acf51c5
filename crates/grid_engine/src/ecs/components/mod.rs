//! Component type definitions

pub mod collision;
pub mod movement;
pub mod transform;

pub use collision::{CanBeDetected, CanMoveThroughDespiteCollision, Collider, DetectionCone};
pub use movement::Movement;
pub use transform::Position;
