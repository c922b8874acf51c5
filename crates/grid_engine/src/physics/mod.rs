//! Collision detection and motion resolution
//!
//! The frame loop is: rebuild the spatial hash
//! ([`CollisionQuery::reset_spatial_hash`]), run the motion pass
//! ([`MotionResolver::update`]), then cast vision cones
//! ([`DetectionSystem::update`]) against the now-current hash.

pub mod detection;
pub mod events;
pub mod layers;
pub mod motion;
pub mod query;
pub mod ray;

pub use detection::{ConeView, DetectionSystem};
pub use events::{CollisionPair, MotionEvents};
pub use layers::{CollisionLayer, Layer};
pub use motion::MotionResolver;
pub use query::{CollisionQuery, RaycastHit, RaycastResult};
pub use ray::Ray;
