//! # Core Engine Module
//!
//! Shared abstractions the rest of the engine depends on.
//!
//! ## Organization
//!
//! - **Config**: configuration for the collision core (grid granularity,
//!   world bounds, sweep tuning, detection cone density)

pub mod config;

pub use config::{CollisionConfig, ConfigError};
