//! Spatial partitioning for broad-phase collision queries

pub mod grid;

pub use grid::SpatialHash;
