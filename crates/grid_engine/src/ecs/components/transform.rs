//! Position component
//!
//! Positions accumulate motion in floats but are read by everything else
//! (colliders, the spatial hash, rendering) as rounded integers. Keeping
//! the raw float across frames means sub-unit velocities still add up
//! instead of being rounded away each frame.

use crate::ecs::Component;
use crate::foundation::math::Vec2;

/// World-space position of an entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    raw: Vec2,
}

impl Position {
    /// Create a position from float coordinates.
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            raw: Vec2::new(x, y),
        }
    }

    /// Create a position from a vector.
    pub fn from_vec(raw: Vec2) -> Self {
        Self { raw }
    }

    /// The raw float position.
    pub fn as_vec(&self) -> Vec2 {
        self.raw
    }

    /// Rounded integer X, as seen by colliders and the grid.
    pub fn x(&self) -> i32 {
        self.raw.x.round() as i32
    }

    /// Rounded integer Y, as seen by colliders and the grid.
    pub fn y(&self) -> i32 {
        self.raw.y.round() as i32
    }

    /// Integer position as a float vector, for code that must agree with
    /// the rounded coordinates (collider placement, grid insertion).
    pub fn rounded_vec(&self) -> Vec2 {
        Vec2::new(self.x() as f32, self.y() as f32)
    }

    /// Replace X with an exact integer coordinate, keeping raw Y.
    ///
    /// Used by the axis-separated sweep: committing to an integer X must
    /// not discard sub-unit progress accumulated on Y.
    pub fn with_x(&self, x: i32) -> Self {
        Self {
            raw: Vec2::new(x as f32, self.raw.y),
        }
    }

    /// Replace Y with an exact integer coordinate, keeping raw X.
    pub fn with_y(&self, y: i32) -> Self {
        Self {
            raw: Vec2::new(self.raw.x, y as f32),
        }
    }

    /// Position moved by `delta`.
    pub fn translated(&self, delta: Vec2) -> Self {
        Self {
            raw: self.raw + delta,
        }
    }
}

impl Component for Position {}
