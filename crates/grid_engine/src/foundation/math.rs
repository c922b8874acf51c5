//! Math utilities and types
//!
//! Provides the fundamental math types for 2D game development, plus the
//! small helpers the collision and motion code leans on: zero-safe
//! normalization, angle conversions, and the sign-aware integer stepper
//! used by the sweep test.

pub use nalgebra::Vector2;

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// Normalize a vector, mapping the zero vector to the zero vector.
///
/// Plain normalization of a zero-length vector produces NaN components;
/// direction vectors fed into motion and raycasts must never do that.
pub fn safe_normalize(v: Vec2) -> Vec2 {
    if v.magnitude_squared() == 0.0 {
        Vec2::zeros()
    } else {
        v.normalize()
    }
}

/// Heading angle (radians) of a unit vector, measured from +X.
pub fn angle_from_unit_vector(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}

/// Unit vector pointing along `angle` radians from +X.
pub fn unit_vector_from_angle(angle: f32) -> Vec2 {
    safe_normalize(Vec2::new(angle.cos(), angle.sin()))
}

/// Sign-aware integer stepper from `start` (exclusive) to `end` (inclusive).
///
/// Yields successive integer positions toward `end`, stepping by
/// `step` units per iteration in the correct direction and never
/// overshooting the endpoint (the final step is clamped). An empty range
/// (`start == end`) yields nothing.
///
/// The motion resolver walks one of these per axis, testing each candidate
/// position for collision before committing to it.
#[derive(Debug, Clone)]
pub struct IntegerSteps {
    current: i32,
    end: i32,
    step: i32,
}

impl IntegerSteps {
    /// Unit stepper from `start` toward `end`.
    pub fn new(start: i32, end: i32) -> Self {
        Self::with_step(start, end, 1)
    }

    /// Stepper with a coarser step size (used by the high-speed sweep).
    ///
    /// `step` is a magnitude; direction is derived from the endpoints.
    pub fn with_step(start: i32, end: i32, step: i32) -> Self {
        debug_assert!(step > 0, "step magnitude must be positive");
        Self {
            current: start,
            end,
            step: step.max(1),
        }
    }
}

impl Iterator for IntegerSteps {
    type Item = i32;

    fn next(&mut self) -> Option<i32> {
        if self.current == self.end {
            return None;
        }
        let remaining = self.end - self.current;
        let advance = self.step.min(remaining.abs()) * remaining.signum();
        self.current += advance;
        Some(self.current)
    }
}
