//! Movement component
//!
//! Motion is expressed as a unit direction plus a scalar speed rather
//! than a velocity vector. Damping then only touches the speed, and a
//! projectile that has been slowed to a stop still remembers where it
//! was headed.

use crate::ecs::Component;
use crate::foundation::math::{safe_normalize, Vec2};

/// Direction-and-speed motion state for an entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Movement {
    direction: Vec2,
    /// Speed in world units per second
    pub speed: f32,
    /// Velocity gained per second (gravity, thrust); folded into the
    /// direction and speed before each frame's integration
    pub acceleration: Vec2,
    /// Speed lost per second; speed never drops below zero
    pub damping: f32,
    /// Resolve the whole frame's travel with a single ray instead of a sweep
    pub hitscan: bool,
    /// Report the entity as expired once its total travel reaches this
    pub max_distance: Option<f32>,
    /// Distance covered so far, accumulated by the motion pass
    pub travelled: f32,
    /// Land on whole-unit coordinates even when moving without collision
    pub force_integer: bool,
}

impl Movement {
    /// Motionless movement state.
    pub fn new() -> Self {
        Self {
            direction: Vec2::zeros(),
            speed: 0.0,
            acceleration: Vec2::zeros(),
            damping: 0.0,
            hitscan: false,
            max_distance: None,
            travelled: 0.0,
            force_integer: false,
        }
    }

    /// Movement along `direction` at `speed` units per second.
    pub fn with_velocity(direction: Vec2, speed: f32) -> Self {
        Self {
            direction: safe_normalize(direction),
            speed,
            ..Self::new()
        }
    }

    /// Hitscan movement: the frame's travel is resolved by one raycast.
    pub fn hitscan(direction: Vec2, speed: f32) -> Self {
        Self {
            hitscan: true,
            ..Self::with_velocity(direction, speed)
        }
    }

    /// Unit direction of travel (zero when motionless).
    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    /// Point the movement along a new direction.
    ///
    /// The input need not be normalized; a zero vector stops directional
    /// travel without touching the speed.
    pub fn set_direction(&mut self, direction: Vec2) {
        self.direction = safe_normalize(direction);
    }

    /// Current velocity vector.
    pub fn velocity(&self) -> Vec2 {
        self.direction * self.speed
    }

    /// Fold `dt` seconds of acceleration into the direction and speed.
    ///
    /// The direction-and-speed form means accelerating can both turn and
    /// speed up the mover; a zero acceleration leaves it untouched.
    pub fn apply_acceleration(&mut self, dt: f32) {
        if self.acceleration == Vec2::zeros() {
            return;
        }
        let velocity = self.velocity() + self.acceleration * dt;
        self.speed = velocity.magnitude();
        self.direction = safe_normalize(velocity);
    }

    /// Apply damping across `dt` seconds.
    pub fn apply_damping(&mut self, dt: f32) {
        self.speed = (self.speed - self.damping * dt).max(0.0);
    }
}

impl Default for Movement {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for Movement {}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_direction_is_normalized() {
        let m = Movement::with_velocity(Vec2::new(3.0, 4.0), 100.0);
        assert_relative_eq!(m.direction().magnitude(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(m.velocity().magnitude(), 100.0, epsilon = 1e-4);
    }

    #[test]
    fn test_zero_direction_stays_zero() {
        let m = Movement::with_velocity(Vec2::zeros(), 50.0);
        assert_eq!(m.direction(), Vec2::zeros());
        assert_eq!(m.velocity(), Vec2::zeros());
    }

    #[test]
    fn test_acceleration_folds_into_velocity() {
        let mut m = Movement::new();
        m.acceleration = Vec2::new(0.0, 50.0);

        // From rest: acceleration sets both heading and speed.
        m.apply_acceleration(1.0);
        assert_relative_eq!(m.speed, 50.0);
        assert_relative_eq!(m.direction().y, 1.0);

        // Sideways acceleration bends an existing velocity.
        let mut m = Movement::with_velocity(Vec2::new(1.0, 0.0), 30.0);
        m.acceleration = Vec2::new(0.0, 40.0);
        m.apply_acceleration(1.0);
        assert_relative_eq!(m.speed, 50.0, epsilon = 1e-4);
        assert_relative_eq!(m.velocity().x, 30.0, epsilon = 1e-4);
        assert_relative_eq!(m.velocity().y, 40.0, epsilon = 1e-4);
    }

    #[test]
    fn test_damping_floors_at_zero() {
        let mut m = Movement::with_velocity(Vec2::new(1.0, 0.0), 10.0);
        m.damping = 8.0;
        m.apply_damping(1.0);
        assert_relative_eq!(m.speed, 2.0);
        m.apply_damping(1.0);
        assert_eq!(m.speed, 0.0);
    }
}
