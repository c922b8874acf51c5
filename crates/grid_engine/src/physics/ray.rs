//! Ray versus AABB intersection
//!
//! Slab-method intersection for finite rays. A ray is an origin plus a
//! displacement covering the whole extent of travel, so the parametric
//! hit interval is meaningful only within `[0, 1]`.
//!
//! Division by a zero direction component would put infinities and NaNs
//! into the slab interval, so axes the ray does not move along are
//! handled as pure containment checks instead. A fully zero displacement
//! is degenerate and never hits anything, even from inside a box.

use crate::foundation::math::Vec2;
use crate::geometry::WorldRect;

/// A finite ray: origin plus full-extent displacement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start of the ray
    pub origin: Vec2,
    /// Full displacement from origin to the ray's end
    pub displacement: Vec2,
}

impl Ray {
    /// Create a ray from an origin and its full displacement.
    pub fn new(origin: Vec2, displacement: Vec2) -> Self {
        Self {
            origin,
            displacement,
        }
    }

    /// Ray from origin along a direction for a given distance.
    pub fn from_direction(origin: Vec2, direction: Vec2, distance: f32) -> Self {
        Self {
            origin,
            displacement: direction * distance,
        }
    }

    /// Point at parameter `t` along the ray.
    pub fn point_at(&self, t: f32) -> Vec2 {
        self.origin + self.displacement * t
    }

    /// End of the ray (`t = 1`).
    pub fn end(&self) -> Vec2 {
        self.point_at(1.0)
    }

    /// Whether the ray touches the rectangle within its extent.
    pub fn intersects(&self, rect: &WorldRect) -> bool {
        self.slab_interval(rect).is_some()
    }

    /// Where the ray enters the rectangle, if it touches it.
    ///
    /// For a ray starting inside the rectangle the exit point is returned
    /// instead; either way the result is clamped to the ray's extent.
    pub fn intersection_point(&self, rect: &WorldRect) -> Option<Vec2> {
        let (t_near, t_far) = self.slab_interval(rect)?;
        let t = if t_near < 0.0 { t_far } else { t_near };
        Some(self.point_at(t.clamp(0.0, 1.0)))
    }

    /// Entry/exit parameter interval against the rectangle, or `None`
    /// when the ray misses it entirely.
    fn slab_interval(&self, rect: &WorldRect) -> Option<(f32, f32)> {
        if self.displacement == Vec2::zeros() {
            return None;
        }
        let min = rect.min();
        let max = rect.max();
        let mut t_near = f32::NEG_INFINITY;
        let mut t_far = f32::INFINITY;

        for axis in 0..2 {
            let origin = self.origin[axis];
            let delta = self.displacement[axis];
            if delta == 0.0 {
                // Ray parallel to this slab: it either stays inside the
                // slab for all t or never enters it.
                if origin < min[axis] || origin > max[axis] {
                    return None;
                }
                continue;
            }
            let t1 = (min[axis] - origin) / delta;
            let t2 = (max[axis] - origin) / delta;
            t_near = t_near.max(t1.min(t2));
            t_far = t_far.min(t1.max(t2));
        }

        if t_near <= t_far && t_far >= 0.0 && t_near <= 1.0 {
            Some((t_near, t_far))
        } else {
            None
        }
    }
}
