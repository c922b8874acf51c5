//! Axis-aligned rectangle primitives
//!
//! Two rectangle types back the whole collision core: [`Rect`] is a
//! local-space (origin-relative) integer box attached to an entity, and
//! [`WorldRect`] is its float world-space counterpart after translation by
//! the entity's position. Y grows downward, matching screen space.
//!
//! Overlap tests are strict open-interval AABB tests: rectangles that only
//! share an edge do not intersect. That keeps entities standing exactly
//! flush against a wall from registering a collision every frame.

use crate::foundation::math::Vec2;

/// Local-space axis-aligned rectangle in integer units.
///
/// Never mutated after creation; derived rectangles are recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Left edge offset from the entity origin
    pub x: i32,
    /// Top edge offset from the entity origin
    pub y: i32,
    /// Width (non-negative)
    pub width: i32,
    /// Height (non-negative)
    pub height: i32,
}

impl Rect {
    /// Create a new rectangle. Extents must be non-negative.
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        debug_assert!(width >= 0 && height >= 0, "rectangle extents must be non-negative");
        Self { x, y, width, height }
    }

    /// Left edge
    pub fn left(&self) -> i32 {
        self.x
    }

    /// Right edge
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Top edge
    pub fn top(&self) -> i32 {
        self.y
    }

    /// Bottom edge
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Strict open-interval overlap test.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Smallest rectangle containing both `self` and `other`.
    pub fn union(&self, other: &Rect) -> Rect {
        let left = self.left().min(other.left());
        let top = self.top().min(other.top());
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(left, top, right - left, bottom - top)
    }

    /// Grow (or shrink, for negative `amount`) the rectangle on all sides.
    pub fn inflate(&self, amount: i32) -> Rect {
        Rect::new(
            self.x - amount,
            self.y - amount,
            (self.width + 2 * amount).max(0),
            (self.height + 2 * amount).max(0),
        )
    }

    /// Translate into world space by an entity position.
    pub fn world_rect(&self, position: Vec2) -> WorldRect {
        WorldRect {
            x: position.x + self.x as f32,
            y: position.y + self.y as f32,
            width: self.width as f32,
            height: self.height as f32,
        }
    }
}

/// World-space axis-aligned rectangle in float units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldRect {
    /// Left edge in world space
    pub x: f32,
    /// Top edge in world space
    pub y: f32,
    /// Width (non-negative)
    pub width: f32,
    /// Height (non-negative)
    pub height: f32,
}

impl WorldRect {
    /// Create a new world-space rectangle. Extents must be non-negative.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        debug_assert!(width >= 0.0 && height >= 0.0, "rectangle extents must be non-negative");
        Self { x, y, width, height }
    }

    /// Left edge
    pub fn left(&self) -> f32 {
        self.x
    }

    /// Right edge
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Top edge
    pub fn top(&self) -> f32 {
        self.y
    }

    /// Bottom edge
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Top-left corner (minimum corner for the slab test)
    pub fn min(&self) -> Vec2 {
        Vec2::new(self.left(), self.top())
    }

    /// Bottom-right corner (maximum corner for the slab test)
    pub fn max(&self) -> Vec2 {
        Vec2::new(self.right(), self.bottom())
    }

    /// Strict open-interval overlap test.
    pub fn intersects(&self, other: &WorldRect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Point containment (closed on the min edges, open on the max edges).
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.left()
            && point.x < self.right()
            && point.y >= self.top()
            && point.y < self.bottom()
    }
}
