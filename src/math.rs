//! 2D geometry helpers shared by the physics pipeline.

use glam::Vec2;

/// Axis-aligned rectangle. Used as the bounding box of every shape and as the
/// key of the broad-phase structures.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn from_min_max(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Smallest rectangle enclosing every point. `None` for an empty slice.
    pub fn from_points(points: &[Vec2]) -> Option<Self> {
        let first = *points.first()?;
        let mut rect = Self {
            min: first,
            max: first,
        };
        for p in &points[1..] {
            rect.min = rect.min.min(*p);
            rect.max = rect.max.max(*p);
        }
        Some(rect)
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Inclusive overlap test: rectangles sharing only an edge intersect.
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    #[inline]
    pub fn contains_rect(&self, other: &Rect) -> bool {
        self.min.x <= other.min.x
            && self.min.y <= other.min.y
            && self.max.x >= other.max.x
            && self.max.y >= other.max.y
    }

    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

/// Rotate `v` about the origin with the standard 2x2 rotation matrix.
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Rotate `v` about the origin in polar form (angle via `atan2`, then rebuild
/// from the magnitude). Offsets and parent-relative positions go through this
/// form; vertices use [`rotate`].
#[inline]
pub fn rotate_polar(v: Vec2, angle: f32) -> Vec2 {
    let magnitude = v.length();
    if magnitude == 0.0 {
        return Vec2::ZERO;
    }
    let theta = v.y.atan2(v.x) + angle;
    Vec2::new(theta.cos(), theta.sin()) * magnitude
}
