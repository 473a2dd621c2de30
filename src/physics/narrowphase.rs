//! Narrowphase collision detection: SAT, AABB and specialized circle tests.
//!
//! Every resolver answers "does A overlap B, and how do they separate" with
//! the [`Resolution`] sign convention: `direction` points from A towards B.

use glam::Vec2;

use crate::math::Rect;

use super::contact::Resolution;
use super::shape::{Circle, Shape};

/// Circle-circle test. Touching circles collide with zero penetration.
///
/// Coincident centres resolve with a zero direction.
pub fn circle_circle(a: &Circle, b: &Circle) -> Option<Resolution> {
    let delta = b.position() - a.position();
    let distance = delta.length();
    let radii = a.radius() + b.radius();

    if distance > radii {
        return None;
    }

    Some(Resolution {
        direction: delta.normalize_or_zero(),
        penetration: radii - distance,
    })
}

/// Circle against an axis-aligned rectangle.
///
/// With `invert = false` the circle is A; with `invert = true` the rectangle
/// is A and the direction is flipped to match.
pub fn circle_aabb(circle: &Circle, rect: &Rect, invert: bool) -> Option<Resolution> {
    let center = circle.position();
    let radius = circle.radius();
    let closest = center.clamp(rect.min, rect.max);
    let delta = closest - center;
    let distance = delta.length();

    if distance > radius {
        return None;
    }

    let resolution = if distance > 0.0 {
        Resolution {
            direction: delta / distance,
            penetration: radius - distance,
        }
    } else {
        // Centre inside the rectangle: leave through the nearest face.
        // Ties go to the first entry, so an exact centre exits through the top.
        let faces = [
            (rect.max.y - center.y, Vec2::NEG_Y),
            (center.y - rect.min.y, Vec2::Y),
            (center.x - rect.min.x, Vec2::X),
            (rect.max.x - center.x, Vec2::NEG_X),
        ];
        let mut nearest = faces[0];
        for face in &faces[1..] {
            if face.0 < nearest.0 {
                nearest = *face;
            }
        }
        Resolution {
            direction: nearest.1,
            penetration: radius + nearest.0,
        }
    };

    Some(if invert {
        resolution.inverted()
    } else {
        resolution
    })
}

/// Rectangle overlap on bounding boxes only. Rotation is ignored.
///
/// Resolves along the axis of least overlap.
pub fn aabb_aabb(a: &Rect, b: &Rect) -> Option<Resolution> {
    let overlap_x = a.max.x.min(b.max.x) - a.min.x.max(b.min.x);
    let overlap_y = a.max.y.min(b.max.y) - a.min.y.max(b.min.y);

    if overlap_x <= 0.0 || overlap_y <= 0.0 {
        return None;
    }

    let delta = b.center() - a.center();
    let resolution = if overlap_x < overlap_y {
        Resolution {
            direction: if delta.x >= 0.0 { Vec2::X } else { Vec2::NEG_X },
            penetration: overlap_x,
        }
    } else {
        Resolution {
            direction: if delta.y >= 0.0 { Vec2::Y } else { Vec2::NEG_Y },
            penetration: overlap_y,
        }
    };
    Some(resolution)
}

/// Separating axis test between any two shapes.
///
/// Candidate axes are the edge normals of both shapes plus, for each circle,
/// the direction from its centre to the nearest vertex of the other shape.
/// Identical axes are tested once. Returns the axis of least overlap.
pub fn sat(a: &Shape, b: &Shape) -> Option<Resolution> {
    if is_empty(a) || is_empty(b) {
        return None;
    }

    let circle_axis_a = circle_axis(a, b);
    let circle_axis_b = circle_axis(b, a);
    let axes = polygon_axes(a)
        .iter()
        .chain(polygon_axes(b))
        .chain(circle_axis_a.iter())
        .chain(circle_axis_b.iter());

    let mut best: Option<Resolution> = None;

    for (index, axis) in axes.clone().enumerate() {
        if axes.clone().take(index).any(|tested| tested == axis) {
            continue;
        }

        let (min_a, max_a) = project(a, *axis);
        let (min_b, max_b) = project(b, *axis);

        let (overlap, direction) = axis_overlap(min_a, max_a, min_b, max_b, *axis);
        if overlap <= 0.0 {
            return None;
        }

        if best.map_or(true, |r| overlap < r.penetration) {
            best = Some(Resolution {
                direction,
                penetration: overlap,
            });
        }
    }

    best
}

/// Overlap of two projection intervals and the oriented axis.
///
/// When one interval is nested in the other the plain interval overlap
/// understates the separation; the nearer boundary gap is added and the axis
/// is oriented so A exits through that boundary.
fn axis_overlap(min_a: f32, max_a: f32, min_b: f32, max_b: f32, axis: Vec2) -> (f32, Vec2) {
    let mut overlap = max_a.min(max_b) - min_a.max(min_b);

    let contained = (min_a >= min_b && max_a <= max_b) || (min_b >= min_a && max_b <= max_a);
    if contained {
        let min_gap = (min_a - min_b).abs();
        let max_gap = (max_a - max_b).abs();
        overlap += min_gap.min(max_gap);
    }

    // A moves towards -axis by (max_a - min_b) or towards +axis by
    // (max_b - min_a); the direction points the opposite way.
    let direction = if max_a - min_b <= max_b - min_a {
        axis
    } else {
        -axis
    };

    (overlap, direction)
}

fn is_empty(shape: &Shape) -> bool {
    match shape {
        Shape::Polygon(p) => p.vertices().is_empty(),
        Shape::Circle(_) => false,
    }
}

fn polygon_axes(shape: &Shape) -> &[Vec2] {
    match shape {
        Shape::Polygon(p) => p.projection_axes(),
        Shape::Circle(_) => &[],
    }
}

/// Axis from a circle's centre to the nearest feature of `other`.
fn circle_axis(shape: &Shape, other: &Shape) -> Option<Vec2> {
    let Shape::Circle(circle) = shape else {
        return None;
    };
    let center = circle.position();

    let target = match other {
        Shape::Circle(c) => c.position(),
        Shape::Polygon(p) => {
            let mut nearest = *p.vertices().first()?;
            let mut nearest_distance = nearest.distance_squared(center);
            for v in &p.vertices()[1..] {
                let d = v.distance_squared(center);
                if d < nearest_distance {
                    nearest_distance = d;
                    nearest = *v;
                }
            }
            nearest
        }
    };

    let axis = (target - center).normalize_or_zero();
    (axis != Vec2::ZERO).then_some(axis)
}

/// Project a shape onto a unit axis. Circles project as the two points
/// `centre ± radius * axis`.
fn project(shape: &Shape, axis: Vec2) -> (f32, f32) {
    match shape {
        Shape::Polygon(p) => {
            let mut min = f32::INFINITY;
            let mut max = f32::NEG_INFINITY;
            for v in p.vertices() {
                let d = v.dot(axis);
                min = min.min(d);
                max = max.max(d);
            }
            (min, max)
        }
        Shape::Circle(c) => {
            let center = c.position().dot(axis);
            (center - c.radius(), center + c.radius())
        }
    }
}
