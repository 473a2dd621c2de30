//! Collision method strategies: which narrow-phase resolver handles which
//! pair of shape kinds.

use super::contact::Resolution;
use super::narrowphase::{aabb_aabb, circle_aabb, circle_circle, sat};
use super::shape::Shape;

/// Selectable narrow-phase method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionMethodKind {
    /// Separating axis theorem for everything but circle pairs.
    #[default]
    Sat,
    /// Bounding boxes only; rotation is ignored.
    Aabb,
}

/// Dispatch from a pair of shapes to a resolver.
///
/// Implementations must cover every `(Shape, Shape)` combination.
pub trait CollisionMethod: Send + Sync {
    fn resolve(&self, a: &Shape, b: &Shape) -> Option<Resolution>;
}

/// SAT method: circle-circle uses the circle resolver, every other pair goes
/// through [`sat`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SatMethod;

impl CollisionMethod for SatMethod {
    fn resolve(&self, a: &Shape, b: &Shape) -> Option<Resolution> {
        match (a, b) {
            (Shape::Circle(ca), Shape::Circle(cb)) => circle_circle(ca, cb),
            (Shape::Polygon(_), Shape::Polygon(_))
            | (Shape::Circle(_), Shape::Polygon(_))
            | (Shape::Polygon(_), Shape::Circle(_)) => sat(a, b),
        }
    }
}

/// AABB method: polygons are reduced to their bounding boxes.
#[derive(Debug, Default, Clone, Copy)]
pub struct AabbMethod;

impl CollisionMethod for AabbMethod {
    fn resolve(&self, a: &Shape, b: &Shape) -> Option<Resolution> {
        match (a, b) {
            (Shape::Polygon(pa), Shape::Polygon(pb)) => {
                aabb_aabb(&pa.bounding_box(), &pb.bounding_box())
            }
            (Shape::Circle(c), Shape::Polygon(p)) => circle_aabb(c, &p.bounding_box(), false),
            (Shape::Polygon(p), Shape::Circle(c)) => circle_aabb(c, &p.bounding_box(), true),
            (Shape::Circle(ca), Shape::Circle(cb)) => circle_circle(ca, cb),
        }
    }
}

/// Build the strategy for a configured method.
pub fn collision_method_for(kind: CollisionMethodKind) -> Box<dyn CollisionMethod> {
    match kind {
        CollisionMethodKind::Sat => Box::new(SatMethod),
        CollisionMethodKind::Aabb => Box::new(AabbMethod),
    }
}
