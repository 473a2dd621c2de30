//! Collision shapes with cached world-space geometry.
//!
//! Shapes are owned by collider components and rebuilt in place every physics
//! tick from the owning entity's [`GlobalTransform`](crate::ecs::components::GlobalTransform).
//! Only the first update of a shape allocates.

use glam::Vec2;

use crate::math::{rotate, rotate_polar, Rect};

/// Per-tick identifier assigned by the collision resolver. Used as the
/// broad-phase key.
pub type ShapeId = usize;

/// Shape kind discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Polygon,
    Circle,
}

/// A collision shape.
#[derive(Debug, Clone)]
pub enum Shape {
    Polygon(Polygon),
    Circle(Circle),
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Polygon(_) => ShapeKind::Polygon,
            Shape::Circle(_) => ShapeKind::Circle,
        }
    }

    /// World-space bounding box as of the last update.
    pub fn bounding_box(&self) -> Rect {
        match self {
            Shape::Polygon(p) => p.bounding_box,
            Shape::Circle(c) => c.bounding_box,
        }
    }

    /// World-space vertices. Empty for circles.
    pub fn vertices(&self) -> &[Vec2] {
        match self {
            Shape::Polygon(p) => &p.vertices,
            Shape::Circle(_) => &[],
        }
    }

    /// World-space radius. Zero for polygons.
    pub fn radius(&self) -> f32 {
        match self {
            Shape::Polygon(_) => 0.0,
            Shape::Circle(c) => c.radius,
        }
    }

    pub fn position(&self) -> Vec2 {
        match self {
            Shape::Polygon(p) => p.position,
            Shape::Circle(c) => c.position,
        }
    }

    /// Whether this shape is ever used as the local side of a narrow-phase
    /// query. Passive shapes (tilemap tiles) are only ever hit.
    pub fn update_collisions(&self) -> bool {
        match self {
            Shape::Polygon(p) => p.update_collisions,
            Shape::Circle(c) => c.update_collisions,
        }
    }
}

impl From<Polygon> for Shape {
    fn from(polygon: Polygon) -> Self {
        Shape::Polygon(polygon)
    }
}

impl From<Circle> for Shape {
    fn from(circle: Circle) -> Self {
        Shape::Circle(circle)
    }
}

/// Convex polygon, or a two-vertex edge.
#[derive(Debug, Clone)]
pub struct Polygon {
    vertex_model: Vec<Vec2>,
    vertices: Vec<Vec2>,
    projection_axes: Vec<Vec2>,
    bounding_box: Rect,
    position: Vec2,
    /// Local rotation added to the owning transform's rotation.
    pub rotation: f32,
    pub update_collisions: bool,
}

impl Polygon {
    /// Polygon from local-space vertices. Geometry stays empty until the
    /// first [`update`](Self::update).
    pub fn new(vertex_model: Vec<Vec2>) -> Self {
        Self {
            vertex_model,
            vertices: Vec::new(),
            projection_axes: Vec::new(),
            bounding_box: Rect::default(),
            position: Vec2::ZERO,
            rotation: 0.0,
            update_collisions: true,
        }
    }

    /// Axis-aligned box of `width` x `height` centred on the local origin.
    /// Vertices run top-left, top-right, bottom-right, bottom-left, so the
    /// top face normal is the first projection axis.
    pub fn rectangle(width: f32, height: f32) -> Self {
        let hw = width * 0.5;
        let hh = height * 0.5;
        Self::new(vec![
            Vec2::new(-hw, hh),
            Vec2::new(hw, hh),
            Vec2::new(hw, -hh),
            Vec2::new(-hw, -hh),
        ])
    }

    /// Single segment from `a` to `b`.
    pub fn edge(a: Vec2, b: Vec2) -> Self {
        Self::new(vec![a, b])
    }

    pub fn vertex_model(&self) -> &[Vec2] {
        &self.vertex_model
    }

    /// Replace the local outline. Takes effect on the next update.
    pub fn set_vertex_model(&mut self, vertex_model: Vec<Vec2>) {
        self.vertex_model = vertex_model;
    }

    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    /// Unit edge normals. Parallel edges yield duplicate axes.
    pub fn projection_axes(&self) -> &[Vec2] {
        &self.projection_axes
    }

    pub fn bounding_box(&self) -> Rect {
        self.bounding_box
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Recompute world vertices, bounding box and projection axes.
    ///
    /// Each model vertex is scaled component-wise, rotated by
    /// `self.rotation + rotation` about the local origin, then translated to
    /// `position`.
    pub fn update(&mut self, position: Vec2, scale: Vec2, rotation: f32) {
        self.position = position;
        let angle = self.rotation + rotation;

        self.vertices.resize(self.vertex_model.len(), Vec2::ZERO);
        for (vertex, model) in self.vertices.iter_mut().zip(&self.vertex_model) {
            *vertex = rotate(*model * scale, angle) + position;
        }

        self.bounding_box = Rect::from_points(&self.vertices).unwrap_or(Rect {
            min: position,
            max: position,
        });

        self.update_projection_axes();
    }

    fn update_projection_axes(&mut self) {
        self.projection_axes.clear();
        let count = self.vertices.len();
        let edges = match count {
            0 | 1 => 0,
            2 => 1,
            n => n,
        };
        for i in 0..edges {
            let edge = self.vertices[(i + 1) % count] - self.vertices[i];
            let normal = Vec2::new(edge.y, -edge.x).normalize_or_zero();
            // zero-length edges have no normal
            if normal != Vec2::ZERO {
                self.projection_axes.push(normal);
            }
        }
    }
}

/// Circle ("circumference") shape.
#[derive(Debug, Clone)]
pub struct Circle {
    model_radius: f32,
    radius: f32,
    position: Vec2,
    bounding_box: Rect,
    pub update_collisions: bool,
}

impl Circle {
    pub fn new(radius: f32) -> Self {
        Self {
            model_radius: radius.abs(),
            radius: radius.abs(),
            position: Vec2::ZERO,
            bounding_box: Rect::default(),
            update_collisions: true,
        }
    }

    pub fn model_radius(&self) -> f32 {
        self.model_radius
    }

    pub fn set_model_radius(&mut self, radius: f32) {
        self.model_radius = radius.abs();
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn bounding_box(&self) -> Rect {
        self.bounding_box
    }

    /// Recompute world radius and bounding box. Non-uniform scale is
    /// approximated by the larger absolute scale component.
    pub fn update(&mut self, position: Vec2, scale: Vec2) {
        self.position = position;
        self.radius = self.model_radius * scale.x.abs().max(scale.y.abs());
        let extent = Vec2::splat(self.radius);
        self.bounding_box = Rect {
            min: position - extent,
            max: position + extent,
        };
    }
}

/// World position of a shape whose collider sits at `offset` from an entity
/// at `position`.
///
/// The offset is scaled component-wise and, for a non-zero rotation, rotated
/// in polar form.
pub fn offset_position(position: Vec2, scale: Vec2, rotation: f32, offset: Vec2) -> Vec2 {
    let scaled = offset * scale;
    if rotation != 0.0 {
        position + rotate_polar(scaled, rotation)
    } else {
        position + scaled
    }
}
