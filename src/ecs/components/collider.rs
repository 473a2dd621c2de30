//! Collider components.
//!
//! Each collider owns the shapes it exposes to the collision pipeline and
//! rebuilds them in place from the entity's [`GlobalTransform`] every physics
//! tick.

use glam::Vec2;

use crate::ecs::components::tilemap::Tilemap;
use crate::ecs::components::transform::GlobalTransform;
use crate::physics::repository::ColliderKind;
use crate::physics::shape::{offset_position, Circle, Polygon, Shape};
use crate::physics::tilemap::generate_shapes;

/// Layer used by colliders that do not set one.
pub const DEFAULT_LAYER: &str = "default";

/// Settings shared by every collider kind.
#[derive(Debug, Clone, PartialEq)]
pub struct ColliderSettings {
    /// Offset from the entity position, in the entity's local space.
    pub offset: Vec2,
    pub layer: String,
    /// Layers this collider never collides with.
    pub ignore_layers: Vec<String>,
    /// If false, collisions are reported but rigid bodies are not corrected.
    pub physics: bool,
    /// Disabled colliders are skipped entirely.
    pub enabled: bool,
}

impl Default for ColliderSettings {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            layer: DEFAULT_LAYER.to_string(),
            ignore_layers: Vec::new(),
            physics: true,
            enabled: true,
        }
    }
}

impl ColliderSettings {
    pub fn with_layer(mut self, layer: impl Into<String>) -> Self {
        self.layer = layer.into();
        self
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    pub fn ignoring(mut self, layer: impl Into<String>) -> Self {
        self.ignore_layers.push(layer.into());
        self
    }

    /// Trigger-only: collisions are reported without position correction.
    pub fn sensor(mut self) -> Self {
        self.physics = false;
        self
    }
}

/// Capability shared by all collider components.
pub trait Collider: Send + Sync + 'static {
    fn kind(&self) -> ColliderKind;

    fn settings(&self) -> &ColliderSettings;

    /// Shapes as of the last [`update_shapes`](Self::update_shapes).
    fn shapes(&self) -> &[Shape];

    /// Reposition every owned shape from the entity's world transform.
    fn update_shapes(&mut self, transform: &GlobalTransform);
}

#[inline]
fn shape_position(settings: &ColliderSettings, transform: &GlobalTransform) -> Vec2 {
    offset_position(
        transform.position,
        transform.scale,
        transform.rotation,
        settings.offset,
    )
}

/// Circle collider.
#[derive(Debug, Clone)]
pub struct BallCollider {
    pub radius: f32,
    pub settings: ColliderSettings,
    shapes: Vec<Shape>,
}

impl BallCollider {
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            settings: ColliderSettings::default(),
            shapes: Vec::new(),
        }
    }

    pub fn with_settings(mut self, settings: ColliderSettings) -> Self {
        self.settings = settings;
        self
    }
}

impl Collider for BallCollider {
    fn kind(&self) -> ColliderKind {
        ColliderKind::Ball
    }

    fn settings(&self) -> &ColliderSettings {
        &self.settings
    }

    fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    fn update_shapes(&mut self, transform: &GlobalTransform) {
        let position = shape_position(&self.settings, transform);
        if let Some(Shape::Circle(circle)) = self.shapes.first_mut() {
            circle.set_model_radius(self.radius);
            circle.update(position, transform.scale);
        } else {
            let mut circle = Circle::new(self.radius);
            circle.update(position, transform.scale);
            self.shapes = vec![Shape::Circle(circle)];
        }
    }
}

/// Rectangle collider centred on the shape position.
#[derive(Debug, Clone)]
pub struct BoxCollider {
    pub width: f32,
    pub height: f32,
    /// Rotation relative to the entity, in radians.
    pub rotation: f32,
    pub settings: ColliderSettings,
    shapes: Vec<Shape>,
}

impl BoxCollider {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            rotation: 0.0,
            settings: ColliderSettings::default(),
            shapes: Vec::new(),
        }
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_settings(mut self, settings: ColliderSettings) -> Self {
        self.settings = settings;
        self
    }
}

impl Collider for BoxCollider {
    fn kind(&self) -> ColliderKind {
        ColliderKind::Box
    }

    fn settings(&self) -> &ColliderSettings {
        &self.settings
    }

    fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    fn update_shapes(&mut self, transform: &GlobalTransform) {
        let position = shape_position(&self.settings, transform);
        let top_right = Vec2::new(self.width, self.height) * 0.5;

        let stale = match self.shapes.first() {
            Some(Shape::Polygon(polygon)) => polygon.vertex_model().get(1) != Some(&top_right),
            _ => true,
        };
        if stale {
            self.shapes = vec![Shape::Polygon(Polygon::rectangle(self.width, self.height))];
        }

        if let Some(Shape::Polygon(polygon)) = self.shapes.first_mut() {
            polygon.rotation = self.rotation;
            polygon.update(position, transform.scale, transform.rotation);
        }
    }
}

/// Convex polygon collider. Vertices are in the entity's local space,
/// relative to the offset.
#[derive(Debug, Clone)]
pub struct PolygonCollider {
    pub vertices: Vec<Vec2>,
    pub rotation: f32,
    pub settings: ColliderSettings,
    shapes: Vec<Shape>,
}

impl PolygonCollider {
    pub fn new(vertices: Vec<Vec2>) -> Self {
        Self {
            vertices,
            rotation: 0.0,
            settings: ColliderSettings::default(),
            shapes: Vec::new(),
        }
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_settings(mut self, settings: ColliderSettings) -> Self {
        self.settings = settings;
        self
    }
}

impl Collider for PolygonCollider {
    fn kind(&self) -> ColliderKind {
        ColliderKind::Polygon
    }

    fn settings(&self) -> &ColliderSettings {
        &self.settings
    }

    fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    fn update_shapes(&mut self, transform: &GlobalTransform) {
        let position = shape_position(&self.settings, transform);
        match self.shapes.first_mut() {
            Some(Shape::Polygon(polygon)) => {
                if polygon.vertex_model() != self.vertices.as_slice() {
                    polygon.set_vertex_model(self.vertices.clone());
                }
            }
            _ => self.shapes = vec![Shape::Polygon(Polygon::new(self.vertices.clone()))],
        }

        if let Some(Shape::Polygon(polygon)) = self.shapes.first_mut() {
            polygon.rotation = self.rotation;
            polygon.update(position, transform.scale, transform.rotation);
        }
    }
}

/// Open polyline collider: one edge shape per consecutive vertex pair.
#[derive(Debug, Clone)]
pub struct EdgeCollider {
    pub vertices: Vec<Vec2>,
    pub rotation: f32,
    pub settings: ColliderSettings,
    shapes: Vec<Shape>,
}

impl EdgeCollider {
    pub fn new(vertices: Vec<Vec2>) -> Self {
        Self {
            vertices,
            rotation: 0.0,
            settings: ColliderSettings::default(),
            shapes: Vec::new(),
        }
    }

    pub fn with_settings(mut self, settings: ColliderSettings) -> Self {
        self.settings = settings;
        self
    }

    fn edges_match(&self) -> bool {
        self.shapes.len() == self.vertices.len().saturating_sub(1)
            && self
                .shapes
                .iter()
                .zip(self.vertices.windows(2))
                .all(|(shape, pair)| matches!(shape, Shape::Polygon(p) if p.vertex_model() == pair))
    }
}

impl Collider for EdgeCollider {
    fn kind(&self) -> ColliderKind {
        ColliderKind::Edge
    }

    fn settings(&self) -> &ColliderSettings {
        &self.settings
    }

    fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    fn update_shapes(&mut self, transform: &GlobalTransform) {
        if !self.edges_match() {
            self.shapes = self
                .vertices
                .windows(2)
                .map(|pair| Shape::Polygon(Polygon::edge(pair[0], pair[1])))
                .collect();
        }

        let position = shape_position(&self.settings, transform);
        for shape in &mut self.shapes {
            if let Shape::Polygon(polygon) = shape {
                polygon.rotation = self.rotation;
                polygon.update(position, transform.scale, transform.rotation);
            }
        }
    }
}

/// Collider built from the entity's [`Tilemap`].
///
/// Shapes are generated once; call [`clear_shapes`](Self::clear_shapes) after
/// editing the tiles to regenerate them.
#[derive(Debug, Clone)]
pub struct TilemapCollider {
    /// Merge exposed faces into edge runs instead of one box per tile.
    pub composite: bool,
    pub settings: ColliderSettings,
    shapes: Vec<Shape>,
}

impl TilemapCollider {
    pub fn new(composite: bool) -> Self {
        Self {
            composite,
            settings: ColliderSettings::default(),
            shapes: Vec::new(),
        }
    }

    pub fn with_settings(mut self, settings: ColliderSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn is_generated(&self) -> bool {
        !self.shapes.is_empty()
    }

    /// Generate shapes from `tilemap` unless they already exist.
    ///
    /// Empty tile data is skipped so a later tick can retry once the data is
    /// loaded.
    pub fn generate(&mut self, tilemap: &Tilemap) {
        if self.is_generated() {
            return;
        }
        if tilemap.is_empty() {
            tracing::debug!("tilemap has no tile data yet, skipping collider generation");
            return;
        }

        self.shapes = generate_shapes(tilemap, self.composite);
        tracing::debug!(
            shapes = self.shapes.len(),
            composite = self.composite,
            "generated tilemap collider"
        );
    }

    pub fn clear_shapes(&mut self) {
        self.shapes.clear();
    }
}

impl Collider for TilemapCollider {
    fn kind(&self) -> ColliderKind {
        ColliderKind::Tilemap
    }

    fn settings(&self) -> &ColliderSettings {
        &self.settings
    }

    fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    fn update_shapes(&mut self, transform: &GlobalTransform) {
        let position = shape_position(&self.settings, transform);
        for shape in &mut self.shapes {
            if let Shape::Polygon(polygon) = shape {
                polygon.update(position, transform.scale, transform.rotation);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const EPS: f32 = 1e-4;

    fn at(x: f32, y: f32) -> GlobalTransform {
        GlobalTransform {
            position: Vec2::new(x, y),
            ..GlobalTransform::default()
        }
    }

    #[test]
    fn test_ball_offset_is_rotated() {
        let mut ball = BallCollider::new(2.0)
            .with_settings(ColliderSettings::default().with_offset(Vec2::new(1.0, 0.0)));
        let transform = GlobalTransform {
            position: Vec2::new(10.0, 10.0),
            rotation: FRAC_PI_2,
            scale: Vec2::new(2.0, 1.0),
        };
        ball.update_shapes(&transform);

        let shape = &ball.shapes()[0];
        assert!((shape.position() - Vec2::new(10.0, 12.0)).length() < EPS);
        assert!((shape.radius() - 4.0).abs() < EPS);
        assert_eq!(ball.kind(), ColliderKind::Ball);
    }

    #[test]
    fn test_ball_radius_change_is_picked_up() {
        let mut ball = BallCollider::new(1.0);
        ball.update_shapes(&at(0.0, 0.0));
        ball.radius = 3.0;
        ball.update_shapes(&at(0.0, 0.0));
        assert_eq!(ball.shapes().len(), 1);
        assert!((ball.shapes()[0].radius() - 3.0).abs() < EPS);
    }

    #[test]
    fn test_box_resizes() {
        let mut collider = BoxCollider::new(2.0, 2.0);
        collider.update_shapes(&at(5.0, 0.0));
        let bb = collider.shapes()[0].bounding_box();
        assert!((bb.min - Vec2::new(4.0, -1.0)).length() < EPS);

        collider.width = 6.0;
        collider.update_shapes(&at(5.0, 0.0));
        let bb = collider.shapes()[0].bounding_box();
        assert!((bb.min - Vec2::new(2.0, -1.0)).length() < EPS);
        assert!((bb.max - Vec2::new(8.0, 1.0)).length() < EPS);
    }

    #[test]
    fn test_box_local_rotation() {
        let mut collider = BoxCollider::new(4.0, 2.0).with_rotation(FRAC_PI_2);
        collider.update_shapes(&at(0.0, 0.0));
        let bb = collider.shapes()[0].bounding_box();
        assert!((bb.max - Vec2::new(1.0, 2.0)).length() < EPS);
    }

    #[test]
    fn test_polygon_follows_vertices() {
        let mut collider = PolygonCollider::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 0.0),
        ]);
        collider.update_shapes(&at(1.0, 1.0));
        assert_eq!(collider.shapes()[0].vertices()[1], Vec2::new(1.0, 2.0));

        collider.vertices[1] = Vec2::new(0.0, 3.0);
        collider.update_shapes(&at(1.0, 1.0));
        assert_eq!(collider.shapes()[0].vertices()[1], Vec2::new(1.0, 4.0));
    }

    #[test]
    fn test_edge_collider_segments() {
        let mut collider = EdgeCollider::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
        ]);
        collider.update_shapes(&at(0.0, -5.0));
        assert_eq!(collider.shapes().len(), 2);
        assert_eq!(collider.shapes()[1].vertices()[1], Vec2::new(10.0, 5.0));

        collider.vertices.push(Vec2::new(0.0, 10.0));
        collider.update_shapes(&at(0.0, 0.0));
        assert_eq!(collider.shapes().len(), 3);

        collider.vertices.truncate(1);
        collider.update_shapes(&at(0.0, 0.0));
        assert!(collider.shapes().is_empty());
    }

    #[test]
    fn test_tilemap_generation_waits_for_data() {
        let mut collider = TilemapCollider::new(true);
        collider.generate(&Tilemap::default());
        assert!(!collider.is_generated());

        let tilemap = Tilemap::new(2, 1.0, 1.0, vec![1, 1]);
        collider.generate(&tilemap);
        assert_eq!(collider.shapes().len(), 4);

        // cached until cleared
        collider.generate(&Tilemap::new(1, 1.0, 1.0, vec![1]));
        assert_eq!(collider.shapes().len(), 4);
        collider.clear_shapes();
        collider.generate(&Tilemap::new(1, 1.0, 1.0, vec![1]));
        assert_eq!(collider.shapes().len(), 4);

        collider.update_shapes(&at(3.0, 3.0));
        let bb = collider.shapes()[0].bounding_box();
        assert_eq!(bb.min, Vec2::new(3.0, 3.0));
        assert_eq!(bb.max, Vec2::new(4.0, 3.0));
    }
}
