//! Broadphase collision detection.
//!
//! Both structures are rebuilt from scratch every physics tick from the
//! bounding boxes of all shapes, then queried once per active shape.
//! `retrieve` may over-report but never misses an intersecting box.

mod grid;
mod quadtree;

pub use grid::SpatialGrid;
pub use quadtree::QuadTree;

use crate::error::PhysicsError;
use crate::math::Rect;

use super::shape::ShapeId;

/// Selectable broad-phase structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BroadPhaseMethod {
    #[default]
    QuadTree,
    SpatialGrid,
}

/// Spatial index over shape bounding boxes.
pub trait BroadPhase: Send + Sync {
    /// Clear previous state and index every `(id, bounding box)` entry.
    fn update(&mut self, entries: &[(ShapeId, Rect)]);

    /// Ids of every indexed box intersecting `area`, without duplicates.
    fn retrieve(&self, area: &Rect) -> Result<Vec<ShapeId>, PhysicsError>;
}

/// Build the broad phase for a configured method.
pub fn broad_phase_for(method: BroadPhaseMethod) -> Box<dyn BroadPhase> {
    match method {
        BroadPhaseMethod::QuadTree => Box::new(QuadTree::new()),
        BroadPhaseMethod::SpatialGrid => Box::new(SpatialGrid::new()),
    }
}

/// Union of all entry boxes. `None` when there are no entries.
fn total_area(entries: &[(ShapeId, Rect)]) -> Option<Rect> {
    let (_, first) = entries.first()?;
    Some(
        entries[1..]
            .iter()
            .fold(*first, |area, (_, rect)| area.union(rect)),
    )
}
