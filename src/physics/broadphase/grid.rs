//! Uniform spatial grid over bounding boxes.

use std::collections::HashSet;

use glam::Vec2;

use crate::error::PhysicsError;
use crate::math::Rect;
use crate::physics::shape::ShapeId;

use super::{total_area, BroadPhase};

/// Shapes per row/column of cells the grid aims for.
const SHAPES_PER_SUBDIVISION: usize = 16;

/// Uniform grid broad phase.
///
/// The grid covers the union of all boxes and has
/// `ceil(n / 16)` cells per axis. Cells store indices into `entries`.
#[derive(Debug, Default)]
pub struct SpatialGrid {
    origin: Vec2,
    cell_size: Vec2,
    subdivisions: usize,
    cells: Vec<Vec<usize>>,
    entries: Vec<(ShapeId, Rect)>,
    built: bool,
}

impl SpatialGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cells per axis of the current grid.
    pub fn subdivisions(&self) -> usize {
        self.subdivisions
    }

    pub fn cell_size(&self) -> Vec2 {
        self.cell_size
    }

    /// Clamped cell coordinate of `value` along one axis.
    #[inline]
    fn cell_coord(&self, value: f32, origin: f32, size: f32) -> usize {
        let last = self.subdivisions.saturating_sub(1);
        let cell = ((value - origin) / size).floor().max(0.0) as usize;
        cell.min(last)
    }

    /// Inclusive cell ranges `(x0, x1, y0, y1)` a box overlaps.
    fn cell_range(&self, rect: &Rect) -> (usize, usize, usize, usize) {
        (
            self.cell_coord(rect.min.x, self.origin.x, self.cell_size.x),
            self.cell_coord(rect.max.x, self.origin.x, self.cell_size.x),
            self.cell_coord(rect.min.y, self.origin.y, self.cell_size.y),
            self.cell_coord(rect.max.y, self.origin.y, self.cell_size.y),
        )
    }
}

impl BroadPhase for SpatialGrid {
    fn update(&mut self, entries: &[(ShapeId, Rect)]) {
        self.built = true;
        self.entries.clear();
        self.entries.extend_from_slice(entries);
        self.cells.iter_mut().for_each(Vec::clear);

        let Some(area) = total_area(&self.entries) else {
            self.subdivisions = 0;
            self.cells.clear();
            return;
        };

        let subdivisions = self.entries.len().div_ceil(SHAPES_PER_SUBDIVISION).max(1);
        self.origin = area.min;
        self.subdivisions = subdivisions;
        self.cell_size = Vec2::new(
            (area.width() / subdivisions as f32).ceil().max(1.0),
            (area.height() / subdivisions as f32).ceil().max(1.0),
        );
        self.cells.resize_with(subdivisions * subdivisions, Vec::new);
        self.cells.truncate(subdivisions * subdivisions);

        for index in 0..self.entries.len() {
            let (x0, x1, y0, y1) = self.cell_range(&self.entries[index].1);
            for y in y0..=y1 {
                for x in x0..=x1 {
                    self.cells[y * subdivisions + x].push(index);
                }
            }
        }
    }

    fn retrieve(&self, area: &Rect) -> Result<Vec<ShapeId>, PhysicsError> {
        if !self.built {
            return Err(PhysicsError::BroadPhaseNotBuilt);
        }
        if self.subdivisions == 0 {
            return Ok(Vec::new());
        }

        let (x0, x1, y0, y1) = self.cell_range(area);
        let mut seen = HashSet::new();
        let mut found = Vec::new();

        for y in y0..=y1 {
            for x in x0..=x1 {
                for &index in &self.cells[y * self.subdivisions + x] {
                    // sharing a cell does not mean the boxes overlap
                    if seen.insert(index) && self.entries[index].1.intersects(area) {
                        found.push(self.entries[index].0);
                    }
                }
            }
        }

        Ok(found)
    }
}
