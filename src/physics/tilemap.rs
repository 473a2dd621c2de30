//! Collision shapes generated from a tile grid.
//!
//! Vertex models are expressed relative to the tilemap origin (the top-left
//! corner of tile `(0, 0)`), so the generated shapes are repositioned every
//! tick like any other collider shape but never regenerated.

use glam::Vec2;

use crate::ecs::components::Tilemap;

use super::shape::{Polygon, Shape};

/// Build the shapes for `tilemap`.
///
/// With `composite` set, exposed tile faces are merged into maximal edge runs.
/// Otherwise every solid tile with at least one exposed face becomes a box.
/// Tiles surrounded on all four sides produce nothing.
pub fn generate_shapes(tilemap: &Tilemap, composite: bool) -> Vec<Shape> {
    let mut shapes = if composite {
        composite_edges(tilemap)
    } else {
        tile_boxes(tilemap)
    };
    for shape in &mut shapes {
        if let Shape::Polygon(polygon) = shape {
            polygon.update_collisions = false;
        }
    }
    shapes
}

fn tile_boxes(tilemap: &Tilemap) -> Vec<Shape> {
    let (tw, th) = (tilemap.tile_width, tilemap.tile_height);
    let width = tilemap.width as isize;
    let height = tilemap.height() as isize;
    let mut shapes = Vec::new();

    for y in 0..height {
        for x in 0..width {
            if !tilemap.is_solid(x, y) {
                continue;
            }
            let exposed = !tilemap.is_solid(x - 1, y)
                || !tilemap.is_solid(x + 1, y)
                || !tilemap.is_solid(x, y - 1)
                || !tilemap.is_solid(x, y + 1);
            if !exposed {
                continue;
            }

            let left = x as f32 * tw;
            let top = -(y as f32) * th;
            shapes.push(Shape::Polygon(Polygon::new(vec![
                Vec2::new(left, top - th),
                Vec2::new(left, top),
                Vec2::new(left + tw, top),
                Vec2::new(left + tw, top - th),
            ])));
        }
    }

    shapes
}

fn composite_edges(tilemap: &Tilemap) -> Vec<Shape> {
    let (tw, th) = (tilemap.tile_width, tilemap.tile_height);
    let width = tilemap.width as isize;
    let height = tilemap.height() as isize;
    let solid = |x: isize, y: isize| tilemap.is_solid(x, y);
    let mut shapes = Vec::new();

    // row-wise: top and bottom faces
    for y in 0..height {
        let top = -(y as f32) * th;
        let bottom = top - th;

        for (start, end) in runs(width, |x| solid(x, y) && !solid(x, y - 1)) {
            shapes.push(edge(
                Vec2::new(start as f32 * tw, top),
                Vec2::new(end as f32 * tw, top),
            ));
        }
        for (start, end) in runs(width, |x| solid(x, y) && !solid(x, y + 1)) {
            shapes.push(edge(
                Vec2::new(start as f32 * tw, bottom),
                Vec2::new(end as f32 * tw, bottom),
            ));
        }
    }

    // column-wise: left and right faces
    for x in 0..width {
        let left = x as f32 * tw;
        let right = left + tw;

        for (start, end) in runs(height, |y| solid(x, y) && !solid(x - 1, y)) {
            shapes.push(edge(
                Vec2::new(left, -(start as f32) * th),
                Vec2::new(left, -(end as f32) * th),
            ));
        }
        for (start, end) in runs(height, |y| solid(x, y) && !solid(x + 1, y)) {
            shapes.push(edge(
                Vec2::new(right, -(start as f32) * th),
                Vec2::new(right, -(end as f32) * th),
            ));
        }
    }

    shapes
}

fn edge(a: Vec2, b: Vec2) -> Shape {
    Shape::Polygon(Polygon::edge(a, b))
}

/// Maximal `[start, end)` runs of consecutive indices in `0..len` for which
/// `exposed` holds.
fn runs(len: isize, exposed: impl Fn(isize) -> bool) -> Vec<(isize, isize)> {
    let mut runs = Vec::new();
    let mut start = None;
    for i in 0..=len {
        let open = i < len && exposed(i);
        match (open, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                runs.push((s, i));
                start = None;
            }
            _ => {}
        }
    }
    runs
}
