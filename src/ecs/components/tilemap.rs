//! Tile grid component.

/// Row-major tile grid. Tile `0` is empty, anything else is solid.
///
/// Row 0 is the top row; rows grow towards -y and columns towards +x from the
/// entity position, which is the top-left corner of tile `(0, 0)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tilemap {
    /// Tiles per row.
    pub width: usize,
    pub tile_width: f32,
    pub tile_height: f32,
    pub tiles: Vec<u32>,
}

impl Tilemap {
    pub fn new(width: usize, tile_width: f32, tile_height: f32, tiles: Vec<u32>) -> Self {
        Self {
            width,
            tile_width,
            tile_height,
            tiles,
        }
    }

    /// Number of rows, counting a trailing partial row.
    pub fn height(&self) -> usize {
        if self.width == 0 {
            0
        } else {
            self.tiles.len().div_ceil(self.width)
        }
    }

    /// Tile at column `x`, row `y`. `None` outside the grid.
    pub fn tile(&self, x: isize, y: isize) -> Option<u32> {
        if x < 0 || y < 0 || x as usize >= self.width {
            return None;
        }
        self.tiles.get(y as usize * self.width + x as usize).copied()
    }

    /// Whether the tile at `(x, y)` is solid. Cells outside the grid are
    /// empty.
    pub fn is_solid(&self, x: isize, y: isize) -> bool {
        self.tile(x, y).is_some_and(|t| t != 0)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.tiles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_lookup() {
        let map = Tilemap::new(3, 1.0, 1.0, vec![1, 0, 2, 0, 3]);
        assert_eq!(map.height(), 2);
        assert_eq!(map.tile(2, 0), Some(2));
        assert_eq!(map.tile(1, 1), Some(3));
        assert_eq!(map.tile(2, 1), None);
        assert_eq!(map.tile(3, 0), None);
        assert_eq!(map.tile(-1, 0), None);
        assert!(map.is_solid(0, 0));
        assert!(!map.is_solid(1, 0));
        assert!(!map.is_solid(0, 5));
    }

    #[test]
    fn test_empty() {
        assert!(Tilemap::default().is_empty());
        assert_eq!(Tilemap::default().height(), 0);
        assert!(Tilemap::new(4, 1.0, 1.0, Vec::new()).is_empty());
    }
}
