//! Grid types: terrain occupancy masks and stacked tile layers
//!
//! The live map is owned by the caller. Algorithms read it through two small
//! traits so any grid representation can be used:
//! - [`TerrainGrid`] - "is this cell part of the terrain?"
//! - [`TileStack`] - "which tile is on top of this cell?"

use crate::role::TileId;
use serde::{Deserialize, Serialize};

/// Read-only occupancy view of one terrain family
pub trait TerrainGrid {
    /// Whether the cell belongs to the terrain; out-of-range cells return false
    fn is_terrain(&self, x: i32, y: i32) -> bool;

    /// Grid size as (width, height), if the grid is bounded
    fn bounds(&self) -> Option<(u32, u32)> {
        None
    }
}

impl<F> TerrainGrid for F
where
    F: Fn(i32, i32) -> bool,
{
    fn is_terrain(&self, x: i32, y: i32) -> bool {
        self(x, y)
    }
}

/// Read-only view of the tiles placed on each cell
pub trait TileStack {
    fn in_bounds(&self, x: i32, y: i32) -> bool;

    /// The topmost non-empty tile on a cell
    fn topmost_tile(&self, x: i32, y: i32) -> Option<TileId>;
}

fn cell_index(width: u32, height: u32, x: i32, y: i32) -> Option<usize> {
    if x < 0 || y < 0 || x >= width as i32 || y >= height as i32 {
        return None;
    }
    Some(y as usize * width as usize + x as usize)
}

/// Boolean occupancy grid for one terrain family, row-major
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainMask {
    pub width: u32,
    pub height: u32,
    cells: Vec<bool>,
}

impl TerrainMask {
    /// Create an empty mask
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![false; width as usize * height as usize],
        }
    }

    /// Build a mask from text rows, `#` marks terrain and anything else is empty
    ///
    /// Rows shorter than the longest one are padded with empty cells.
    pub fn from_rows(rows: &[&str]) -> Self {
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as u32;
        let mut mask = Self::new(width, rows.len() as u32);
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                mask.set(x as i32, y as i32, c == '#');
            }
        }
        mask
    }

    pub fn get(&self, x: i32, y: i32) -> bool {
        cell_index(self.width, self.height, x, y)
            .map(|i| self.cells[i])
            .unwrap_or(false)
    }

    /// Set a cell; returns false if the cell is out of bounds
    pub fn set(&mut self, x: i32, y: i32, value: bool) -> bool {
        match cell_index(self.width, self.height, x, y) {
            Some(i) => {
                self.cells[i] = value;
                true
            }
            None => false,
        }
    }

    /// Number of terrain cells
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|c| **c).count()
    }

    /// Iterate over terrain cells in row-major order
    pub fn iter_filled(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let width = self.width.max(1) as usize;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| **c)
            .map(move |(i, _)| ((i % width) as i32, (i / width) as i32))
    }
}

impl TerrainGrid for TerrainMask {
    fn is_terrain(&self, x: i32, y: i32) -> bool {
        self.get(x, y)
    }

    fn bounds(&self) -> Option<(u32, u32)> {
        Some((self.width, self.height))
    }
}

/// A single layer of placed tiles, row-major
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileLayer {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub tiles: Vec<Option<TileId>>,
}

impl TileLayer {
    /// Create an empty layer
    pub fn new(name: String, width: u32, height: u32) -> Self {
        Self {
            name,
            width,
            height,
            tiles: vec![None; width as usize * height as usize],
        }
    }

    pub fn get(&self, x: i32, y: i32) -> Option<TileId> {
        cell_index(self.width, self.height, x, y).and_then(|i| self.tiles[i])
    }

    /// Place or clear a tile; returns false if the cell is out of bounds
    pub fn set(&mut self, x: i32, y: i32, tile: Option<TileId>) -> bool {
        match cell_index(self.width, self.height, x, y) {
            Some(i) => {
                self.tiles[i] = tile;
                true
            }
            None => false,
        }
    }

    /// Occupancy of the cells whose tile satisfies `predicate`
    pub fn mask_where<F>(&self, predicate: F) -> TerrainMask
    where
        F: Fn(TileId) -> bool,
    {
        let mut mask = TerrainMask::new(self.width, self.height);
        for (i, tile) in self.tiles.iter().enumerate() {
            mask.cells[i] = tile.map(&predicate).unwrap_or(false);
        }
        mask
    }
}

impl TileStack for TileLayer {
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        cell_index(self.width, self.height, x, y).is_some()
    }

    fn topmost_tile(&self, x: i32, y: i32) -> Option<TileId> {
        self.get(x, y)
    }
}

/// Layers of equal size, ordered bottom to top
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerStack {
    pub width: u32,
    pub height: u32,
    pub layers: Vec<TileLayer>,
}

impl LayerStack {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            layers: Vec::new(),
        }
    }

    /// Add an empty layer on top and return its index
    pub fn push_layer(&mut self, name: String) -> usize {
        self.layers.push(TileLayer::new(name, self.width, self.height));
        self.layers.len() - 1
    }

    pub fn layer(&self, index: usize) -> Option<&TileLayer> {
        self.layers.get(index)
    }

    pub fn layer_mut(&mut self, index: usize) -> Option<&mut TileLayer> {
        self.layers.get_mut(index)
    }

    /// Tiles under a cell from bottom to top, skipping empty layers
    pub fn tiles_under(&self, x: i32, y: i32) -> impl Iterator<Item = TileId> + '_ {
        self.layers.iter().filter_map(move |l| l.get(x, y))
    }
}

impl TileStack for LayerStack {
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        cell_index(self.width, self.height, x, y).is_some()
    }

    fn topmost_tile(&self, x: i32, y: i32) -> Option<TileId> {
        self.layers.iter().rev().find_map(|l| l.get(x, y))
    }
}

/// Axis-aligned rectangle in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The four corner pixels: top-left, bottom-left, top-right, bottom-right
    ///
    /// Corners are inclusive (`x + width - 1`), so a rect flush against a tile
    /// edge does not reach into the next tile. Pygame-style `bottomright`
    /// (`x + width`) samples one pixel further and would block a 32px sprite
    /// standing next to a wall.
    pub fn corners(&self) -> [(i32, i32); 4] {
        let right = self.x + self.width.saturating_sub(1) as i32;
        let bottom = self.y + self.height.saturating_sub(1) as i32;
        [
            (self.x, self.y),
            (self.x, bottom),
            (right, self.y),
            (right, bottom),
        ]
    }
}

/// Pixel size of one tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileMetrics {
    pub tile_width: u32,
    pub tile_height: u32,
}

impl Default for TileMetrics {
    fn default() -> Self {
        Self {
            tile_width: 32,
            tile_height: 32,
        }
    }
}

impl TileMetrics {
    pub fn new(tile_width: u32, tile_height: u32) -> Self {
        Self {
            tile_width,
            tile_height,
        }
    }

    /// Tile containing a pixel (floors toward negative infinity)
    pub fn px_to_tile(&self, px: i32, py: i32) -> (i32, i32) {
        (
            px.div_euclid(self.tile_width.max(1) as i32),
            py.div_euclid(self.tile_height.max(1) as i32),
        )
    }

    /// Tile containing a pixel, plus the pixel offset inside that tile
    pub fn px_to_tile_remainder(&self, px: i32, py: i32) -> ((i32, i32), (i32, i32)) {
        let w = self.tile_width.max(1) as i32;
        let h = self.tile_height.max(1) as i32;
        (
            (px.div_euclid(w), py.div_euclid(h)),
            (px.rem_euclid(w), py.rem_euclid(h)),
        )
    }

    /// Pixel position of a tile's top-left corner
    pub fn tile_to_px(&self, x: i32, y: i32) -> (i32, i32) {
        (x * self.tile_width as i32, y * self.tile_height as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terrain_mask_from_rows() {
        let mask = TerrainMask::from_rows(&[
            "##.", //
            ".#",
        ]);
        assert_eq!((mask.width, mask.height), (3, 2));
        assert!(mask.get(0, 0));
        assert!(mask.get(1, 1));
        assert!(!mask.get(2, 1));
        assert!(!mask.get(-1, 0));
        assert!(!mask.get(0, 5));
        assert_eq!(mask.count(), 3);
        assert_eq!(mask.iter_filled().collect::<Vec<_>>(), vec![(0, 0), (1, 0), (1, 1)]);
    }

    #[test]
    fn test_mask_set_out_of_bounds() {
        let mut mask = TerrainMask::new(2, 2);
        assert!(mask.set(1, 1, true));
        assert!(!mask.set(2, 0, true));
        assert!(!mask.set(0, -1, true));
        assert_eq!(mask.count(), 1);
    }

    #[test]
    fn test_closure_is_a_grid() {
        let diagonal = |x: i32, y: i32| x == y;
        assert!(diagonal.is_terrain(3, 3));
        assert!(!diagonal.is_terrain(3, 4));
        assert_eq!(diagonal.bounds(), None);
        assert_eq!(TerrainMask::new(4, 2).bounds(), Some((4, 2)));
    }

    #[test]
    fn test_layer_mask_where() {
        let mut layer = TileLayer::new("Ground".to_string(), 3, 1);
        layer.set(0, 0, Some(118));
        layer.set(1, 0, Some(294));
        let mask = layer.mask_where(|t| t == 118);
        assert!(mask.get(0, 0));
        assert!(!mask.get(1, 0));
        assert!(!mask.get(2, 0));
    }

    #[test]
    fn test_layer_stack_topmost() {
        let mut stack = LayerStack::new(2, 2);
        let ground = stack.push_layer("Ground".to_string());
        let objects = stack.push_layer("Objects".to_string());
        stack.layer_mut(ground).unwrap().set(0, 0, Some(1));
        stack.layer_mut(ground).unwrap().set(1, 0, Some(2));
        stack.layer_mut(objects).unwrap().set(1, 0, Some(3));

        assert_eq!(stack.topmost_tile(0, 0), Some(1));
        assert_eq!(stack.topmost_tile(1, 0), Some(3));
        assert_eq!(stack.topmost_tile(0, 1), None);
        assert_eq!(stack.tiles_under(1, 0).collect::<Vec<_>>(), vec![2, 3]);
        assert!(stack.in_bounds(1, 1));
        assert!(!stack.in_bounds(2, 0));
    }

    #[test]
    fn test_tile_metrics() {
        let metrics = TileMetrics::default();
        assert_eq!(metrics.px_to_tile(0, 0), (0, 0));
        assert_eq!(metrics.px_to_tile(31, 32), (0, 1));
        assert_eq!(metrics.px_to_tile(-1, 64), (-1, 2));
        assert_eq!(metrics.px_to_tile_remainder(70, 33), ((2, 1), (6, 1)));
        assert_eq!(metrics.tile_to_px(2, 3), (64, 96));
    }

    #[test]
    fn test_rect_corners() {
        let rect = PixelRect::new(10, 20, 32, 16);
        assert_eq!(rect.corners(), [(10, 20), (10, 35), (41, 20), (41, 35)]);

        // A tile-sized rect flush with the grid touches exactly one tile
        let metrics = TileMetrics::default();
        let rect = PixelRect::new(32, 64, 32, 32);
        for (px, py) in rect.corners() {
            assert_eq!(metrics.px_to_tile(px, py), (1, 2));
        }
    }
}
