//! 8-neighbor bitmask calculation
//!
//! Bit order is fixed: N, NE, E, SE, S, SW, W, NW from bit 0 to bit 7.
//! Y grows downward, so north is `y - 1`.

use crate::config::BorderHandling;
use atlas_terrain_core::TerrainGrid;

/// One flag per neighbor, bit index equals position in [`NEIGHBOR_OFFSETS`]
pub mod neighbors {
    pub const N: u8 = 1 << 0;
    pub const NE: u8 = 1 << 1;
    pub const E: u8 = 1 << 2;
    pub const SE: u8 = 1 << 3;
    pub const S: u8 = 1 << 4;
    pub const SW: u8 = 1 << 5;
    pub const W: u8 = 1 << 6;
    pub const NW: u8 = 1 << 7;

    pub const ORTHOGONAL: u8 = N | E | S | W;
    pub const DIAGONAL: u8 = NE | SE | SW | NW;
}

/// Offsets for each bit, in bit order
pub const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

/// Each diagonal with the two orthogonals that must both be set to keep it
const DIAGONAL_SUPPORT: [(u8, u8); 4] = {
    use neighbors::*;
    [(NE, N | E), (SE, S | E), (SW, S | W), (NW, N | W)]
};

/// Clear diagonal bits that are not backed by both adjacent orthogonals
///
/// A diagonal neighbor only changes the picture when it closes a corner.
pub const fn optimize_bitmask(bitmask: u8) -> u8 {
    let mut result = bitmask;
    let mut i = 0;
    while i < DIAGONAL_SUPPORT.len() {
        let (diagonal, support) = DIAGONAL_SUPPORT[i];
        if bitmask & support != support {
            result &= !diagonal;
        }
        i += 1;
    }
    result
}

/// Raw neighbor bitmask for a cell, before corner optimization
///
/// When the grid reports [`TerrainGrid::bounds`], neighbors outside it are
/// resolved by `border` instead of asking the grid.
pub fn neighbor_bitmask<G>(grid: &G, x: i32, y: i32, border: BorderHandling) -> u8
where
    G: TerrainGrid + ?Sized,
{
    let bounds = grid.bounds();
    let mut bitmask = 0u8;

    for (bit, (dx, dy)) in NEIGHBOR_OFFSETS.iter().enumerate() {
        // A neighbor past the i32 range is outside any grid
        let neighbor = x.checked_add(*dx).zip(y.checked_add(*dy));
        let filled = match (neighbor, bounds) {
            (Some((nx, ny)), Some((width, height)))
                if nx >= 0 && ny >= 0 && nx < width as i32 && ny < height as i32 =>
            {
                grid.is_terrain(nx, ny)
            }
            (Some((nx, ny)), None) => grid.is_terrain(nx, ny),
            _ => border == BorderHandling::Terrain,
        };

        if filled {
            bitmask |= 1 << bit;
        }
    }

    bitmask
}

/// Optimized neighbor bitmask for a cell
pub fn calculate_bitmask<G>(grid: &G, x: i32, y: i32, border: BorderHandling) -> u8
where
    G: TerrainGrid + ?Sized,
{
    optimize_bitmask(neighbor_bitmask(grid, x, y, border))
}
