//! Neighbor bitmask -> terrain position table
//!
//! The table covers all 256 bitmasks and is computed at compile time. Clean
//! blob shapes map to the obvious position; irregular shapes fall back as
//! follows (after [`optimize_bitmask`]):
//!
//! | set orthogonals | result |
//! |---|---|
//! | 4, one diagonal clear | concave corner on that diagonal |
//! | 4, several diagonals clear | `Center` if 6+ bits set, else concave corner of the first clear diagonal (NE, SE, SW, NW) |
//! | 3, a filled-side diagonal set | edge facing the missing orthogonal |
//! | 3, no filled-side diagonal | convex corner of the missing orthogonal and the next one clockwise |
//! | 2, adjacent | convex corner between the two missing orthogonals |
//! | 2 opposite, 1 or 0 | `Spot` |

use crate::bitmask::{calculate_bitmask, neighbors::*, optimize_bitmask};
use crate::config::BorderHandling;
use atlas_terrain_core::{TerrainGrid, TerrainPosition};

const E_S: u8 = E | S;
const S_W: u8 = S | W;
const N_W: u8 = N | W;
const N_E: u8 = N | E;

/// Position for every possible neighbor bitmask
pub static ROLE_TABLE: [TerrainPosition; 256] = build_role_table();

const fn build_role_table() -> [TerrainPosition; 256] {
    let mut table = [TerrainPosition::Spot; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = classify_bitmask(i as u8);
        i += 1;
    }
    table
}

/// Look up the position for a neighbor bitmask
pub fn position_for_bitmask(bitmask: u8) -> TerrainPosition {
    ROLE_TABLE[bitmask as usize]
}

/// Derive the position for a neighbor bitmask; backs [`ROLE_TABLE`]
pub const fn classify_bitmask(raw: u8) -> TerrainPosition {
    let mask = optimize_bitmask(raw);

    if mask == 0xFF {
        return TerrainPosition::Center;
    }
    if mask == 0 {
        return TerrainPosition::Spot;
    }

    let orthogonal = mask & ORTHOGONAL;
    match orthogonal.count_ones() {
        4 => {
            let clear = DIAGONAL & !mask;
            if clear.count_ones() == 1 {
                concave_corner(clear)
            } else if mask.count_ones() >= 6 {
                TerrainPosition::Center
            } else {
                concave_corner(first_clear_diagonal(clear))
            }
        }
        3 => {
            let missing = ORTHOGONAL & !orthogonal;
            // (filled-side diagonals, edge, fallback corner)
            let (backing, edge, corner) = if missing == N {
                (SE | SW, TerrainPosition::EdgeN, TerrainPosition::CornerNE)
            } else if missing == E {
                (SW | NW, TerrainPosition::EdgeE, TerrainPosition::CornerSE)
            } else if missing == S {
                (NW | NE, TerrainPosition::EdgeS, TerrainPosition::CornerSW)
            } else {
                (NE | SE, TerrainPosition::EdgeW, TerrainPosition::CornerNW)
            };
            if mask & backing != 0 {
                edge
            } else {
                corner
            }
        }
        2 => match orthogonal {
            E_S => TerrainPosition::CornerNW,
            S_W => TerrainPosition::CornerNE,
            N_W => TerrainPosition::CornerSE,
            N_E => TerrainPosition::CornerSW,
            _ => TerrainPosition::Spot,
        },
        _ => TerrainPosition::Spot,
    }
}

const fn concave_corner(diagonal: u8) -> TerrainPosition {
    match diagonal {
        NE => TerrainPosition::ConcaveCornerNE,
        SE => TerrainPosition::ConcaveCornerSE,
        SW => TerrainPosition::ConcaveCornerSW,
        _ => TerrainPosition::ConcaveCornerNW,
    }
}

const fn first_clear_diagonal(clear: u8) -> u8 {
    let order = [NE, SE, SW, NW];
    let mut i = 0;
    while i < order.len() {
        if clear & order[i] != 0 {
            return order[i];
        }
        i += 1;
    }
    NW
}

/// Classify a cell of a terrain grid
///
/// Returns `None` if the cell itself is not terrain.
pub fn classify_cell<G>(
    grid: &G,
    x: i32,
    y: i32,
    border: BorderHandling,
) -> Option<TerrainPosition>
where
    G: TerrainGrid + ?Sized,
{
    if !grid.is_terrain(x, y) {
        return None;
    }
    Some(position_for_bitmask(calculate_bitmask(grid, x, y, border)))
}
