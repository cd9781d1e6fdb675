//! Deterministic per-cell variant selection

use crate::config::VariantSelection;
use atlas_terrain_core::{TileId, TileVariant};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Pick one tile among `candidates` for the cell at `(x, y)`
///
/// The same cell, candidates and selection always produce the same tile.
/// Returns `None` only when `candidates` is empty.
///
/// `Hashed` picks come from [`SmallRng`], whose output `rand` does not keep
/// stable across platforms or `rand` versions. Cached renders are only valid
/// for the build that made them; use [`VariantSelection::First`] when picks
/// must match across targets.
pub fn pick_variant(
    candidates: &[TileVariant],
    x: i32,
    y: i32,
    selection: VariantSelection,
) -> Option<TileId> {
    match candidates {
        [] => None,
        [only] => Some(only.id),
        _ => {
            let index = match selection {
                VariantSelection::First => 0,
                VariantSelection::Hashed { seed } => {
                    cell_rng(x, y, seed).gen_range(0..candidates.len())
                }
            };
            Some(candidates[index].id)
        }
    }
}

/// Small RNG seeded from a cell coordinate and a global seed
fn cell_rng(x: i32, y: i32, seed: u64) -> SmallRng {
    let key = ((x as u32 as u64) << 32) | (y as u32 as u64);
    SmallRng::seed_from_u64(key ^ seed.rotate_left(29))
}
