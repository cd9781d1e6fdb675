//! Walkability index derived from a descriptor table

use crate::descriptor::DescriptorTable;
use crate::role::TileId;
use std::collections::HashSet;

/// Set of tiles that block movement
///
/// Tiles not present in the source table are walkable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkabilityIndex {
    blocked: HashSet<TileId>,
}

impl WalkabilityIndex {
    /// Build the index from every non-walkable descriptor in `table`
    pub fn from_table(table: &DescriptorTable) -> Self {
        let blocked = table
            .iter()
            .filter(|d| !d.walkable)
            .map(|d| d.id)
            .collect();
        Self { blocked }
    }

    /// Check if entities may stand on a tile
    pub fn is_walkable(&self, id: TileId) -> bool {
        !self.blocked.contains(&id)
    }

    /// Iterate over the blocking tile ids in arbitrary order
    pub fn blocked_ids(&self) -> impl Iterator<Item = TileId> + '_ {
        self.blocked.iter().copied()
    }

    pub fn blocked_count(&self) -> usize {
        self.blocked.len()
    }
}
