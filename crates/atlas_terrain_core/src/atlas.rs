//! A descriptor table bundled with its derived walkability index
//!
//! [`TerrainAtlas`] is the process-scoped value handed to every consumer.
//! [`AtlasHandle`] supports hot reload: a replacement table gets a fresh
//! index and the pair is swapped in one step, so readers never see a table
//! and an index from different loads.

use crate::descriptor::{DescriptorRecord, DescriptorTable};
use crate::walkability::WalkabilityIndex;
use crate::TableError;
use std::sync::{Arc, PoisonError, RwLock};
use uuid::Uuid;

/// Immutable table plus the views derived from it
#[derive(Debug, Clone)]
pub struct TerrainAtlas {
    /// Identifies this particular load, changes on every reload
    pub id: Uuid,
    table: DescriptorTable,
    walkability: WalkabilityIndex,
}

impl TerrainAtlas {
    pub fn new(table: DescriptorTable) -> Self {
        let walkability = WalkabilityIndex::from_table(&table);
        Self {
            id: Uuid::new_v4(),
            table,
            walkability,
        }
    }

    /// Build directly from parser records
    pub fn from_records<I>(records: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = DescriptorRecord>,
    {
        Ok(Self::new(DescriptorTable::from_records(records)?))
    }

    pub fn table(&self) -> &DescriptorTable {
        &self.table
    }

    pub fn walkability(&self) -> &WalkabilityIndex {
        &self.walkability
    }
}

/// Shared, swappable reference to the current atlas
#[derive(Debug, Clone)]
pub struct AtlasHandle {
    current: Arc<RwLock<Arc<TerrainAtlas>>>,
}

impl AtlasHandle {
    pub fn new(atlas: TerrainAtlas) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(atlas))),
        }
    }

    /// The atlas in effect right now; stays valid across later reloads
    pub fn snapshot(&self) -> Arc<TerrainAtlas> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Replace the table, rebuilding the walkability index alongside it
    ///
    /// Returns the previous atlas.
    pub fn replace(&self, table: DescriptorTable) -> Arc<TerrainAtlas> {
        let next = Arc::new(TerrainAtlas::new(table));
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        log::debug!("replacing terrain atlas {} with {}", guard.id, next.id);
        std::mem::replace(&mut *guard, next)
    }

    /// Rebuild from records; on failure the current atlas stays in place
    pub fn reload<I>(&self, records: I) -> Result<Arc<TerrainAtlas>, TableError>
    where
        I: IntoIterator<Item = DescriptorRecord>,
    {
        let table = DescriptorTable::from_records(records)?;
        Ok(self.replace(table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atlas_builds_index() {
        let atlas = TerrainAtlas::from_records(vec![
            DescriptorRecord::new(118).with_name("grass center 1"),
            DescriptorRecord::new(294).with_nowalk(true),
        ])
        .unwrap();
        assert_eq!(atlas.table().len(), 2);
        assert!(!atlas.walkability().is_walkable(294));
        assert!(atlas.walkability().is_walkable(118));
    }

    #[test]
    fn test_replace_swaps_table_and_index_together() {
        let handle = AtlasHandle::new(
            TerrainAtlas::from_records(vec![DescriptorRecord::new(294).with_nowalk(true)]).unwrap(),
        );
        let before = handle.snapshot();

        let previous = handle
            .reload(vec![DescriptorRecord::new(295).with_nowalk(true)])
            .unwrap();
        assert_eq!(previous.id, before.id);

        let after = handle.snapshot();
        assert_ne!(after.id, before.id);
        assert!(after.walkability().is_walkable(294));
        assert!(!after.walkability().is_walkable(295));
        assert!(after.table().contains(295));
        assert!(!after.table().contains(294));

        // Old snapshots keep their own consistent view
        assert!(!before.walkability().is_walkable(294));
        assert!(before.table().contains(294));
    }

    #[test]
    fn test_failed_reload_keeps_current_atlas() {
        let handle = AtlasHandle::new(
            TerrainAtlas::from_records(vec![DescriptorRecord::new(1)]).unwrap(),
        );
        let id = handle.snapshot().id;

        let result = handle.reload(vec![DescriptorRecord::new(2), DescriptorRecord::new(2)]);
        assert!(matches!(result, Err(TableError::DuplicateId { id: 2 })));
        assert_eq!(handle.snapshot().id, id);
    }

    #[test]
    fn test_handle_is_shareable_across_threads() {
        let handle = AtlasHandle::new(
            TerrainAtlas::from_records(vec![DescriptorRecord::new(294).with_nowalk(true)]).unwrap(),
        );

        std::thread::scope(|s| {
            for _ in 0..4 {
                let handle = handle.clone();
                s.spawn(move || {
                    let atlas = handle.snapshot();
                    assert_eq!(
                        atlas.table().contains(294),
                        !atlas.walkability().is_walkable(294)
                    );
                });
            }
            handle.replace(DescriptorTable::default());
        });

        assert!(handle.snapshot().table().is_empty());
    }
}
