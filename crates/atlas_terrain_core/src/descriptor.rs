//! Tile descriptor table with per-family terrain lookup

use crate::role::{parse_role_name, TerrainPosition, TerrainRole, TileId};
use crate::TableError;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Metadata for one atlas tile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileDescriptor {
    pub id: TileId,
    /// Terrain role, if this tile takes part in autotiling
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<TerrainRole>,
    /// Whether entities may stand on this tile
    #[serde(default = "default_walkable")]
    pub walkable: bool,
}

fn default_walkable() -> bool {
    true
}

impl TileDescriptor {
    /// Descriptor for a tile with no metadata
    pub fn plain(id: TileId) -> Self {
        Self {
            id,
            role: None,
            walkable: true,
        }
    }

    /// Check if this descriptor carries nothing beyond the defaults
    pub fn is_plain(&self) -> bool {
        self.role.is_none() && self.walkable
    }
}

/// One raw entry produced by an external tileset parser
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptorRecord {
    pub id: TileId,
    /// Role name such as `"grass minus SE 1"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Explicit variant index, used when the name has no trailing number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<u32>,
    /// Set for tiles that block movement
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub nowalk: bool,
}

impl DescriptorRecord {
    pub fn new(id: TileId) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    /// Set the role name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set an explicit variant index
    pub fn with_variant(mut self, variant: u32) -> Self {
        self.variant = Some(variant);
        self
    }

    /// Mark the tile as blocking movement
    pub fn with_nowalk(mut self, nowalk: bool) -> Self {
        self.nowalk = nowalk;
        self
    }

    /// Validate this record into a descriptor
    pub fn into_descriptor(self) -> Result<TileDescriptor, TableError> {
        let role = match &self.name {
            Some(name) => {
                let mut role = parse_role_name(name).map_err(|reason| TableError::MalformedRole {
                    id: self.id,
                    name: name.clone(),
                    reason,
                })?;
                if let Some(variant) = self.variant {
                    if name_has_variant(name) && role.variant != variant {
                        return Err(TableError::ConflictingVariant {
                            id: self.id,
                            name: name.clone(),
                            variant,
                        });
                    }
                    role.variant = variant;
                }
                Some(role)
            }
            None => None,
        };

        Ok(TileDescriptor {
            id: self.id,
            role,
            walkable: !self.nowalk,
        })
    }
}

fn name_has_variant(name: &str) -> bool {
    name.split_whitespace()
        .last()
        .map(|t| t.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or(false)
}

/// Tileset properties are stringly typed, so accept `true`, `1` and `"1"` alike
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => Ok(false),
        serde_json::Value::Bool(b) => Ok(b),
        serde_json::Value::Number(n) => Ok(n.as_f64().map(|v| v != 0.0).unwrap_or(false)),
        serde_json::Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "" | "0" | "false" | "no" => Ok(false),
            "1" | "true" | "yes" => Ok(true),
            other => Err(D::Error::custom(format!("invalid flag value '{}'", other))),
        },
        other => Err(D::Error::custom(format!("invalid flag value {}", other))),
    }
}

/// Parse a JSON array of descriptor records
pub fn records_from_json_str(json: &str) -> Result<Vec<DescriptorRecord>, TableError> {
    Ok(serde_json::from_str(json)?)
}

/// Parse a JSON array of descriptor records from bytes
pub fn records_from_json_slice(bytes: &[u8]) -> Result<Vec<DescriptorRecord>, TableError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// A tile candidate for one terrain position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileVariant {
    pub variant: u32,
    pub id: TileId,
}

/// All role tiles of one visual terrain, grouped by position
///
/// Only [`DescriptorTable::from_records`] fills a family, so candidates stay
/// sorted and unique per (position, variant). Serialize-only for that reason.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TerrainFamily {
    pub name: String,
    /// Candidates per position, sorted by variant index
    tiles: HashMap<TerrainPosition, Vec<TileVariant>>,
}

impl TerrainFamily {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tiles: HashMap::new(),
        }
    }

    fn insert(&mut self, role: &TerrainRole, id: TileId) -> Result<(), TableError> {
        let candidates = self.tiles.entry(role.position).or_default();
        match candidates.binary_search_by_key(&role.variant, |c| c.variant) {
            Ok(existing) => Err(TableError::DuplicateVariant {
                family: self.name.clone(),
                position: role.position,
                variant: role.variant,
                first: candidates[existing].id,
                second: id,
            }),
            Err(slot) => {
                candidates.insert(
                    slot,
                    TileVariant {
                        variant: role.variant,
                        id,
                    },
                );
                Ok(())
            }
        }
    }

    /// Tiles usable for a position, ordered by variant index
    pub fn candidates(&self, position: TerrainPosition) -> &[TileVariant] {
        self.tiles.get(&position).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Check if at least one tile exists for a position
    pub fn has_position(&self, position: TerrainPosition) -> bool {
        !self.candidates(position).is_empty()
    }

    /// Find the tile for an exact position and variant
    pub fn tile(&self, position: TerrainPosition, variant: u32) -> Option<TileId> {
        self.candidates(position)
            .iter()
            .find(|c| c.variant == variant)
            .map(|c| c.id)
    }

    /// Positions with no tile at all, in [`TerrainPosition::ALL`] order
    pub fn missing_positions(&self) -> Vec<TerrainPosition> {
        TerrainPosition::ALL
            .into_iter()
            .filter(|p| !self.has_position(*p))
            .collect()
    }

    /// Check if every position has at least one tile
    pub fn is_complete(&self) -> bool {
        self.missing_positions().is_empty()
    }

    /// Total number of role tiles in this family
    pub fn tile_count(&self) -> usize {
        self.tiles.values().map(Vec::len).sum()
    }
}

/// Immutable table of tile descriptors, built once at load time
#[derive(Debug, Clone, Default)]
pub struct DescriptorTable {
    descriptors: HashMap<TileId, TileDescriptor>,
    families: HashMap<String, TerrainFamily>,
}

impl DescriptorTable {
    /// Build a table from parser records
    ///
    /// Fails on the first duplicate id, malformed role name or repeated
    /// (position, variant) within a family. No partial table is returned.
    pub fn from_records<I>(records: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = DescriptorRecord>,
    {
        let mut table = Self::default();

        for record in records {
            let descriptor = record.into_descriptor()?;
            let id = descriptor.id;

            let slot = match table.descriptors.entry(id) {
                Entry::Occupied(_) => return Err(TableError::DuplicateId { id }),
                Entry::Vacant(slot) => slot,
            };

            if let Some(role) = &descriptor.role {
                table
                    .families
                    .entry(role.family.clone())
                    .or_insert_with(|| TerrainFamily::new(role.family.clone()))
                    .insert(role, id)?;
            }

            slot.insert(descriptor);
        }

        log::debug!(
            "built descriptor table: {} tiles, {} terrain families",
            table.descriptors.len(),
            table.families.len()
        );

        Ok(table)
    }

    /// Build a table from a JSON array of records
    pub fn from_json_str(json: &str) -> Result<Self, TableError> {
        Self::from_records(records_from_json_str(json)?)
    }

    /// Descriptor for a tile, or the plain default if it was never listed
    pub fn lookup(&self, id: TileId) -> TileDescriptor {
        self.descriptors
            .get(&id)
            .cloned()
            .unwrap_or_else(|| TileDescriptor::plain(id))
    }

    /// Descriptor for a listed tile
    pub fn get(&self, id: TileId) -> Option<&TileDescriptor> {
        self.descriptors.get(&id)
    }

    pub fn contains(&self, id: TileId) -> bool {
        self.descriptors.contains_key(&id)
    }

    /// Number of listed tiles
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Iterate over all listed descriptors in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = &TileDescriptor> {
        self.descriptors.values()
    }

    /// Get a terrain family by name
    pub fn family(&self, name: &str) -> Option<&TerrainFamily> {
        self.families.get(name)
    }

    /// Iterate over all terrain families in arbitrary order
    pub fn families(&self) -> impl Iterator<Item = &TerrainFamily> {
        self.families.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RoleNameError;

    fn grass(id: TileId, name: &str) -> DescriptorRecord {
        DescriptorRecord::new(id).with_name(format!("grass {}", name))
    }

    #[test]
    fn test_lookup_listed_and_unlisted() {
        let records = vec![
            grass(117, "W 1"),
            grass(118, "center 1"),
            DescriptorRecord::new(294).with_nowalk(true),
            DescriptorRecord::new(500),
        ];
        let table = DescriptorTable::from_records(records).unwrap();

        assert_eq!(table.len(), 4);
        for id in [117, 118, 294, 500] {
            assert!(table.get(id).is_some());
        }

        let w = table.lookup(117);
        assert_eq!(w.role, Some(TerrainRole::new("grass", TerrainPosition::EdgeW, 1)));
        assert!(w.walkable);

        let rock = table.lookup(294);
        assert!(rock.role.is_none());
        assert!(!rock.walkable);

        let unknown = table.lookup(9999);
        assert!(unknown.is_plain());
        assert_eq!(unknown.id, 9999);
        assert!(table.get(9999).is_none());
        assert!(!table.contains(9999));
    }

    #[test]
    fn test_duplicate_id_is_rejected() {
        let err = DescriptorTable::from_records(vec![
            DescriptorRecord::new(7),
            DescriptorRecord::new(7).with_nowalk(true),
        ])
        .unwrap_err();
        assert!(matches!(err, TableError::DuplicateId { id: 7 }));

        let err =
            DescriptorTable::from_records(vec![grass(7, "center 1"), grass(7, "center 2")])
                .unwrap_err();
        assert!(matches!(err, TableError::DuplicateId { id: 7 }));

        let err = DescriptorTable::from_records(vec![
            DescriptorRecord::new(3),
            DescriptorRecord::new(3),
            DescriptorRecord::new(3),
        ])
        .unwrap_err();
        assert!(matches!(err, TableError::DuplicateId { id: 3 }));
    }

    #[test]
    fn test_malformed_role_names_the_offender() {
        let err = DescriptorTable::from_records(vec![grass(1, "center 1"), grass(2, "sideways 1")])
            .unwrap_err();
        match err {
            TableError::MalformedRole { id, name, reason } => {
                assert_eq!(id, 2);
                assert_eq!(name, "grass sideways 1");
                assert_eq!(reason, RoleNameError::UnknownPosition("sideways".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_variant_within_family() {
        let err = DescriptorTable::from_records(vec![grass(21, "spot 1"), grass(53, "spot 1")])
            .unwrap_err();
        assert!(matches!(
            err,
            TableError::DuplicateVariant {
                position: TerrainPosition::Spot,
                variant: 1,
                first: 21,
                second: 53,
                ..
            }
        ));

        // Same position and variant in different families is fine
        let table = DescriptorTable::from_records(vec![
            grass(21, "spot 1"),
            DescriptorRecord::new(40).with_name("sand spot 1"),
        ])
        .unwrap();
        assert_eq!(table.families().count(), 2);
    }

    #[test]
    fn test_explicit_variant() {
        let table = DescriptorTable::from_records(vec![
            DescriptorRecord::new(1).with_name("grass spot").with_variant(4),
            DescriptorRecord::new(2).with_name("grass spot 2").with_variant(2),
        ])
        .unwrap();
        let family = table.family("grass").unwrap();
        assert_eq!(family.tile(TerrainPosition::Spot, 4), Some(1));
        assert_eq!(family.tile(TerrainPosition::Spot, 2), Some(2));

        let err = DescriptorTable::from_records(vec![DescriptorRecord::new(1)
            .with_name("grass spot 1")
            .with_variant(3)])
        .unwrap_err();
        assert!(matches!(err, TableError::ConflictingVariant { id: 1, variant: 3, .. }));
    }

    #[test]
    fn test_family_candidates_sorted_by_variant() {
        let table = DescriptorTable::from_records(vec![
            grass(215, "minus SW 3"),
            grass(23, "minus SW 1"),
            grass(214, "minus SW 2"),
        ])
        .unwrap();
        let family = table.family("grass").unwrap();
        let ids: Vec<TileId> = family
            .candidates(TerrainPosition::ConcaveCornerSW)
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![23, 214, 215]);
        assert_eq!(family.tile_count(), 3);
        assert!(family.candidates(TerrainPosition::Center).is_empty());
    }

    #[test]
    fn test_family_serializes_sorted_candidates() {
        let table = DescriptorTable::from_records(vec![
            grass(215, "minus SW 3"),
            grass(23, "minus SW 1"),
            grass(214, "minus SW 2"),
        ])
        .unwrap();
        let json = serde_json::to_value(table.family("grass").unwrap()).unwrap();
        let ids: Vec<u64> = json["tiles"]["ConcaveCornerSW"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["id"].as_u64().unwrap())
            .collect();
        assert_eq!(ids, vec![23, 214, 215]);
    }

    #[test]
    fn test_missing_positions() {
        let table =
            DescriptorTable::from_records(vec![grass(118, "center 1"), grass(21, "spot 1")])
                .unwrap();
        let family = table.family("grass").unwrap();
        let missing = family.missing_positions();
        assert_eq!(missing.len(), 12);
        assert!(!missing.contains(&TerrainPosition::Center));
        assert!(!missing.contains(&TerrainPosition::Spot));
        assert!(!family.is_complete());
    }

    #[test]
    fn test_records_from_json() {
        let json = r#"[
            { "id": 21, "name": "grass spot 1" },
            { "id": 294, "nowalk": "1" },
            { "id": 295, "nowalk": 1 },
            { "id": 296, "nowalk": true },
            { "id": 297, "nowalk": "0" }
        ]"#;
        let table = DescriptorTable::from_json_str(json).unwrap();
        assert_eq!(table.len(), 5);
        assert!(!table.lookup(294).walkable);
        assert!(!table.lookup(295).walkable);
        assert!(!table.lookup(296).walkable);
        assert!(table.lookup(297).walkable);
        assert!(table.lookup(21).walkable);

        let err = records_from_json_str(r#"[{ "id": 1, "nowalk": "maybe" }]"#).unwrap_err();
        assert!(matches!(err, TableError::Json(_)));
    }
}
