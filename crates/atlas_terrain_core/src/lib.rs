//! Core data structures for atlas_terrain
//!
//! This crate provides the load-time side of the terrain engine:
//! - `DescriptorTable` - Immutable tile id -> metadata table built from parser records
//! - `TerrainRole` - Parsed form of role names like `"grass minus SE 1"`
//! - `TerrainFamily` - Role tiles of one visual terrain, grouped by position
//! - `WalkabilityIndex` - O(1) "can entities stand on this tile?" lookup
//! - `TerrainAtlas` / `AtlasHandle` - Table + index bundle with atomic hot reload
//! - `TerrainMask`, `TileLayer`, `LayerStack` - Grids read through `TerrainGrid` / `TileStack`

mod atlas;
mod descriptor;
mod layer;
mod role;
mod walkability;

pub use atlas::{AtlasHandle, TerrainAtlas};
pub use descriptor::{
    records_from_json_slice, records_from_json_str, DescriptorRecord, DescriptorTable,
    TerrainFamily, TileDescriptor, TileVariant,
};
pub use layer::{
    LayerStack, PixelRect, TerrainGrid, TerrainMask, TileLayer, TileMetrics, TileStack,
};
pub use role::{
    parse_role_name, RoleNameError, TerrainPosition, TerrainRole, TileId, DEFAULT_VARIANT,
};
pub use walkability::WalkabilityIndex;

use thiserror::Error;

/// Errors that abort descriptor table construction
#[derive(Debug, Error)]
pub enum TableError {
    #[error("tile {id} is listed more than once")]
    DuplicateId { id: TileId },
    #[error("tile {id} has malformed role name '{name}': {reason}")]
    MalformedRole {
        id: TileId,
        name: String,
        reason: RoleNameError,
    },
    #[error("tile {id} role name '{name}' disagrees with explicit variant {variant}")]
    ConflictingVariant {
        id: TileId,
        name: String,
        variant: u32,
    },
    #[error(
        "terrain '{family}' has two tiles for {position} variant {variant}: {first} and {second}"
    )]
    DuplicateVariant {
        family: String,
        position: TerrainPosition,
        variant: u32,
        first: TileId,
        second: TileId,
    },
    #[error("Parse error: {0}")]
    Json(#[from] serde_json::Error),
}
