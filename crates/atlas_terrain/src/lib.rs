//! Terrain atlas engine
//!
//! Re-exports the descriptor table ([`atlas_terrain_core`]) and the autotile
//! engine ([`atlas_terrain_autotile`]). Most users only need the [`prelude`].

pub use atlas_terrain_autotile;
pub use atlas_terrain_core;

pub mod prelude {
    pub use atlas_terrain_autotile::{
        AutotileConfig, AutotileEngine, AutotileError, BorderHandling, FallbackPolicy,
        RegionRender, VariantSelection,
    };
    pub use atlas_terrain_core::{
        AtlasHandle, DescriptorRecord, DescriptorTable, LayerStack, PixelRect, TableError,
        TerrainAtlas, TerrainMask, TerrainPosition, TileId, TileLayer, TileMetrics,
    };
}
