//! Blob autotiling for atlas_terrain
//!
//! Given a boolean terrain grid and a terrain family from a
//! [`DescriptorTable`](atlas_terrain_core::DescriptorTable), this crate picks the
//! tile to draw on every cell and answers walkability queries for tile layers.
//!
//! # Features
//! - 8-neighbor bitmask with corner optimization
//! - Precomputed 256-entry bitmask -> position table
//! - Deterministic per-cell variant selection
//! - Configurable fallback for families missing a position
//!
//! # Example
//!
//! ```rust,ignore
//! use atlas_terrain_autotile::{AutotileConfig, AutotileEngine};
//! use atlas_terrain_core::{TerrainAtlas, TerrainMask};
//!
//! let atlas = TerrainAtlas::from_records(records)?;
//! let config = AutotileConfig::default();
//! let engine = AutotileEngine::new(&atlas, &config);
//!
//! let mask = TerrainMask::from_rows(&[
//!     ".###.",
//!     ".###.",
//! ]);
//! let tile = engine.render_tile("grass", &mask, 2, 0)?; // grass N
//! let region = engine.render_region("grass", &mask, 5, 2)?;
//! ```

pub mod bitmask;
pub mod classify;
pub mod config;
pub mod engine;
pub mod variant;

pub use atlas_terrain_core;

// Re-export main types at crate root
pub use bitmask::{calculate_bitmask, neighbor_bitmask, neighbors, optimize_bitmask};
pub use classify::{classify_bitmask, classify_cell, position_for_bitmask, ROLE_TABLE};
pub use config::{AutotileConfig, BorderHandling, FallbackPolicy, VariantSelection};
pub use engine::{AutotileEngine, CellFailure, RegionRender};
pub use variant::pick_variant;

use atlas_terrain_core::TerrainPosition;
use thiserror::Error;

/// Errors raised while resolving tiles
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AutotileError {
    #[error("unknown terrain family '{family}'")]
    UnknownFamily { family: String },
    #[error("terrain '{family}' has no tile for {position}")]
    UnresolvedRole {
        family: String,
        position: TerrainPosition,
    },
}
