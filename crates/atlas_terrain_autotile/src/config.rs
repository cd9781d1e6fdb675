//! Autotile engine configuration

use atlas_terrain_core::TileId;
use serde::{Deserialize, Serialize};

/// Configuration for an [`AutotileEngine`](crate::AutotileEngine)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutotileConfig {
    /// How to choose among tiles that share a position
    #[serde(default)]
    pub variant_selection: VariantSelection,
    /// What to draw when a family lacks the tile for a position
    #[serde(default)]
    pub fallback: FallbackPolicy,
    /// How cells outside the grid count when computing neighbors
    #[serde(default)]
    pub border: BorderHandling,
}

impl AutotileConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_variant_selection(mut self, variant_selection: VariantSelection) -> Self {
        self.variant_selection = variant_selection;
        self
    }

    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_border(mut self, border: BorderHandling) -> Self {
        self.border = border;
        self
    }
}

/// Rule for picking one tile among several variants of a position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VariantSelection {
    /// Always the lowest variant index
    First,
    /// Scatter variants by cell coordinates; stable for a given seed
    Hashed { seed: u64 },
}

impl Default for VariantSelection {
    fn default() -> Self {
        VariantSelection::Hashed { seed: 0 }
    }
}

/// Substitution used when a family has no tile for a resolved position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FallbackPolicy {
    /// Report the failure to the caller
    #[default]
    None,
    /// Draw the family's center tile instead
    FamilyCenter,
    /// Draw a fixed tile instead
    Tile(TileId),
}

/// How out-of-bounds neighbors are treated when a grid size is known
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BorderHandling {
    /// Outside cells are empty, so blobs get edges along the map border
    #[default]
    Empty,
    /// Outside cells are terrain, so blobs continue past the map border
    Terrain,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AutotileConfig::default();
        assert_eq!(config.variant_selection, VariantSelection::Hashed { seed: 0 });
        assert_eq!(config.fallback, FallbackPolicy::None);
        assert_eq!(config.border, BorderHandling::Empty);
    }

    #[test]
    fn test_parse_partial_config() {
        let config = AutotileConfig::from_json_str(r#"{ "fallback": "FamilyCenter" }"#).unwrap();
        assert_eq!(config.fallback, FallbackPolicy::FamilyCenter);
        assert_eq!(config.border, BorderHandling::Empty);

        let config = AutotileConfig::from_json_str(
            r#"{
                "variant_selection": { "Hashed": { "seed": 7 } },
                "fallback": { "Tile": 118 },
                "border": "Terrain"
            }"#,
        )
        .unwrap();
        assert_eq!(config.variant_selection, VariantSelection::Hashed { seed: 7 });
        assert_eq!(config.fallback, FallbackPolicy::Tile(118));
        assert_eq!(config.border, BorderHandling::Terrain);
    }

    #[test]
    fn test_config_serialization() {
        let config = AutotileConfig::new()
            .with_variant_selection(VariantSelection::First)
            .with_fallback(FallbackPolicy::Tile(5))
            .with_border(BorderHandling::Terrain);
        let json = serde_json::to_string(&config).unwrap();
        let parsed = AutotileConfig::from_json_str(&json).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_rejects_unknown_policy() {
        assert!(AutotileConfig::from_json_str(r#"{ "fallback": "Whatever" }"#).is_err());
    }
}
