//! Terrain roles and the role-name grammar
//!
//! Tileset descriptors name their terrain tiles with short strings such as
//! `"grass NW 1"` or `"grass minus SE 2"`. This module turns those strings into
//! a structured [`TerrainRole`] so the rest of the crate never touches text.
//!
//! Grammar: `<family> [minus] <position> [<variant>]`
//! - `position` is one of `N S E W NE NW SE SW center spot` (case-insensitive)
//! - `minus` is only valid before a diagonal and selects the concave corner
//! - `variant` defaults to 1

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Index of a tile inside the atlas image
pub type TileId = u32;

/// Variant index used when no trailing number is given
pub const DEFAULT_VARIANT: u32 = 1;

/// Where a tile sits within a contiguous terrain blob
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TerrainPosition {
    /// Fully surrounded interior
    Center,
    /// Top edge - the blob is open to the north
    EdgeN,
    EdgeS,
    EdgeE,
    EdgeW,
    /// Outward corner - the blob is open to the north and east
    CornerNE,
    CornerNW,
    CornerSE,
    CornerSW,
    /// Inward notch - only the north-east diagonal is missing
    ConcaveCornerNE,
    ConcaveCornerNW,
    ConcaveCornerSE,
    ConcaveCornerSW,
    /// Isolated or irregular cell
    Spot,
}

impl TerrainPosition {
    /// Every position, in declaration order
    pub const ALL: [TerrainPosition; 14] = [
        TerrainPosition::Center,
        TerrainPosition::EdgeN,
        TerrainPosition::EdgeS,
        TerrainPosition::EdgeE,
        TerrainPosition::EdgeW,
        TerrainPosition::CornerNE,
        TerrainPosition::CornerNW,
        TerrainPosition::CornerSE,
        TerrainPosition::CornerSW,
        TerrainPosition::ConcaveCornerNE,
        TerrainPosition::ConcaveCornerNW,
        TerrainPosition::ConcaveCornerSE,
        TerrainPosition::ConcaveCornerSW,
        TerrainPosition::Spot,
    ];

    /// Check if this is an outward corner
    pub fn is_convex_corner(&self) -> bool {
        matches!(
            self,
            TerrainPosition::CornerNE
                | TerrainPosition::CornerNW
                | TerrainPosition::CornerSE
                | TerrainPosition::CornerSW
        )
    }

    /// Check if this is an inward ("minus") corner
    pub fn is_concave_corner(&self) -> bool {
        matches!(
            self,
            TerrainPosition::ConcaveCornerNE
                | TerrainPosition::ConcaveCornerNW
                | TerrainPosition::ConcaveCornerSE
                | TerrainPosition::ConcaveCornerSW
        )
    }

    /// Check if this is a straight edge
    pub fn is_edge(&self) -> bool {
        matches!(
            self,
            TerrainPosition::EdgeN
                | TerrainPosition::EdgeS
                | TerrainPosition::EdgeE
                | TerrainPosition::EdgeW
        )
    }

    /// The keyword used for this position in role names (without the variant)
    pub fn keyword(&self) -> &'static str {
        match self {
            TerrainPosition::Center => "center",
            TerrainPosition::EdgeN => "N",
            TerrainPosition::EdgeS => "S",
            TerrainPosition::EdgeE => "E",
            TerrainPosition::EdgeW => "W",
            TerrainPosition::CornerNE => "NE",
            TerrainPosition::CornerNW => "NW",
            TerrainPosition::CornerSE => "SE",
            TerrainPosition::CornerSW => "SW",
            TerrainPosition::ConcaveCornerNE => "minus NE",
            TerrainPosition::ConcaveCornerNW => "minus NW",
            TerrainPosition::ConcaveCornerSE => "minus SE",
            TerrainPosition::ConcaveCornerSW => "minus SW",
            TerrainPosition::Spot => "spot",
        }
    }
}

impl fmt::Display for TerrainPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Parsed form of a role name such as `"grass minus SE 2"`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TerrainRole {
    /// Terrain family name, e.g. `"grass"`
    pub family: String,
    pub position: TerrainPosition,
    /// Distinguishes tiles that share a position within one family
    pub variant: u32,
}

impl TerrainRole {
    pub fn new(family: impl Into<String>, position: TerrainPosition, variant: u32) -> Self {
        Self {
            family: family.into(),
            position,
            variant,
        }
    }
}

impl fmt::Display for TerrainRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.family, self.position, self.variant)
    }
}

/// Why a role name was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoleNameError {
    #[error("name is empty")]
    Empty,
    #[error("no position keyword (expected N, S, E, W, NE, NW, SE, SW, center or spot)")]
    MissingPosition,
    #[error("unknown position keyword '{0}'")]
    UnknownPosition(String),
    #[error("'minus' must precede a diagonal, found '{0}'")]
    MinusWithoutDiagonal(String),
    #[error("no family name before the position")]
    MissingFamily,
    #[error("variant '{0}' is not a non-negative integer")]
    InvalidVariant(String),
}

/// Parse a role name under the `<family> [minus] <position> [<variant>]` grammar
pub fn parse_role_name(name: &str) -> Result<TerrainRole, RoleNameError> {
    let mut tokens: Vec<&str> = name.split_whitespace().collect();
    if tokens.is_empty() {
        return Err(RoleNameError::Empty);
    }

    let variant = match tokens.last() {
        Some(last) if last.chars().all(|c| c.is_ascii_digit()) => {
            let parsed = last
                .parse::<u32>()
                .map_err(|_| RoleNameError::InvalidVariant(last.to_string()))?;
            tokens.pop();
            parsed
        }
        Some(last) if last.starts_with('-') && last[1..].chars().all(|c| c.is_ascii_digit()) => {
            return Err(RoleNameError::InvalidVariant(last.to_string()));
        }
        _ => DEFAULT_VARIANT,
    };

    let keyword = tokens.pop().ok_or(RoleNameError::MissingPosition)?;
    let minus = tokens
        .last()
        .map(|t| t.eq_ignore_ascii_case("minus"))
        .unwrap_or(false);
    if minus {
        tokens.pop();
    }

    let position = position_from_keyword(keyword, minus)?;

    if tokens.is_empty() {
        return Err(RoleNameError::MissingFamily);
    }

    Ok(TerrainRole {
        family: tokens.join(" "),
        position,
        variant,
    })
}

fn position_from_keyword(keyword: &str, minus: bool) -> Result<TerrainPosition, RoleNameError> {
    let upper = keyword.to_ascii_uppercase();
    let position = match upper.as_str() {
        "N" => TerrainPosition::EdgeN,
        "S" => TerrainPosition::EdgeS,
        "E" => TerrainPosition::EdgeE,
        "W" => TerrainPosition::EdgeW,
        "NE" if minus => TerrainPosition::ConcaveCornerNE,
        "NW" if minus => TerrainPosition::ConcaveCornerNW,
        "SE" if minus => TerrainPosition::ConcaveCornerSE,
        "SW" if minus => TerrainPosition::ConcaveCornerSW,
        "NE" => TerrainPosition::CornerNE,
        "NW" => TerrainPosition::CornerNW,
        "SE" => TerrainPosition::CornerSE,
        "SW" => TerrainPosition::CornerSW,
        "CENTER" => TerrainPosition::Center,
        "SPOT" => TerrainPosition::Spot,
        "MINUS" => return Err(RoleNameError::MissingPosition),
        _ => return Err(RoleNameError::UnknownPosition(keyword.to_string())),
    };

    if minus && !position.is_concave_corner() {
        return Err(RoleNameError::MinusWithoutDiagonal(keyword.to_string()));
    }

    Ok(position)
}
