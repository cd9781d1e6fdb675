//! Stateless autotile facade over a terrain atlas
//!
//! [`AutotileEngine`] borrows an atlas and a configuration and answers the two
//! questions consumers ask:
//! - renderer: which tile goes on this cell? ([`AutotileEngine::render_tile`])
//! - movement: may an entity enter this cell? ([`AutotileEngine::can_enter`])
//!
//! It owns nothing mutable, so one engine can serve any number of grids on
//! any number of threads. Grids must not be mutated during a pass over them.

use crate::classify::classify_cell;
use crate::config::{AutotileConfig, FallbackPolicy};
use crate::variant::pick_variant;
use crate::AutotileError;
use atlas_terrain_core::{
    PixelRect, TerrainAtlas, TerrainFamily, TerrainGrid, TerrainPosition, TileId, TileLayer,
    TileMetrics, TileStack,
};

/// A cell whose tile could not be resolved during a region pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellFailure {
    pub x: i32,
    pub y: i32,
    pub error: AutotileError,
}

/// Result of rendering a whole grid for one family
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionRender {
    pub width: u32,
    pub height: u32,
    /// Row-major; `None` for non-terrain cells and failed cells
    pub tiles: Vec<Option<TileId>>,
    /// Cells that had no resolvable tile
    pub failures: Vec<CellFailure>,
}

impl RegionRender {
    pub fn get(&self, x: i32, y: i32) -> Option<TileId> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        self.tiles[y as usize * self.width as usize + x as usize]
    }

    /// Check if every terrain cell received a tile
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Autotiling and walkability queries against a borrowed atlas
#[derive(Debug, Clone, Copy)]
pub struct AutotileEngine<'a> {
    atlas: &'a TerrainAtlas,
    config: &'a AutotileConfig,
}

impl<'a> AutotileEngine<'a> {
    pub fn new(atlas: &'a TerrainAtlas, config: &'a AutotileConfig) -> Self {
        Self { atlas, config }
    }

    pub fn atlas(&self) -> &'a TerrainAtlas {
        self.atlas
    }

    pub fn config(&self) -> &'a AutotileConfig {
        self.config
    }

    fn family(&self, name: &str) -> Result<&'a TerrainFamily, AutotileError> {
        self.atlas
            .table()
            .family(name)
            .ok_or_else(|| AutotileError::UnknownFamily {
                family: name.to_string(),
            })
    }

    /// Position a cell plays in its blob, or `None` if it is not terrain
    pub fn classify<G>(&self, grid: &G, x: i32, y: i32) -> Option<TerrainPosition>
    where
        G: TerrainGrid + ?Sized,
    {
        classify_cell(grid, x, y, self.config.border)
    }

    /// Tile for a position in a family, with the variant picked for `(x, y)`
    pub fn resolve(
        &self,
        family: &str,
        position: TerrainPosition,
        x: i32,
        y: i32,
    ) -> Result<TileId, AutotileError> {
        let tiles = self.family(family)?;
        pick_variant(
            tiles.candidates(position),
            x,
            y,
            self.config.variant_selection,
        )
        .ok_or_else(|| AutotileError::UnresolvedRole {
            family: family.to_string(),
            position,
        })
    }

    /// Tile to draw on a cell, or `None` if the cell is not part of the terrain
    pub fn render_tile<G>(
        &self,
        family: &str,
        grid: &G,
        x: i32,
        y: i32,
    ) -> Result<Option<TileId>, AutotileError>
    where
        G: TerrainGrid + ?Sized,
    {
        match self.classify(grid, x, y) {
            Some(position) => self.resolve(family, position, x, y).map(Some),
            None => Ok(None),
        }
    }

    /// Like [`render_tile`](Self::render_tile), applying the configured
    /// [`FallbackPolicy`] when the family lacks the resolved position
    pub fn render_tile_or_fallback<G>(
        &self,
        family: &str,
        grid: &G,
        x: i32,
        y: i32,
    ) -> Result<Option<TileId>, AutotileError>
    where
        G: TerrainGrid + ?Sized,
    {
        match self.render_tile(family, grid, x, y) {
            Err(err @ AutotileError::UnresolvedRole { .. }) => {
                let substitute = match self.config.fallback {
                    FallbackPolicy::None => None,
                    FallbackPolicy::FamilyCenter => {
                        self.resolve(family, TerrainPosition::Center, x, y).ok()
                    }
                    FallbackPolicy::Tile(id) => Some(id),
                };
                match substitute {
                    Some(id) => {
                        log::debug!("({}, {}): {}, using tile {} instead", x, y, err, id);
                        Ok(Some(id))
                    }
                    None => Err(err),
                }
            }
            other => other,
        }
    }

    /// Render every cell of a `width` x `height` grid
    ///
    /// Unresolvable cells are recorded in [`RegionRender::failures`] and left
    /// empty; they never abort the pass. Only an unknown family fails as a whole.
    pub fn render_region<G>(
        &self,
        family: &str,
        grid: &G,
        width: u32,
        height: u32,
    ) -> Result<RegionRender, AutotileError>
    where
        G: TerrainGrid + ?Sized,
    {
        self.family(family)?;

        let mut render = RegionRender {
            width,
            height,
            tiles: Vec::with_capacity(width as usize * height as usize),
            failures: Vec::new(),
        };

        for y in 0..height as i32 {
            for x in 0..width as i32 {
                match self.render_tile_or_fallback(family, grid, x, y) {
                    Ok(tile) => render.tiles.push(tile),
                    Err(error) => {
                        log::warn!("autotile ({}, {}): {}", x, y, error);
                        render.tiles.push(None);
                        render.failures.push(CellFailure { x, y, error });
                    }
                }
            }
        }

        Ok(render)
    }

    /// Write a family's tiles into `layer` for every cell of the layer
    ///
    /// Terrain cells get their autotile. Cells that are no longer terrain, or
    /// whose position can no longer be resolved, are cleared if they hold a
    /// tile this engine writes for the family (a role tile of the family or
    /// the configured fallback tile). Other tiles are left alone.
    pub fn apply_to_layer<G>(
        &self,
        family: &str,
        grid: &G,
        layer: &mut TileLayer,
    ) -> Result<Vec<CellFailure>, AutotileError>
    where
        G: TerrainGrid + ?Sized,
    {
        let (width, height) = (layer.width as i32, layer.height as i32);
        self.apply_cells(family, grid, layer, 0, 0, width, height)
    }

    /// Re-autotile the 3x3 neighborhood of a cell after it was painted or erased
    pub fn refresh_around<G>(
        &self,
        family: &str,
        grid: &G,
        layer: &mut TileLayer,
        x: i32,
        y: i32,
    ) -> Result<Vec<CellFailure>, AutotileError>
    where
        G: TerrainGrid + ?Sized,
    {
        self.apply_cells(family, grid, layer, x.saturating_sub(1), y.saturating_sub(1), 3, 3)
    }

    fn apply_cells<G>(
        &self,
        family: &str,
        grid: &G,
        layer: &mut TileLayer,
        region_x: i32,
        region_y: i32,
        region_w: i32,
        region_h: i32,
    ) -> Result<Vec<CellFailure>, AutotileError>
    where
        G: TerrainGrid + ?Sized,
    {
        self.family(family)?;

        let min_x = region_x.max(0);
        let min_y = region_y.max(0);
        let max_x = region_x.saturating_add(region_w).min(layer.width as i32);
        let max_y = region_y.saturating_add(region_h).min(layer.height as i32);

        // Resolve everything first so the layer is never half-updated
        let mut updates: Vec<(i32, i32, Option<TileId>)> = Vec::new();
        let mut failures = Vec::new();

        for y in min_y..max_y {
            for x in min_x..max_x {
                match self.render_tile_or_fallback(family, grid, x, y) {
                    Ok(Some(tile)) => updates.push((x, y, Some(tile))),
                    Ok(None) => {
                        if self.is_own_tile(layer.get(x, y), family) {
                            updates.push((x, y, None));
                        }
                    }
                    Err(error) => {
                        log::warn!("autotile ({}, {}): {}", x, y, error);
                        // The old tile no longer matches the blob shape
                        if self.is_own_tile(layer.get(x, y), family) {
                            updates.push((x, y, None));
                        }
                        failures.push(CellFailure { x, y, error });
                    }
                }
            }
        }

        for (x, y, tile) in updates {
            layer.set(x, y, tile);
        }

        Ok(failures)
    }

    /// Check if a placed tile is one this engine writes for `family`
    fn is_own_tile(&self, tile: Option<TileId>, family: &str) -> bool {
        let Some(id) = tile else {
            return false;
        };
        if self.config.fallback == FallbackPolicy::Tile(id) {
            return true;
        }
        self.atlas
            .table()
            .get(id)
            .and_then(|d| d.role.as_ref())
            .map(|role| role.family == family)
            .unwrap_or(false)
    }

    /// Whether an entity may enter a cell
    ///
    /// The topmost tile on the cell decides. Cells with no tile are open;
    /// cells outside the map are not.
    pub fn can_enter<S>(&self, tiles: &S, x: i32, y: i32) -> bool
    where
        S: TileStack + ?Sized,
    {
        if !tiles.in_bounds(x, y) {
            return false;
        }
        tiles
            .topmost_tile(x, y)
            .map(|id| self.atlas.walkability().is_walkable(id))
            .unwrap_or(true)
    }

    /// Whether a pixel rectangle may stand here: all four corners must be enterable
    pub fn can_enter_rect<S>(&self, tiles: &S, metrics: TileMetrics, rect: PixelRect) -> bool
    where
        S: TileStack + ?Sized,
    {
        rect.corners().iter().all(|&(px, py)| {
            let (x, y) = metrics.px_to_tile(px, py);
            self.can_enter(tiles, x, y)
        })
    }
}
