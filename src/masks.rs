//! Input masks and palette describing one terrain chunk

use crate::error::TerrainError;
use crate::geometry::Vertex3D;
use crate::grid::Grid;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One cell of the cliff mask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CliffCell {
    /// Explicit discrete height
    Level(i32),
    /// Sloped tile whose corner heights are inferred from its neighbours
    Ramp,
}

impl CliffCell {
    pub fn level(self) -> Option<i32> {
        match self {
            CliffCell::Level(h) => Some(h),
            CliffCell::Ramp => None,
        }
    }

    pub fn is_ramp(self) -> bool {
        matches!(self, CliffCell::Ramp)
    }
}

pub type CliffMask = Grid<CliffCell>;

/// Which palette-indexed mask a tile color came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileLayer {
    Ground,
    Cliff,
}

impl fmt::Display for TileLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TileLayer::Ground => write!(f, "ground"),
            TileLayer::Cliff => write!(f, "cliff"),
        }
    }
}

/// Flat RGB color (0-1 range)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (case-insensitive, leading `#` optional)
    pub fn from_hex(value: &str) -> Option<Self> {
        let hex = value.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .ok()
                .map(|v| v as f32 / 255.0)
        };
        Some(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }
}

/// Palette entry referenced by the ground and cliff tile masks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileEntry {
    pub color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainSize {
    pub width: usize,
    pub height: usize,
}

/// All per-tile and per-corner grids for one chunk.
///
/// Tile masks are `height x width`, corner masks are `(height + 1) x (width + 1)`.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainMasks {
    pub cliff: CliffMask,
    /// Per-corner floor undulation added on top of the resolved level
    pub height: Grid<f32>,
    pub ground_tile: Grid<usize>,
    pub cliff_tile: Grid<usize>,
    pub water: Grid<bool>,
    pub water_height: Grid<f32>,
}

impl TerrainMasks {
    /// Masks for a given cliff layout with no undulation, no water and palette entry 0 everywhere
    pub fn from_cliff(cliff: CliffMask) -> Self {
        let (width, height) = (cliff.width(), cliff.height());
        Self {
            cliff,
            height: Grid::filled(width + 1, height + 1, 0.0),
            ground_tile: Grid::filled(width, height, 0),
            cliff_tile: Grid::filled(width, height, 0),
            water: Grid::filled(width, height, false),
            water_height: Grid::filled(width + 1, height + 1, 0.0),
        }
    }
}

/// Everything a caller supplies for one compilation
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainDefinition {
    pub size: TerrainSize,
    /// Centering offset added to every emitted point
    pub offset: Vertex3D,
    pub tiles: Vec<TileEntry>,
    pub masks: TerrainMasks,
}

impl TerrainDefinition {
    pub fn new(tiles: Vec<TileEntry>, masks: TerrainMasks) -> Self {
        Self {
            size: TerrainSize {
                width: masks.cliff.width(),
                height: masks.cliff.height(),
            },
            offset: Vertex3D::new(0.0, 0.0, 0.0),
            tiles,
            masks,
        }
    }

    /// Check every mask against the declared grid size
    pub fn validate(&self) -> Result<(), TerrainError> {
        let TerrainSize { width, height } = self.size;
        let masks = &self.masks;

        check_dims("cliff", masks.cliff.width(), masks.cliff.height(), width, height)?;
        check_dims("ground_tile", masks.ground_tile.width(), masks.ground_tile.height(), width, height)?;
        check_dims("cliff_tile", masks.cliff_tile.width(), masks.cliff_tile.height(), width, height)?;
        check_dims("water", masks.water.width(), masks.water.height(), width, height)?;
        check_dims("height", masks.height.width(), masks.height.height(), width + 1, height + 1)?;
        check_dims(
            "water_height",
            masks.water_height.width(),
            masks.water_height.height(),
            width + 1,
            height + 1,
        )?;

        Ok(())
    }

    /// Resolve every palette entry to a color up front
    pub fn palette_colors(&self) -> Result<Vec<Color>, TerrainError> {
        self.tiles
            .iter()
            .enumerate()
            .map(|(index, tile)| {
                Color::from_hex(&tile.color).ok_or_else(|| TerrainError::InvalidColor {
                    what: format!("palette entry {}", index),
                    value: tile.color.clone(),
                })
            })
            .collect()
    }
}

fn check_dims(
    mask: &'static str,
    width: usize,
    height: usize,
    expected_width: usize,
    expected_height: usize,
) -> Result<(), TerrainError> {
    if width != expected_width || height != expected_height {
        return Err(TerrainError::MaskDimensions {
            mask,
            expected_width,
            expected_height,
            width,
            height,
        });
    }
    Ok(())
}

/// Palette lookups for the two tile-indexed masks
pub(crate) struct TileColors<'a> {
    pub palette: &'a [Color],
    pub ground_tile: &'a Grid<usize>,
    pub cliff_tile: &'a Grid<usize>,
}

impl TileColors<'_> {
    pub fn ground(&self, x: usize, y: usize) -> Result<Color, TerrainError> {
        self.lookup(TileLayer::Ground, self.ground_tile, x, y)
    }

    pub fn cliff(&self, x: usize, y: usize) -> Result<Color, TerrainError> {
        self.lookup(TileLayer::Cliff, self.cliff_tile, x, y)
    }

    /// Check every ground and cliff index, bottom row first, left to right
    pub fn check_all(&self) -> Result<(), TerrainError> {
        for y in (0..self.ground_tile.height()).rev() {
            for x in 0..self.ground_tile.width() {
                self.ground(x, y)?;
                self.cliff(x, y)?;
            }
        }
        Ok(())
    }

    fn lookup(
        &self,
        layer: TileLayer,
        mask: &Grid<usize>,
        x: usize,
        y: usize,
    ) -> Result<Color, TerrainError> {
        let index = mask.get(x, y).copied().unwrap_or(usize::MAX);
        self.palette
            .get(index)
            .copied()
            .ok_or(TerrainError::PaletteLookup {
                layer,
                x,
                y,
                index,
                palette_len: self.palette.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_from_hex() {
        let c = Color::from_hex("#FF0080").unwrap();
        assert_eq!(c.r, 1.0);
        assert_eq!(c.g, 0.0);
        assert!((c.b - 128.0 / 255.0).abs() < 1e-6);

        assert_eq!(Color::from_hex("ff0080"), Some(c));
        assert!(Color::from_hex("#FF00").is_none());
        assert!(Color::from_hex("#GG0000").is_none());
    }

    #[test]
    fn test_validate_rejects_wrong_corner_mask() {
        let cliff = Grid::filled(3, 2, CliffCell::Level(0));
        let mut masks = TerrainMasks::from_cliff(cliff);
        masks.height = Grid::filled(3, 2, 0.0);
        let terrain = TerrainDefinition::new(vec![], masks);

        match terrain.validate() {
            Err(TerrainError::MaskDimensions { mask, expected_width, expected_height, .. }) => {
                assert_eq!(mask, "height");
                assert_eq!((expected_width, expected_height), (4, 3));
            }
            other => panic!("Expected dimension error, got {:?}", other),
        }
    }

    #[test]
    fn test_palette_lookup_error_names_tile() {
        let palette = [Color::new(0.0, 0.0, 0.0); 3];
        let mut ground_tile = Grid::filled(2, 2, 0usize);
        ground_tile.set(1, 0, 5);
        let cliff_tile = Grid::filled(2, 2, 0usize);
        let colors = TileColors {
            palette: &palette,
            ground_tile: &ground_tile,
            cliff_tile: &cliff_tile,
        };

        assert!(colors.ground(0, 0).is_ok());
        assert!(matches!(
            colors.check_all(),
            Err(TerrainError::PaletteLookup { x: 1, y: 0, index: 5, .. })
        ));
        assert_eq!(
            colors.ground(1, 0),
            Err(TerrainError::PaletteLookup {
                layer: TileLayer::Ground,
                x: 1,
                y: 0,
                index: 5,
                palette_len: 3,
            })
        );
    }

    #[test]
    fn test_check_all_covers_unused_cliff_indices() {
        let palette = [Color::new(0.0, 0.0, 0.0); 2];
        let ground_tile = Grid::filled(2, 2, 1usize);
        let mut cliff_tile = Grid::filled(2, 2, 0usize);
        cliff_tile.set(0, 0, 4);
        let colors = TileColors {
            palette: &palette,
            ground_tile: &ground_tile,
            cliff_tile: &cliff_tile,
        };

        assert_eq!(
            colors.check_all(),
            Err(TerrainError::PaletteLookup {
                layer: TileLayer::Cliff,
                x: 0,
                y: 0,
                index: 4,
                palette_len: 2,
            })
        );
    }
}
