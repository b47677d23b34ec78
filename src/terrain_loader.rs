use crate::error::TerrainLoadError;
use crate::geometry::Vertex3D;
use crate::grid::Grid;
use crate::mask_text::{parse_cliff_map, parse_number_map};
use crate::masks::{TerrainDefinition, TerrainMasks, TerrainSize, TileEntry};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainFileFormat {
    pub name: String,
    pub size: TerrainSize,
    /// Centering offset; defaults to the origin
    #[serde(default)]
    pub offset: Option<Vertex3D>,
    pub tiles: Vec<TileEntry>,
    pub masks: MaskFileFormat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaskFileFormat {
    /// Text-grid notation: digits, `r` for ramps, `.` to repeat
    pub cliff: String,
    #[serde(default)]
    pub height: Option<NumberGrid>,
    #[serde(default)]
    pub ground_tile: Option<NumberGrid>,
    #[serde(default)]
    pub cliff_tile: Option<NumberGrid>,
    #[serde(default)]
    pub water: Option<NumberGrid>,
    #[serde(default)]
    pub water_height: Option<NumberGrid>,
}

/// A numeric mask written either as a digit map or as explicit rows
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberGrid {
    Text(String),
    Rows(Vec<Vec<f32>>),
}

#[derive(Debug, Clone)]
pub struct LoadedTerrain {
    pub name: String,
    pub definition: TerrainDefinition,
}

pub struct TerrainLoader;

impl TerrainLoader {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<LoadedTerrain, TerrainLoadError> {
        let content = fs::read_to_string(path)?;
        Self::load_from_string(&content)
    }

    pub fn load_from_string(content: &str) -> Result<LoadedTerrain, TerrainLoadError> {
        let terrain_file: TerrainFileFormat = if content.trim_start().starts_with('{') {
            serde_json::from_str(content)
                .map_err(|e| TerrainLoadError::Parse(format!("JSON parse error: {}", e)))?
        } else {
            serde_yaml::from_str(content)
                .map_err(|e| TerrainLoadError::Parse(format!("YAML parse error: {}", e)))?
        };

        Self::validate(&terrain_file)?;
        Self::build(terrain_file)
    }

    fn validate(terrain: &TerrainFileFormat) -> Result<(), TerrainLoadError> {
        if terrain.size.width == 0 || terrain.size.height == 0 {
            return Err(TerrainLoadError::Invalid(format!(
                "Terrain size must be positive, got {}x{}",
                terrain.size.width, terrain.size.height
            )));
        }

        if terrain.tiles.is_empty() {
            return Err(TerrainLoadError::Invalid(
                "Terrain must have at least one tile entry".to_string(),
            ));
        }

        Ok(())
    }

    fn build(terrain: TerrainFileFormat) -> Result<LoadedTerrain, TerrainLoadError> {
        let TerrainSize { width, height } = terrain.size;
        let masks = &terrain.masks;

        let cliff = parse_cliff_map(&masks.cliff).map_err(|source| TerrainLoadError::Mask {
            mask: "cliff",
            source,
        })?;

        let corner_mask = |name, grid: &Option<NumberGrid>| {
            number_grid(name, grid.as_ref(), width + 1, height + 1)
        };
        let tile_mask = |name, grid: &Option<NumberGrid>| number_grid(name, grid.as_ref(), width, height);

        let ground_tile = palette_indices("ground_tile", tile_mask("ground_tile", &masks.ground_tile)?)?;
        let cliff_tile = palette_indices("cliff_tile", tile_mask("cliff_tile", &masks.cliff_tile)?)?;

        let definition = TerrainDefinition {
            size: terrain.size,
            offset: terrain.offset.unwrap_or_default(),
            masks: TerrainMasks {
                cliff,
                height: corner_mask("height", &masks.height)?,
                ground_tile,
                cliff_tile,
                water: tile_mask("water", &masks.water)?.map(|v| *v != 0.0),
                water_height: corner_mask("water_height", &masks.water_height)?,
            },
            tiles: terrain.tiles,
        };

        definition
            .validate()
            .map_err(|e| TerrainLoadError::Invalid(e.to_string()))?;
        definition
            .palette_colors()
            .map_err(|e| TerrainLoadError::Invalid(e.to_string()))?;

        debug!(
            "Loaded terrain '{}' ({}x{}, {} tiles)",
            terrain.name,
            width,
            height,
            definition.tiles.len()
        );

        Ok(LoadedTerrain {
            name: terrain.name,
            definition,
        })
    }
}

/// Absent masks are zero-filled at the expected size
fn number_grid(
    name: &'static str,
    grid: Option<&NumberGrid>,
    width: usize,
    height: usize,
) -> Result<Grid<f32>, TerrainLoadError> {
    match grid {
        None => Ok(Grid::filled(width, height, 0.0)),
        Some(NumberGrid::Text(text)) => parse_number_map(text, 0)
            .map(|g| g.map(|v| *v as f32))
            .map_err(|source| TerrainLoadError::Mask { mask: name, source }),
        Some(NumberGrid::Rows(rows)) => Grid::from_rows(rows.clone())
            .ok_or_else(|| TerrainLoadError::Invalid(format!("Mask '{}' has ragged or empty rows", name))),
    }
}

fn palette_indices(name: &'static str, grid: Grid<f32>) -> Result<Grid<usize>, TerrainLoadError> {
    for (y, row) in grid.rows().enumerate() {
        for (x, value) in row.iter().enumerate() {
            if *value < 0.0 || value.fract() != 0.0 {
                return Err(TerrainLoadError::Invalid(format!(
                    "Mask '{}' has non-integer palette index {} at ({}, {})",
                    name, value, x, y
                )));
            }
        }
    }
    Ok(grid.map(|v| *v as usize))
}
