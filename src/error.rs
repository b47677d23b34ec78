use crate::height::Corner;
use crate::masks::TileLayer;
use thiserror::Error;

/// Failures that abort one terrain compilation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TerrainError {
    #[error("Tile ({x}, {y}) uses undefined {layer} color {index} (palette has {palette_len} entries)")]
    PaletteLookup {
        layer: TileLayer,
        x: usize,
        y: usize,
        index: usize,
        palette_len: usize,
    },
    #[error("Ramp at ({x}, {y}) has no explicit ground reachable from its {corner} corner")]
    IslandRamp { x: usize, y: usize, corner: Corner },
    #[error("Expected ground where there is water at corner ({x}, {y})")]
    MissingGround { x: usize, y: usize },
    #[error("Mask '{mask}' is {width}x{height}, expected {expected_width}x{expected_height}")]
    MaskDimensions {
        mask: &'static str,
        expected_width: usize,
        expected_height: usize,
        width: usize,
        height: usize,
    },
    #[error("Invalid {what} color '{value}'")]
    InvalidColor { what: String, value: String },
}

/// Failures of the text-grid mask notation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MaskParseError {
    #[error("Map contains no rows")]
    Empty,
    #[error("Fill at ({x}, {y}) has no explicit value to its left or above")]
    UnresolvedFill { x: usize, y: usize },
    #[error("Unexpected character '{character}' at ({x}, {y})")]
    InvalidCharacter { x: usize, y: usize, character: char },
    #[error("Row {row} has {actual} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("Level {level} at ({x}, {y}) cannot be written as a single character")]
    UnrenderableLevel { x: usize, y: usize, level: i32 },
}

/// Failures while reading a terrain definition file.
#[derive(Debug, Error)]
pub enum TerrainLoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Mask '{mask}': {source}")]
    Mask {
        mask: &'static str,
        #[source]
        source: MaskParseError,
    },
    #[error("Invalid data: {0}")]
    Invalid(String),
}
