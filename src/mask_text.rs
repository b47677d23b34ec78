//! Compact text-grid notation for authoring masks
//!
//! Cliff maps use one character per tile: a digit is an explicit level, `r`/`R`
//! is a ramp and `.` repeats the nearest explicit level to its left in the same
//! row, falling back to the level directly above. Common indentation and blank
//! lines around the map are ignored, so maps can be written inline. Lowercase
//! `r` is the canonical ramp; rendering never writes `R`.
//!
//! ```
//! use terrain_mesh::mask_text::parse_cliff_map;
//!
//! let mask = parse_cliff_map("
//!     0002
//!     0rr.
//!     0002
//! ").unwrap();
//! assert_eq!(mask.width(), 4);
//! ```
use crate::error::MaskParseError;
use crate::grid::Grid;
use crate::masks::{CliffCell, CliffMask};

/// Length of the leading whitespace of a line
fn left_trim(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

/// Smallest indentation over all non-blank lines
fn common_left_trim<'a>(rows: impl Iterator<Item = &'a str>) -> usize {
    rows.filter(|row| !row.trim().is_empty())
        .map(left_trim)
        .min()
        .unwrap_or(0)
}

/// Non-blank lines with trailing whitespace and common indentation removed
fn map_rows(map: &str) -> Vec<&str> {
    let rows: Vec<&str> = map.lines().filter(|row| !row.trim().is_empty()).collect();
    let indent = common_left_trim(rows.iter().copied());
    rows.into_iter()
        .map(|row| row.trim_end().get(indent..).unwrap_or(""))
        .collect()
}

/// Remove blank lines above and below the map as well as common indentation.
/// Blank lines inside the map are kept.
pub fn trim_map(map: &str) -> String {
    let lines: Vec<&str> = map.lines().collect();
    let Some(start) = lines.iter().position(|l| !l.trim().is_empty()) else {
        return String::new();
    };
    let end = lines
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .unwrap_or(start);

    let rows = &lines[start..=end];
    let indent = common_left_trim(rows.iter().copied());

    rows.iter()
        .map(|row| row.trim_end().get(indent..).unwrap_or(""))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse a cliff map into a [`CliffMask`]
pub fn parse_cliff_map(map: &str) -> Result<CliffMask, MaskParseError> {
    let rows = map_rows(map);
    let width = rows.first().map(|r| r.chars().count()).ok_or(MaskParseError::Empty)?;

    let mut cells: Vec<Vec<CliffCell>> = Vec::with_capacity(rows.len());
    for (y, row) in rows.iter().enumerate() {
        let count = row.chars().count();
        if count != width {
            return Err(MaskParseError::RaggedRow {
                row: y,
                expected: width,
                actual: count,
            });
        }

        let mut parsed: Vec<CliffCell> = Vec::with_capacity(width);
        for (x, character) in row.chars().enumerate() {
            let cell = match character {
                'r' | 'R' => CliffCell::Ramp,
                '.' => {
                    let left = parsed.iter().rev().find_map(|c| c.level());
                    let above = y
                        .checked_sub(1)
                        .and_then(|py| cells.get(py))
                        .and_then(|prev| prev[x].level());
                    match left.or(above) {
                        Some(level) => CliffCell::Level(level),
                        None => return Err(MaskParseError::UnresolvedFill { x, y }),
                    }
                }
                c => match c.to_digit(10) {
                    Some(d) => CliffCell::Level(d as i32),
                    None => return Err(MaskParseError::InvalidCharacter { x, y, character: c }),
                },
            };
            parsed.push(cell);
        }
        cells.push(parsed);
    }

    // Rows were checked above
    Grid::from_rows(cells).ok_or(MaskParseError::Empty)
}

/// Render a cliff mask back to text, one row per line, ramps as `r`
pub fn render_cliff_map(mask: &CliffMask) -> Result<String, MaskParseError> {
    let mut lines = Vec::with_capacity(mask.height());
    for (y, row) in mask.rows().enumerate() {
        let mut line = String::with_capacity(row.len());
        for (x, cell) in row.iter().enumerate() {
            match cell {
                CliffCell::Ramp => line.push('r'),
                CliffCell::Level(level) => {
                    let digit = u32::try_from(*level)
                        .ok()
                        .and_then(|l| char::from_digit(l, 10))
                        .ok_or(MaskParseError::UnrenderableLevel { x, y, level: *level })?;
                    line.push(digit);
                }
            }
        }
        lines.push(line);
    }
    Ok(lines.join("\n"))
}

/// Parse a map of single digits. Any other character takes the `fill` value.
pub fn parse_number_map(map: &str, fill: u32) -> Result<Grid<u32>, MaskParseError> {
    let rows = map_rows(map);
    let width = rows.first().map(|r| r.chars().count()).ok_or(MaskParseError::Empty)?;

    let mut cells = Vec::with_capacity(rows.len());
    for (y, row) in rows.iter().enumerate() {
        // Trailing fill cells are trimmed off with the whitespace, so pad short rows
        let mut parsed: Vec<u32> = row.chars().map(|c| c.to_digit(10).unwrap_or(fill)).collect();
        if parsed.len() > width {
            return Err(MaskParseError::RaggedRow {
                row: y,
                expected: width,
                actual: parsed.len(),
            });
        }
        parsed.resize(width, fill);
        cells.push(parsed);
    }

    Grid::from_rows(cells).ok_or(MaskParseError::Empty)
}
