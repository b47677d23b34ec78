//! Corner height resolution for cliff and ramp tiles
//!
//! Explicit tiles are crisp steps: all four corners sit at the tile's level.
//! Ramp tiles infer each corner from the surrounding ground, so a run of ramps
//! blends linearly between the levels it connects.

use crate::error::TerrainError;
use crate::masks::{CliffCell, CliffMask};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four tile corners, each identified by its diagonal direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    /// Diagonal unit vector pointing from the tile center towards this corner
    pub fn direction(self) -> (i32, i32) {
        match self {
            Corner::TopLeft => (-1, -1),
            Corner::TopRight => (1, -1),
            Corner::BottomLeft => (-1, 1),
            Corner::BottomRight => (1, 1),
        }
    }
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Corner::TopLeft => "top-left",
            Corner::TopRight => "top-right",
            Corner::BottomLeft => "bottom-left",
            Corner::BottomRight => "bottom-right",
        };
        write!(f, "{}", name)
    }
}

/// Resolved heights of a tile's four corners
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileCorners {
    pub top_left: f32,
    pub top_right: f32,
    pub bottom_left: f32,
    pub bottom_right: f32,
}

impl TileCorners {
    pub fn flat(level: f32) -> Self {
        Self {
            top_left: level,
            top_right: level,
            bottom_left: level,
            bottom_right: level,
        }
    }

    /// Corners in `[top_left, top_right, bottom_left, bottom_right]` order
    pub fn to_array(self) -> [f32; 4] {
        [self.top_left, self.top_right, self.bottom_left, self.bottom_right]
    }

    pub fn min(self) -> f32 {
        self.to_array().into_iter().fold(f32::INFINITY, f32::min)
    }

    pub fn get(self, corner: Corner) -> f32 {
        match corner {
            Corner::TopLeft => self.top_left,
            Corner::TopRight => self.top_right,
            Corner::BottomLeft => self.bottom_left,
            Corner::BottomRight => self.bottom_right,
        }
    }
}

/// Height of one corner of tile `(x, y)`.
///
/// Candidates are the diagonal neighbour towards the corner plus the two
/// orthogonal neighbours sharing one axis with it. Explicit candidates
/// contribute their level. Every ramp candidate is resolved by walking through
/// consecutive ramps towards and away from it until explicit ground is found on
/// both ends; the estimate is the average of the two. When both ends agree on a
/// diagonal walk, the two crossing diagonals are walked instead. The corner is
/// the maximum of all estimates and explicit levels.
pub fn resolve_corner(
    mask: &CliffMask,
    x: usize,
    y: usize,
    corner: Corner,
) -> Result<f32, TerrainError> {
    if let Some(CliffCell::Level(h)) = mask.get(x, y) {
        return Ok(*h as f32);
    }

    let (dx, dy) = corner.direction();
    let checks = [(dx, dy), (0, dy), (dx, 0)];

    let mut explicit_max: Option<f32> = None;
    let mut ramp_checks = Vec::with_capacity(checks.len());
    for &(cx, cy) in &checks {
        match mask.neighbor(x, y, cx, cy) {
            Some(CliffCell::Level(h)) => {
                explicit_max = Some(explicit_max.map_or(*h as f32, |m| m.max(*h as f32)));
            }
            Some(CliffCell::Ramp) => ramp_checks.push((cx, cy)),
            None => {}
        }
    }

    let mut best = explicit_max;
    for (cx, cy) in ramp_checks {
        if let Some(estimate) = ramp_estimate(mask, x, y, cx, cy) {
            best = Some(best.map_or(estimate, |b| b.max(estimate)));
        }
    }

    best.ok_or(TerrainError::IslandRamp { x, y, corner })
}

/// Average of the explicit levels found walking both ways along `(cx, cy)`
fn ramp_estimate(mask: &CliffMask, x: usize, y: usize, cx: i32, cy: i32) -> Option<f32> {
    let far = walk_ramps(mask, x, y, cx, cy)?;
    let near = walk_ramps(mask, x, y, -cx, -cy)?;

    if far == near && cx != 0 && cy != 0 {
        // A symmetric diagonal run says nothing; probe across it instead
        let adjacent = walk_ramps(mask, x, y, -cx, cy)?;
        let adjacent_opposite = walk_ramps(mask, x, y, cx, -cy)?;
        return Some((adjacent + adjacent_opposite) as f32 / 2.0);
    }

    Some((far + near) as f32 / 2.0)
}

/// First explicit level stepping from `(x, y)` by `(sx, sy)` through ramps.
/// Leaving the grid before reaching one yields `None`.
fn walk_ramps(mask: &CliffMask, x: usize, y: usize, sx: i32, sy: i32) -> Option<i32> {
    let (mut px, mut py) = (x as i64, y as i64);
    loop {
        px += sx as i64;
        py += sy as i64;
        if px < 0 || py < 0 {
            return None;
        }
        match mask.get(px as usize, py as usize)? {
            CliffCell::Level(h) => return Some(*h),
            CliffCell::Ramp => continue,
        }
    }
}

/// All four corner heights of tile `(x, y)`
pub fn resolve_tile(mask: &CliffMask, x: usize, y: usize) -> Result<TileCorners, TerrainError> {
    if let Some(CliffCell::Level(h)) = mask.get(x, y) {
        return Ok(TileCorners::flat(*h as f32));
    }

    Ok(TileCorners {
        top_left: resolve_corner(mask, x, y, Corner::TopLeft)?,
        top_right: resolve_corner(mask, x, y, Corner::TopRight)?,
        bottom_left: resolve_corner(mask, x, y, Corner::BottomLeft)?,
        bottom_right: resolve_corner(mask, x, y, Corner::BottomRight)?,
    })
}

/// Level a neighbouring tile presents to a wall: its own level when explicit,
/// otherwise the lowest of its resolved corners
pub fn representative_level(mask: &CliffMask, x: usize, y: usize) -> Result<f32, TerrainError> {
    match mask.get(x, y) {
        Some(CliffCell::Level(h)) => Ok(*h as f32),
        _ => Ok(resolve_tile(mask, x, y)?.min()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::mask_text::parse_cliff_map;

    #[test]
    fn test_explicit_tile_short_circuits() {
        let mask = Grid::filled(1, 1, CliffCell::Level(3));
        assert_eq!(resolve_tile(&mask, 0, 0).unwrap(), TileCorners::flat(3.0));
    }

    #[test]
    fn test_single_ramp_between_levels() {
        let mask = parse_cliff_map(
            "
            001
            0r1
            001
            ",
        )
        .unwrap();

        let corners = resolve_tile(&mask, 1, 1).unwrap();
        assert_eq!(corners.top_left, 0.0);
        assert_eq!(corners.top_right, 1.0);
        assert_eq!(corners.bottom_left, 0.0);
        assert_eq!(corners.bottom_right, 1.0);
    }

    #[test]
    fn test_island_ramp_is_reported() {
        let mask = Grid::filled(2, 2, CliffCell::Ramp);
        match resolve_tile(&mask, 0, 0) {
            Err(TerrainError::IslandRamp { x: 0, y: 0, corner }) => {
                assert_eq!(corner, Corner::TopLeft);
            }
            other => panic!("Expected IslandRamp, got {:?}", other),
        }
    }

    #[test]
    fn test_ramp_on_grid_edge_uses_inner_ground() {
        // Top corners have two off-grid candidates each
        let mask = parse_cliff_map(
            "
            0r2
            000
            ",
        )
        .unwrap();

        let corners = resolve_tile(&mask, 1, 0).unwrap();
        assert_eq!(corners.top_left, 0.0);
        assert_eq!(corners.top_right, 2.0);
        assert_eq!(corners.bottom_left, 0.0);
        assert_eq!(corners.bottom_right, 2.0);
    }

    #[test]
    fn test_representative_level_of_ramp_is_lowest_corner() {
        let mask = parse_cliff_map(
            "
            0002
            0rr2
            0002
            ",
        )
        .unwrap();

        assert_eq!(representative_level(&mask, 2, 1).unwrap(), 1.0);
        assert_eq!(representative_level(&mask, 3, 1).unwrap(), 2.0);
    }
}
