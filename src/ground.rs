//! Ground mesh assembly: floors, cliff walls and ramp connectors

use crate::error::TerrainError;
use crate::geometry::Triangle;
use crate::grid::Grid;
use crate::height::{representative_level, resolve_tile, TileCorners};
use crate::masks::{CliffCell, CliffMask, Color, TileColors};
use crate::vertex_cache::{PointId, VertexCache};
use tracing::debug;

/// Grid offset of each quad corner, in `[top_left, top_right, bottom_left, bottom_right]` order
const CORNER_OFFSETS: [(usize, usize); 4] = [(0, 0), (1, 0), (0, 1), (1, 1)];

/// Tile edges as `(corner a, corner b, neighbour direction)`, walked clockwise
const EDGES: [(usize, usize, (i32, i32)); 4] = [
    (0, 1, (0, -1)),
    (1, 3, (1, 0)),
    (3, 2, (0, 1)),
    (2, 0, (-1, 0)),
];

/// Boundary a wall stands on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WallAxis {
    /// Left edge of a tile, shared with its `x - 1` neighbour
    Vertical,
    /// Top edge of a tile, shared with its `y - 1` neighbour
    Horizontal,
}

/// Two triangles covering a quad given as `[top_left, top_right, bottom_left, bottom_right]`
pub(crate) fn floor_faces(quad: [PointId; 4]) -> [[PointId; 3]; 2] {
    [[quad[1], quad[0], quad[2]], [quad[1], quad[2], quad[3]]]
}

/// Two triangles covering a wall quad given as `[a_low, b_low, a_high, b_high]`.
/// Winding depends on which side of the boundary is lower so faces point outward.
pub(crate) fn wall_faces(quad: [PointId; 4], axis: WallAxis, current_is_low: bool) -> [[PointId; 3]; 2] {
    let order: [[usize; 3]; 2] = match (axis, current_is_low) {
        (WallAxis::Vertical, true) | (WallAxis::Horizontal, false) => [[1, 0, 2], [1, 2, 3]],
        (WallAxis::Vertical, false) | (WallAxis::Horizontal, true) => [[2, 0, 1], [2, 1, 3]],
    };
    order.map(|tri| tri.map(|i| quad[i]))
}

/// Ground triangles before cosmetic passes
#[derive(Debug, Default)]
pub(crate) struct GroundTriangles {
    /// Floor and wall quads as consecutive triangle pairs
    pub quads: Vec<Triangle>,
    /// Single triangles closing the gap between a ramp edge and flat ground
    pub ramp_walls: Vec<Triangle>,
}

pub(crate) struct GroundAssembler<'a> {
    cliff: &'a CliffMask,
    offsets: &'a Grid<f32>,
    colors: &'a TileColors<'a>,
    cache: &'a mut VertexCache,
    out: GroundTriangles,
}

impl<'a> GroundAssembler<'a> {
    pub fn new(
        cliff: &'a CliffMask,
        offsets: &'a Grid<f32>,
        colors: &'a TileColors<'a>,
        cache: &'a mut VertexCache,
    ) -> Self {
        Self {
            cliff,
            offsets,
            colors,
            cache,
            out: GroundTriangles::default(),
        }
    }

    /// Scan every tile bottom row first, left to right
    pub fn assemble(mut self) -> Result<GroundTriangles, TerrainError> {
        for y in (0..self.cliff.height()).rev() {
            for x in 0..self.cliff.width() {
                match self.cliff.get(x, y) {
                    Some(CliffCell::Level(level)) => self.explicit_tile(x, y, *level as f32)?,
                    Some(CliffCell::Ramp) => self.ramp_tile(x, y)?,
                    None => {}
                }
            }
        }

        debug!(
            "Assembled {} ground quad triangles and {} ramp connectors",
            self.out.quads.len(),
            self.out.ramp_walls.len()
        );
        Ok(self.out)
    }

    fn offset(&self, x: usize, y: usize) -> f32 {
        self.offsets.get(x, y).copied().unwrap_or(0.0)
    }

    fn point(&mut self, x: usize, y: usize, level: f32) -> PointId {
        let offset = self.offset(x, y);
        self.cache.get_or_create(x, y, level, offset)
    }

    fn floor(&mut self, x: usize, y: usize, corners: TileCorners) -> Result<[PointId; 4], TerrainError> {
        let levels = corners.to_array();
        let mut quad = [0; 4];
        for (i, &(dx, dy)) in CORNER_OFFSETS.iter().enumerate() {
            quad[i] = self.point(x + dx, y + dy, levels[i]);
        }

        let color = self.colors.ground(x, y)?;
        self.push_quad(floor_faces(quad), color);
        Ok(quad)
    }

    fn push_quad(&mut self, faces: [[PointId; 3]; 2], color: Color) {
        for [a, b, c] in faces {
            self.out.quads.push(Triangle::new(a, b, c, color));
        }
    }

    /// Unit-height wall quads between `current` and `other` on one edge of tile `(x, y)`
    fn wall(&mut self, axis: WallAxis, x: usize, y: usize, current: f32, other: f32) -> Result<(), TerrainError> {
        let current_is_low = current < other;
        let (low, high) = if current_is_low {
            (current, other)
        } else {
            (other, current)
        };
        if low >= high {
            return Ok(());
        }

        let color = self.colors.cliff(x, y)?;
        let (a, b) = match axis {
            WallAxis::Vertical => ((x, y), (x, y + 1)),
            WallAxis::Horizontal => ((x, y), (x + 1, y)),
        };

        let steps = (high - low).ceil() as i64;
        for step in 0..steps {
            let z = low + step as f32;
            let quad = [
                self.point(a.0, a.1, z),
                self.point(b.0, b.1, z),
                self.point(a.0, a.1, z + 1.0),
                self.point(b.0, b.1, z + 1.0),
            ];
            self.push_quad(wall_faces(quad, axis, current_is_low), color);
        }

        Ok(())
    }

    fn explicit_tile(&mut self, x: usize, y: usize, level: f32) -> Result<(), TerrainError> {
        self.floor(x, y, TileCorners::flat(level))?;

        // Only left and top walls; the x + 1 and y + 1 tiles own the others
        if x > 0 {
            let other = representative_level(self.cliff, x - 1, y)?;
            self.wall(WallAxis::Vertical, x, y, level, other)?;
        }
        if y > 0 {
            let other = representative_level(self.cliff, x, y - 1)?;
            self.wall(WallAxis::Horizontal, x, y, level, other)?;
        }

        Ok(())
    }

    fn ramp_tile(&mut self, x: usize, y: usize) -> Result<(), TerrainError> {
        let corners = resolve_tile(self.cliff, x, y)?;
        let quad = self.floor(x, y, corners)?;
        let levels = corners.to_array();

        for (a, b, (dx, dy)) in EDGES {
            // Neither ramp runs nor the grid edge get connectors
            if !matches!(self.cliff.neighbor(x, y, dx, dy), Some(CliffCell::Level(_))) {
                continue;
            }
            if levels[a] == levels[b] {
                continue;
            }

            // New point under the higher corner, level with the lower one
            let (lower, upper) = if levels[a] < levels[b] { (a, b) } else { (b, a) };
            let (ux, uy) = (x + CORNER_OFFSETS[upper].0, y + CORNER_OFFSETS[upper].1);
            let foot = self.point(ux, uy, levels[lower]);

            let color = self.colors.cliff(x, y)?;
            self.out
                .ramp_walls
                .push(Triangle::new(quad[a], quad[b], foot, color));
        }

        let min = corners.min();

        if corners.top_left != corners.bottom_left && x > 0 {
            if let Some(CliffCell::Level(left)) = self.cliff.get(x - 1, y) {
                let left = *left as f32;
                self.wall(WallAxis::Vertical, x, y, min, left)?;
            }
        }
        if corners.top_left != corners.top_right && y > 0 {
            if let Some(CliffCell::Level(above)) = self.cliff.get(x, y - 1) {
                let above = *above as f32;
                self.wall(WallAxis::Horizontal, x, y, min, above)?;
            }
        }

        Ok(())
    }
}
