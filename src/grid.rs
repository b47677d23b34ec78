//! Dense row-major 2D storage shared by every terrain mask

use serde::{Deserialize, Serialize};

/// Fixed-size grid addressed as `(x, y)` with `y` as the outer (row) index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    /// Flattened cells (row-major order: cells[y * width + x])
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Create a grid with every cell set to `value`
    pub fn filled(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            cells: vec![value; width * height],
        }
    }
}

impl<T> Grid<T> {
    /// Build a grid from nested rows. Returns `None` when the rows are ragged.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Option<Self> {
        let height = rows.len();
        let width = rows.first().map(|r| r.len()).unwrap_or(0);
        if rows.iter().any(|r| r.len() != width) {
            return None;
        }

        Some(Self {
            width,
            height,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Cell at grid coordinates, `None` outside the grid
    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells.get(y * self.width + x)
    }

    /// Cell at `(x + dx, y + dy)`; anything past an edge is an absent neighbour
    pub fn neighbor(&self, x: usize, y: usize, dx: i32, dy: i32) -> Option<&T> {
        let nx = x as i64 + dx as i64;
        let ny = y as i64 + dy as i64;
        if nx < 0 || ny < 0 {
            return None;
        }
        self.get(nx as usize, ny as usize)
    }

    pub fn set(&mut self, x: usize, y: usize, value: T) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = value;
        }
    }

    /// Iterate rows from `y = 0` downwards
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        // chunks() panics on zero, and a zero-width grid has no rows anyway
        self.cells.chunks(self.width.max(1)).take(self.height)
    }

    pub fn map<U>(&self, f: impl Fn(&T) -> U) -> Grid<U> {
        Grid {
            width: self.width,
            height: self.height,
            cells: self.cells.iter().map(f).collect(),
        }
    }
}
