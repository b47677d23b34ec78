//! Shared corner points keyed by grid corner and height level
//!
//! Every tile touching a corner asks the cache for its points, so walls and
//! floors meeting at a shared edge reuse the same vertex instead of emitting
//! duplicates.

use crate::geometry::Vertex3D;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

/// Index of a point in the cache (and in the mesh built from it)
pub type PointId = u32;

/// Height level used as a map key, ordered by `f32::total_cmp`
#[derive(Debug, Clone, Copy)]
struct LevelKey(f32);

impl PartialEq for LevelKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for LevelKey {}

impl PartialOrd for LevelKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LevelKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// All points created at one `(x, y)` grid corner
#[derive(Debug, Clone, Default)]
pub struct Column {
    levels: BTreeMap<LevelKey, PointId>,
    water: Option<PointId>,
}

impl Column {
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// `(level, point)` pairs from lowest to highest level
    pub fn levels(&self) -> impl Iterator<Item = (f32, PointId)> + '_ {
        self.levels.iter().map(|(k, id)| (k.0, *id))
    }

    pub fn get(&self, level: f32) -> Option<PointId> {
        self.levels.get(&LevelKey(level)).copied()
    }

    /// Highest created level that does not exceed `level`
    pub fn highest_at_or_below(&self, level: f32) -> Option<(f32, PointId)> {
        self.levels
            .range(..=LevelKey(level))
            .next_back()
            .map(|(k, id)| (k.0, *id))
    }

    pub fn lowest(&self) -> Option<(f32, PointId)> {
        self.levels.iter().next().map(|(k, id)| (k.0, *id))
    }

    pub fn highest(&self) -> Option<(f32, PointId)> {
        self.levels.iter().next_back().map(|(k, id)| (k.0, *id))
    }

    pub fn water(&self) -> Option<PointId> {
        self.water
    }
}

/// Where a water corner ended up relative to the ground column beneath it
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WaterContact {
    /// Interpolated along a cliff face between two ground points
    Cliff(Vertex3D),
    /// No taller ground at this corner; the lower point raised to the water height
    Open(Vertex3D),
}

#[derive(Debug, Default)]
pub struct VertexCache {
    columns: HashMap<(usize, usize), Column>,
    points: Vec<Vertex3D>,
    water_points: Vec<Vertex3D>,
}

impl VertexCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point for corner `(x, y)` at `level`, created at `(x, -y, level + offset)`
    /// on first access. `offset` is ignored once the point exists.
    pub fn get_or_create(&mut self, x: usize, y: usize, level: f32, offset: f32) -> PointId {
        let column = self.columns.entry((x, y)).or_default();
        if let Some(id) = column.levels.get(&LevelKey(level)) {
            return *id;
        }

        let id = self.points.len() as PointId;
        self.points
            .push(Vertex3D::new(x as f32, -(y as f32), level + offset));
        column.levels.insert(LevelKey(level), id);
        id
    }

    /// Water point for corner `(x, y)`, computed by `make` on first access
    pub fn get_or_create_water<E>(
        &mut self,
        x: usize,
        y: usize,
        make: impl FnOnce(&Self) -> Result<Vertex3D, E>,
    ) -> Result<PointId, E> {
        if let Some(id) = self.column(x, y).and_then(Column::water) {
            return Ok(id);
        }

        let position = make(self)?;
        let id = self.water_points.len() as PointId;
        self.water_points.push(position);
        self.columns.entry((x, y)).or_default().water = Some(id);
        Ok(id)
    }

    pub fn column(&self, x: usize, y: usize) -> Option<&Column> {
        self.columns.get(&(x, y))
    }

    pub fn point(&self, id: PointId) -> Vertex3D {
        self.points[id as usize]
    }

    pub fn points(&self) -> &[Vertex3D] {
        &self.points
    }

    pub fn points_mut(&mut self) -> &mut [Vertex3D] {
        &mut self.points
    }

    pub fn water_points(&self) -> &[Vertex3D] {
        &self.water_points
    }

    /// Place a water corner against the ground column at `(x, y)`.
    ///
    /// `low` is the ground point at the highest level not above
    /// `floor(requested)`, or the lowest point when none qualifies. If a taller
    /// point exists the water slides up the cliff between the two, otherwise it
    /// floats straight above `low`. `None` when the column has no ground.
    pub fn hug_water(&self, x: usize, y: usize, requested: f32) -> Option<WaterContact> {
        let column = self.column(x, y)?;
        let (_, low_id) = column
            .highest_at_or_below(requested.floor())
            .or_else(|| column.lowest())?;
        let (_, high_id) = column.highest()?;
        let low = self.point(low_id);

        if high_id != low_id {
            let high = self.point(high_id);
            let span = high.z - low.z;
            if span.abs() > f32::EPSILON {
                let alpha = (requested - low.z) / span;
                return Some(WaterContact::Cliff(low.lerp(&high, alpha)));
            }
        }

        Some(WaterContact::Open(Vertex3D::new(low.x, low.y, requested)))
    }

    /// Ground and water point arrays, consuming the cache
    pub fn into_points(self) -> (Vec<Vertex3D>, Vec<Vertex3D>) {
        (self.points, self.water_points)
    }
}
