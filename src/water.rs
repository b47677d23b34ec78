//! Water surface assembly on top of the finished ground columns

use crate::config::WaterSettings;
use crate::cosmetic::nudge;
use crate::error::TerrainError;
use crate::geometry::{Triangle, Vertex3D};
use crate::ground::floor_faces;
use crate::grid::Grid;
use crate::masks::Color;
use crate::vertex_cache::{PointId, VertexCache, WaterContact};
use rand::Rng;
use tracing::debug;

pub(crate) struct WaterAssembler<'a> {
    water: &'a Grid<bool>,
    water_height: &'a Grid<f32>,
    settings: &'a WaterSettings,
    color: Color,
    cache: &'a mut VertexCache,
}

impl<'a> WaterAssembler<'a> {
    pub fn new(
        water: &'a Grid<bool>,
        water_height: &'a Grid<f32>,
        settings: &'a WaterSettings,
        color: Color,
        cache: &'a mut VertexCache,
    ) -> Self {
        Self {
            water,
            water_height,
            settings,
            color,
            cache,
        }
    }

    /// One quad per wet tile, as consecutive triangle pairs
    pub fn assemble<R: Rng + ?Sized>(mut self, rng: &mut R) -> Result<Vec<Triangle>, TerrainError> {
        let mut triangles = Vec::new();

        for y in (0..self.water.height()).rev() {
            for x in 0..self.water.width() {
                if !self.water.get(x, y).copied().unwrap_or(false) {
                    continue;
                }

                let quad = [
                    self.corner(x, y, rng)?,
                    self.corner(x + 1, y, rng)?,
                    self.corner(x, y + 1, rng)?,
                    self.corner(x + 1, y + 1, rng)?,
                ];
                for [a, b, c] in floor_faces(quad) {
                    triangles.push(Triangle::new(a, b, c, self.color));
                }
            }
        }

        debug!("Assembled {} water triangles", triangles.len());
        Ok(triangles)
    }

    fn corner<R: Rng + ?Sized>(&mut self, x: usize, y: usize, rng: &mut R) -> Result<PointId, TerrainError> {
        let requested = self.water_height.get(x, y).copied().unwrap_or(0.0) + self.settings.lift;
        let open_nudge = self.settings.open_water_nudge;

        self.cache.get_or_create_water(x, y, |cache| {
            match cache.hug_water(x, y, requested) {
                Some(WaterContact::Cliff(point)) => Ok(point),
                // Only open water is nudged, so cliff edges stay touched
                Some(WaterContact::Open(point)) => Ok(Vertex3D::new(
                    point.x,
                    point.y,
                    point.z + nudge(rng, open_nudge),
                )),
                None => Err(TerrainError::MissingGround { x, y }),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn flat_cache(width: usize, height: usize, level: f32) -> VertexCache {
        let mut cache = VertexCache::new();
        for y in 0..=height {
            for x in 0..=width {
                cache.get_or_create(x, y, level, 0.0);
            }
        }
        cache
    }

    #[test]
    fn test_open_water_quad() {
        let mut cache = flat_cache(1, 1, 0.0);
        let water = Grid::filled(1, 1, true);
        let water_height = Grid::filled(2, 2, 0.5);
        let settings = WaterSettings {
            open_water_nudge: 0.0,
            ..WaterSettings::default()
        };
        let color = Color::new(0.0, 0.0, 1.0);

        let triangles = WaterAssembler::new(&water, &water_height, &settings, color, &mut cache)
            .assemble(&mut ChaCha8Rng::seed_from_u64(0))
            .unwrap();

        assert_eq!(triangles.len(), 2);
        assert_eq!(cache.water_points().len(), 4);
        for p in cache.water_points() {
            assert_eq!(p.z, 0.5 + 0.375);
        }
    }

    #[test]
    fn test_water_shares_corners_between_tiles() {
        let mut cache = flat_cache(3, 1, 0.0);
        let water = Grid::filled(3, 1, true);
        let water_height = Grid::filled(4, 2, 0.0);
        let settings = WaterSettings::default();

        let triangles = WaterAssembler::new(&water, &water_height, &settings, Color::new(0.0, 0.0, 1.0), &mut cache)
            .assemble(&mut ChaCha8Rng::seed_from_u64(9))
            .unwrap();

        assert_eq!(triangles.len(), 6);
        assert_eq!(cache.water_points().len(), 8);
    }

    #[test]
    fn test_water_without_ground_fails() {
        let mut cache = VertexCache::new();
        let water = Grid::filled(1, 1, true);
        let water_height = Grid::filled(2, 2, 0.0);
        let settings = WaterSettings::default();

        let result = WaterAssembler::new(&water, &water_height, &settings, Color::new(0.0, 0.0, 1.0), &mut cache)
            .assemble(&mut ChaCha8Rng::seed_from_u64(0));

        assert!(matches!(result, Err(TerrainError::MissingGround { .. })));
    }
}
