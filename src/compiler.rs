//! One-shot compilation of terrain masks into ground and water meshes

use crate::config::CompilerConfig;
use crate::cosmetic::{jitter, rotate_diagonals};
use crate::error::TerrainError;
use crate::geometry::Mesh;
use crate::ground::{GroundAssembler, GroundTriangles};
use crate::masks::{Color, TerrainDefinition, TileColors};
use crate::vertex_cache::VertexCache;
use crate::water::WaterAssembler;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Output of one compilation, handed to the renderer as two independent lists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledTerrain {
    pub ground: Mesh,
    pub water: Mesh,
}

pub struct TerrainCompiler {
    config: CompilerConfig,
}

impl TerrainCompiler {
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compile with randomness seeded from the configuration
    pub fn compile(&self, terrain: &TerrainDefinition) -> Result<CompiledTerrain, TerrainError> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.cosmetics.seed);
        self.compile_with_rng(terrain, &mut rng)
    }

    /// Compile drawing every random decision from `rng`.
    ///
    /// Order: ground assembly, ground diagonal rotation, ground jitter, water
    /// assembly (hugging the jittered ground), water rotation, centering offset.
    pub fn compile_with_rng<R: Rng + ?Sized>(
        &self,
        terrain: &TerrainDefinition,
        rng: &mut R,
    ) -> Result<CompiledTerrain, TerrainError> {
        terrain.validate()?;

        let cosmetics = &self.config.cosmetics;
        let water_settings = &self.config.water;
        let palette = terrain.palette_colors()?;
        let water_color = Color::from_hex(&water_settings.color).ok_or_else(|| TerrainError::InvalidColor {
            what: "water".to_string(),
            value: water_settings.color.clone(),
        })?;

        let masks = &terrain.masks;
        let colors = TileColors {
            palette: &palette,
            ground_tile: &masks.ground_tile,
            cliff_tile: &masks.cliff_tile,
        };
        colors.check_all()?;

        info!(
            "Compiling terrain {}x{} ({} palette entries)",
            terrain.size.width,
            terrain.size.height,
            palette.len()
        );

        let mut cache = VertexCache::new();
        let GroundTriangles {
            quads: mut ground_triangles,
            ramp_walls,
        } = GroundAssembler::new(&masks.cliff, &masks.height, &colors, &mut cache).assemble()?;

        if cosmetics.rotate_diagonals {
            rotate_diagonals(&mut ground_triangles, rng);
        }
        // Connectors are single triangles and must not be paired up by the rotation
        ground_triangles.extend(ramp_walls);

        if cosmetics.jitter {
            debug!("Jittering {} ground points", cache.points().len());
            jitter(
                cache.points_mut(),
                rng,
                cosmetics.jitter_horizontal,
                cosmetics.jitter_vertical,
            );
        }

        let mut water_triangles = WaterAssembler::new(
            &masks.water,
            &masks.water_height,
            water_settings,
            water_color,
            &mut cache,
        )
        .assemble(rng)?;

        if cosmetics.rotate_diagonals {
            rotate_diagonals(&mut water_triangles, rng);
        }

        let (ground_points, water_points) = cache.into_points();
        let mut ground = Mesh {
            vertices: ground_points,
            triangles: ground_triangles,
        };
        let mut water = Mesh {
            vertices: water_points,
            triangles: water_triangles,
        };
        ground.translate(&terrain.offset);
        water.translate(&terrain.offset);

        info!(
            "Compiled terrain: {} ground triangles ({} vertices), {} water triangles ({} vertices)",
            ground.triangle_count(),
            ground.vertices.len(),
            water.triangle_count(),
            water.vertices.len()
        );

        Ok(CompiledTerrain { ground, water })
    }
}

impl Default for TerrainCompiler {
    fn default() -> Self {
        Self::new(CompilerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vertex3D;
    use crate::grid::Grid;
    use crate::mask_text::parse_cliff_map;
    use crate::masks::{TerrainMasks, TileEntry, TileLayer};

    fn palette() -> Vec<TileEntry> {
        ["#4A7023", "#8B5A2B", "#C2B280"]
            .iter()
            .map(|c| TileEntry { color: c.to_string() })
            .collect()
    }

    fn terrain(map: &str) -> TerrainDefinition {
        TerrainDefinition::new(palette(), TerrainMasks::from_cliff(parse_cliff_map(map).unwrap()))
    }

    #[test]
    fn test_flat_tile_geometry() {
        let compiler = TerrainCompiler::new(CompilerConfig::deterministic());
        let compiled = compiler.compile(&terrain("2")).unwrap();

        assert_eq!(compiled.ground.triangle_count(), 2);
        assert!(compiled.water.is_empty());
        assert_eq!(
            compiled.ground.vertices,
            vec![
                Vertex3D::new(0.0, 0.0, 2.0),
                Vertex3D::new(1.0, 0.0, 2.0),
                Vertex3D::new(0.0, -1.0, 2.0),
                Vertex3D::new(1.0, -1.0, 2.0),
            ]
        );
    }

    #[test]
    fn test_offset_translates_both_meshes() {
        let mut definition = terrain("00");
        definition.masks.water = Grid::filled(2, 1, true);
        definition.offset = Vertex3D::new(-1.0, 0.5, 3.0);

        let compiler = TerrainCompiler::new(CompilerConfig::deterministic());
        let compiled = compiler.compile(&definition).unwrap();

        let (min, max) = compiled.ground.bounds().unwrap();
        assert_eq!(min, Vertex3D::new(-1.0, -0.5, 3.0));
        assert_eq!(max, Vertex3D::new(1.0, 0.5, 3.0));

        let (water_min, _) = compiled.water.bounds().unwrap();
        assert_eq!(water_min.z, 3.0 + 0.375);
    }

    #[test]
    fn test_palette_error_aborts_compilation() {
        let mut definition = terrain("000\n000");
        definition.masks.ground_tile.set(2, 1, 5);

        let err = TerrainCompiler::default().compile(&definition).unwrap_err();
        assert_eq!(
            err,
            TerrainError::PaletteLookup {
                layer: TileLayer::Ground,
                x: 2,
                y: 1,
                index: 5,
                palette_len: 3,
            }
        );
        let message = err.to_string();
        assert!(message.contains("(2, 1)"));
        assert!(message.contains("color 5"));
    }

    #[test]
    fn test_invalid_water_color() {
        let mut config = CompilerConfig::deterministic();
        config.water.color = "blue".to_string();

        let err = TerrainCompiler::new(config).compile(&terrain("0")).unwrap_err();
        assert!(matches!(err, TerrainError::InvalidColor { .. }));
    }
}
