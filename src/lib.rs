pub mod compiler;
pub mod config;
pub mod cosmetic;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod height;
pub mod mask_text;
pub mod masks;
pub mod terrain_loader;
pub mod vertex_cache;

mod ground;
mod water;

pub use compiler::{CompiledTerrain, TerrainCompiler};
pub use config::CompilerConfig;
pub use error::{MaskParseError, TerrainError, TerrainLoadError};
pub use geometry::{Mesh, Triangle, Vertex3D};
pub use masks::{CliffCell, CliffMask, Color, TerrainDefinition, TerrainMasks};
