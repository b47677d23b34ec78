use std::io::Write;
use tempfile::NamedTempFile;
use terrain_mesh::config::CompilerConfig;
use terrain_mesh::terrain_loader::TerrainLoader;
use terrain_mesh::{TerrainCompiler, TerrainLoadError};

const LAKESIDE: &str = r##"
name: Lakeside
size:
  width: 4
  height: 3
offset: { x: -2.0, y: 1.5, z: 0.0 }
tiles:
  - color: "#4A7023"
  - color: "#8B5A2B"
masks:
  cliff: |
    2210
    2r10
    2210
  cliff_tile: |
    1111
    1111
    1111
  water: |
    0001
    0001
    0001
  height:
    - [0, 0, 0, 0, 0]
    - [0, 0.25, 0, 0, 0]
    - [0, 0, 0, 0, 0]
    - [0, 0, 0, 0, 0]
"##;

fn write_temp(content: &str, suffix: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_and_compile_yaml_file() {
    let file = write_temp(LAKESIDE, ".yaml");
    let loaded = TerrainLoader::load_from_file(file.path()).unwrap();
    assert_eq!(loaded.name, "Lakeside");

    let compiled = TerrainCompiler::new(CompilerConfig::deterministic())
        .compile(&loaded.definition)
        .unwrap();
    assert!(!compiled.ground.is_empty());
    // One water quad per wet tile
    assert_eq!(compiled.water.triangle_count(), 3 * 2);

    let (min, max) = compiled.ground.bounds().unwrap();
    assert_eq!(min.x, -2.0);
    assert_eq!(max.x, 2.0);
    assert_eq!(max.y, 1.5);
}

#[test]
fn test_height_mask_raises_floor_corner() {
    let loaded = TerrainLoader::load_from_string(LAKESIDE).unwrap();
    let compiled = TerrainCompiler::new(CompilerConfig::deterministic())
        .compile(&loaded.definition)
        .unwrap();

    // Corner (1, 1) sits at level 2 plus its 0.25 undulation, shifted by the offset
    assert!(compiled
        .ground
        .vertices
        .iter()
        .any(|v| v.x == -1.0 && v.y == 0.5 && v.z == 2.25));
}

#[test]
fn test_load_json_file() {
    let json = r##"{
        "name": "Step",
        "size": { "width": 2, "height": 1 },
        "tiles": [{ "color": "#C2B280" }],
        "masks": {
            "cliff": "01",
            "water": [[1, 0]],
            "water_height": [[0, 0, 0], [0, 0, 0]]
        }
    }"##;
    let file = write_temp(json, ".json");

    let loaded = TerrainLoader::load_from_file(file.path()).unwrap();
    let compiled = TerrainCompiler::default().compile(&loaded.definition).unwrap();
    assert_eq!(compiled.water.triangle_count(), 2);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = TerrainLoader::load_from_file(dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, TerrainLoadError::Io(_)));
}

#[test]
fn test_malformed_yaml_is_parse_error() {
    let err = TerrainLoader::load_from_string("name: [unclosed").unwrap_err();
    assert!(matches!(err, TerrainLoadError::Parse(_)));
}

#[test]
fn test_config_file_round_trip() {
    let file = write_temp(
        r##"
[cosmetics]
seed = 7
rotate_diagonals = false
jitter = true
jitter_horizontal = 0.5
jitter_vertical = 0.25

[water]
lift = 0.5
open_water_nudge = 0.0
color = "#0000FF"

[logging]
level = "debug"
"##,
        ".toml",
    );

    let config = CompilerConfig::load(file.path()).unwrap();
    assert_eq!(config.cosmetics.seed, 7);
    assert!(!config.cosmetics.rotate_diagonals);
    assert_eq!(config.cosmetics.jitter_vertical, 0.25);
    assert_eq!(config.water.lift, 0.5);
    assert_eq!(config.water.color, "#0000FF");
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_missing_config_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = CompilerConfig::load_or_default(dir.path().join("terrain.toml"));
    assert_eq!(config, CompilerConfig::default());
}
