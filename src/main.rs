use clap::Parser;
use std::path::PathBuf;
use terrain_mesh::{config::CompilerConfig, geometry::Mesh, terrain_loader::TerrainLoader, TerrainCompiler};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Terrain definition (YAML or JSON)
    definition: PathBuf,

    /// Path to terrain.toml configuration file
    #[arg(short, long, default_value = "./terrain.toml")]
    config: String,

    /// Override log level (trace|debug|info|warn|error)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Override the cosmetic seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Disable diagonal rotation, jitter and open-water nudging
    #[arg(long)]
    flat: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = CompilerConfig::load_or_default(&args.config);

    let log_level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .init();

    if args.flat {
        config.cosmetics.rotate_diagonals = false;
        config.cosmetics.jitter = false;
        config.water.open_water_nudge = 0.0;
    }
    if let Some(seed) = args.seed {
        config.cosmetics.seed = seed;
    }

    info!("Loading terrain from {:?}", args.definition);
    let loaded = TerrainLoader::load_from_file(&args.definition)?;

    let compiled = TerrainCompiler::new(config).compile(&loaded.definition)?;

    println!("Terrain: {}", loaded.name);
    println!(
        "Grid: {}x{}",
        loaded.definition.size.width, loaded.definition.size.height
    );
    print_mesh("Ground", &compiled.ground);
    print_mesh("Water", &compiled.water);

    Ok(())
}

fn print_mesh(label: &str, mesh: &Mesh) {
    println!(
        "{}: {} triangles, {} vertices",
        label,
        mesh.triangle_count(),
        mesh.vertices.len()
    );
    if let Some((min, max)) = mesh.bounds() {
        println!(
            "  bounds: ({:.3}, {:.3}, {:.3}) .. ({:.3}, {:.3}, {:.3})",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
    }
}
