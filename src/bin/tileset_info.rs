use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tiled_tileset_catalog::{LoadOptions, TilesetCatalog};

/// Print a summary of Tiled tileset descriptors.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// Fail when an animation frame references a tile missing from its tileset
    #[arg(long)]
    strict_frames: bool,
    /// Dump the whole catalog as JSON instead of one line per tileset
    #[arg(long)]
    json: bool,
    /// Tileset files (.tsx, .tsj, .json) or directories containing them
    #[arg(required = true)]
    paths: Vec<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let mut catalog =
        TilesetCatalog::with_options(LoadOptions::default().strict_frames(args.strict_frames));
    for path in &args.paths {
        if path.is_dir() {
            catalog
                .load_dir(path)
                .with_context(|| format!("Loading tilesets from {}", path.display()))?;
        } else {
            catalog
                .load_file(path)
                .with_context(|| format!("Loading tileset {}", path.display()))?;
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&catalog)?);
        return Ok(());
    }

    for ts in catalog.iter() {
        println!(
            "{}: {} tiles ({} declared), {}x{}, {} animated, {} dangling frames",
            ts.name(),
            ts.tiles().len(),
            ts.tile_count(),
            ts.tile_width(),
            ts.tile_height(),
            ts.animated_tiles().count(),
            ts.dangling_frames().len()
        );
    }
    Ok(())
}
