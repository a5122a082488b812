//! Headless host: streams a world around an observer walking in a straight line.
#![forbid(unsafe_code)]

use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use loam_blocks::BlockRegistry;
use loam_geom::{IVec3, Vec3};
use loam_runtime::{ChunkManager, RenderUpdate, StreamConfig};
use loam_world::{World, WorldGenConfig, WorldGenParams};

#[derive(Parser, Debug)]
#[command(name = "loam", about = "Chunked voxel world streaming demo")]
struct Args {
    /// World generation and streaming config (TOML)
    #[arg(long, default_value = "assets/worldgen.toml")]
    worldgen: PathBuf,
    /// Block registry (TOML)
    #[arg(long, default_value = "assets/blocks.toml")]
    blocks: PathBuf,
    /// Override the world seed
    #[arg(long, allow_hyphen_values = true)]
    seed: Option<i32>,
    /// Number of simulation steps after the initial window
    #[arg(long, default_value_t = 64)]
    ticks: u32,
    /// Observer movement along +x per step, in blocks
    #[arg(long, default_value_t = 4.0)]
    step: f32,
    /// Override the view distance in chunks
    #[arg(long)]
    view_distance: Option<i32>,
}

#[derive(Default, Debug)]
struct Tally {
    uploads: usize,
    shown: usize,
    hidden: usize,
    evicted: usize,
}

impl Tally {
    fn absorb(&mut self, updates: &[RenderUpdate]) {
        for u in updates {
            match u {
                RenderUpdate::Upload(_) => self.uploads += 1,
                RenderUpdate::Show(_) => self.shown += 1,
                RenderUpdate::Hide(_) => self.hidden += 1,
                RenderUpdate::Evict(_) => self.evicted += 1,
            }
        }
    }
}

fn active_quads(manager: &ChunkManager) -> usize {
    manager
        .active_chunks()
        .filter_map(|c| manager.chunk(c))
        .map(|c| c.mesh().quad_count())
        .sum()
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let reg = Arc::new(BlockRegistry::load_from_path(&args.blocks)?);
    log::info!("loaded {} blocks from {}", reg.len(), args.blocks.display());

    let text = fs::read_to_string(&args.worldgen)?;
    let mut wg = WorldGenConfig::from_toml_str(&text)?;
    if let Some(seed) = args.seed {
        wg.world.seed = seed;
    }
    let params = WorldGenParams::from_config(&wg)?;
    let world = Arc::new(World::validated(params, &reg)?);

    let mut stream = StreamConfig::from_toml_str(&text)?;
    if let Some(r) = args.view_distance {
        stream.view_distance = r;
        stream = stream.validate()?;
    }

    let mut manager = ChunkManager::new(Arc::clone(&world), Arc::clone(&reg), stream);
    let mut observer = Vec3::new(0.5, world.chunk_height as f32, 0.5);
    let mut tally = Tally::default();

    let t0 = Instant::now();
    let initial = manager.generate_initial(observer);
    tally.absorb(&manager.drain_render_updates());
    log::info!(
        "initial: {} chunks (+{} spilled), {} quads, {:?}",
        initial.window.len(),
        initial.spilled.len(),
        active_quads(&manager),
        t0.elapsed()
    );

    let mut created = 0usize;
    let t1 = Instant::now();
    for _ in 0..args.ticks {
        observer.x += args.step;
        manager.update_streaming(observer);
        created += manager.tick().built.len();
        tally.absorb(&manager.drain_render_updates());
    }

    // Dig out the surface block under the observer.
    let (x, z) = (observer.x.floor() as i32, observer.z.floor() as i32);
    let surface = world.terrain_height(x, z);
    let air = world.blocks.air;
    let rebuilt = manager.edit_voxel(IVec3::new(x, surface, z), air);
    tally.absorb(&manager.drain_render_updates());
    log::info!("dug ({x}, {surface}, {z}); rebuilt {} chunks", rebuilt.len());

    let edits = manager.edit_stats();
    log::info!(
        "after {} steps in {:?}: {} created, {} still queued, {} loaded, {} active, {} quads",
        args.ticks,
        t1.elapsed(),
        created,
        manager.pending_creations(),
        manager.chunk_count(),
        manager.active_count(),
        active_quads(&manager)
    );
    log::info!(
        "render updates: {} uploads, {} shown, {} hidden, {} evicted; {} edits across {} chunks",
        tally.uploads,
        tally.shown,
        tally.hidden,
        tally.evicted,
        edits.block_edits,
        edits.chunk_entries
    );
    Ok(())
}
