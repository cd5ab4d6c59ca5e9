use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use layermc_benchmark::GenerationMetrics;
use layermc_gen::{ColumnAction, EdgeGradientEngine, GenerationConfig, GenerationMode, Region};
use layermc_storage::{FileBackend, PlantRestorationStore};

mod setup;
mod snapshot;

use setup::MappingKind;
use snapshot::Snapshot;

#[derive(Parser)]
#[command(name = "layermc", about = "Edge-gradient layer generation for Minecraft terrain snapshots")]
pub struct Args {
    /// Directory holding block_mappings.json and plant_mappings.json
    #[arg(long, env = "LAYERMC_CONFIG_DIR", default_value = "config/layermc")]
    pub config_dir: PathBuf,

    /// Directory holding the plant restoration data
    #[arg(long, env = "LAYERMC_DATA_DIR", default_value = ".")]
    pub data_dir: PathBuf,

    /// Newline-separated list of known block ids. Without it every well-formed id is accepted.
    #[arg(long)]
    pub registry: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Place layers around terrain edges in a world snapshot
    Generate {
        /// World snapshot JSON, updated in place
        #[arg(long)]
        world: PathBuf,

        /// First corner column as X,Z
        #[arg(long, value_parser = parse_column)]
        from: (i32, i32),

        /// Opposite corner column as X,Z (inclusive)
        #[arg(long, value_parser = parse_column)]
        to: (i32, i32),

        #[arg(long, default_value_t = GenerationMode::Basic)]
        mode: GenerationMode,

        #[arg(long, default_value_t = 7)]
        max_distance: u32,

        #[arg(long, default_value_t = 1)]
        threshold: u32,

        /// Print the planned changes without writing the world or plant data
        #[arg(long)]
        dry_run: bool,
    },
    /// Forget every recorded plant
    ClearPlants,
    /// Show plant data and mapping counts
    Stats,
    /// Add or replace a mapping and write it to the config file
    RegisterMapping {
        #[arg(long, value_enum)]
        kind: MappingKind,

        /// Vanilla block or plant id
        from: String,

        /// Layer block or decorative plant id
        to: String,
    },
}

fn parse_column(s: &str) -> Result<(i32, i32), String> {
    let (x, z) = s.split_once(',').ok_or_else(|| format!("expected X,Z, got {:?}", s))?;
    let x = x.trim().parse().map_err(|e| format!("bad X in {:?}: {}", s, e))?;
    let z = z.trim().parse().map_err(|e| format!("bad Z in {:?}: {}", s, e))?;
    Ok((x, z))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let benchmark = if std::env::var("BENCHMARK").is_ok() {
        println!("BENCHMARK MODE ENABLED");
        Some(Arc::new(GenerationMetrics::new()))
    } else {
        None
    };

    run(&args, benchmark.clone())?;

    if let Some(bench) = benchmark {
        println!("{}", bench.generate_report());
    }
    Ok(())
}

fn run(args: &Args, benchmark: Option<Arc<GenerationMetrics>>) -> Result<()> {
    log::info!("Config directory: {:?}, data directory: {:?}", args.config_dir, args.data_dir);
    let mut store = PlantRestorationStore::open(FileBackend::in_dir(&args.data_dir));

    match &args.command {
        Command::Generate {
            world,
            from,
            to,
            mode,
            max_distance,
            threshold,
            dry_run,
        } => {
            let config = GenerationConfig {
                mode: *mode,
                max_layer_distance: *max_distance,
                edge_height_threshold: *threshold,
            };
            let region = Region::from_corners(*from, *to);
            generate(args, &mut store, world, region, config, *dry_run, benchmark)
        }
        Command::ClearPlants => {
            let count = store.len();
            if !store.clear() {
                bail!("Failed to clear plant data in {:?}", args.data_dir);
            }
            println!("Cleared {} plant entries", count);
            Ok(())
        }
        Command::Stats => {
            let registry = setup::load_registry(args.registry.as_deref())?;
            let (layers, plants) = setup::load_resolvers(&args.config_dir, registry)?;
            println!("Recorded plants: {}", store.len());
            println!("Layer mappings: {}", layers.table().len());
            println!("Plant mappings: {}", plants.len());
            Ok(())
        }
        Command::RegisterMapping { kind, from, to } => {
            let registry = setup::load_registry(args.registry.as_deref())?;
            setup::register_mapping(&args.config_dir, registry.as_ref(), *kind, from, to)?;
            println!("Registered {} mapping {} -> {}", kind, from, to);
            Ok(())
        }
    }
}

fn generate(
    args: &Args,
    store: &mut PlantRestorationStore,
    world_path: &Path,
    region: Region,
    config: GenerationConfig,
    dry_run: bool,
    benchmark: Option<Arc<GenerationMetrics>>,
) -> Result<()> {
    // 1. Mappings
    let registry = setup::load_registry(args.registry.as_deref())?;
    let (layers, plants) = setup::load_resolvers(&args.config_dir, registry.clone())?;
    let engine = EdgeGradientEngine::new(layers, plants, registry).with_benchmark(benchmark);

    // 2. World
    let mut world = Snapshot::load(world_path)?.into_world();
    println!(
        "Generating {} layers over {} columns ({}x{} from {},{})",
        config.mode,
        region.area(),
        region.width,
        region.depth,
        region.min_x,
        region.min_z
    );

    // 3. Run
    if dry_run {
        let plan = engine.plan(&world, store, region, config);
        for action in plan.actions.iter().filter(|a| !matches!(a, ColumnAction::Unchanged { .. })) {
            println!("{:?}", action);
        }
        println!("Dry run: {}", plan.report);
        return Ok(());
    }

    let report = engine.generate(&mut world, store, region, config);

    // 4. Persist, plant records first: a saved world without them loses the swapped plants
    store
        .try_save()
        .with_context(|| format!("Failed to save plant data in {:?}", args.data_dir))?;
    Snapshot::from_world(&world).save(world_path)?;
    println!("{}", report);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use layermc_gen::{MemoryWorld, TerrainView, World};
    use layermc_registry::Identifier;
    use layermc_storage::BlockPos;

    fn id(s: &str) -> Identifier {
        Identifier::parse(s).unwrap()
    }

    #[test]
    fn test_parse_column() {
        assert_eq!(parse_column("10,-4"), Ok((10, -4)));
        assert_eq!(parse_column(" 3 , 5 "), Ok((3, 5)));
        assert!(parse_column("10").is_err());
        assert!(parse_column("a,b").is_err());
    }

    #[test]
    fn test_cli_parses_generate() {
        let args = Args::try_parse_from([
            "layermc", "--data-dir", "/tmp/x", "generate", "--world", "w.json", "--from", "0,0", "--to", "15,15",
            "--mode", "smooth",
        ])
        .unwrap();
        match args.command {
            Command::Generate { from, to, mode, max_distance, dry_run, .. } => {
                assert_eq!(from, (0, 0));
                assert_eq!(to, (15, 15));
                assert_eq!(mode, GenerationMode::Smooth);
                assert_eq!(max_distance, 7);
                assert!(!dry_run);
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_generate_updates_world_and_plant_data() {
        let dir = tempfile::tempdir().unwrap();
        let world_path = dir.path().join("world.json");

        let region = Region::new(0, 0, 6, 1);
        let mut world = MemoryWorld::flat(region, 64, &id("minecraft:grass_block"));
        world.set_column(0, 0, 66, &id("minecraft:stone"));
        world.set_block(BlockPos::new(2, 65, 0), &id("minecraft:fern"));
        Snapshot::from_world(&world).save(&world_path).unwrap();

        let args = Args::try_parse_from([
            "layermc",
            "--config-dir",
            dir.path().join("config").to_str().unwrap(),
            "--data-dir",
            dir.path().to_str().unwrap(),
            "generate",
            "--world",
            world_path.to_str().unwrap(),
            "--from",
            "0,0",
            "--to",
            "5,0",
        ])
        .unwrap();
        run(&args, None).unwrap();

        let world = Snapshot::load(&world_path).unwrap().into_world();
        // default mappings with an open registry
        assert_eq!(world.block_at(BlockPos::new(1, 65, 0)), id("conquest:grass_layer"));
        assert_eq!(world.layer_count(BlockPos::new(1, 65, 0)), Some(7));
        assert_eq!(world.block_at(BlockPos::new(2, 66, 0)), id("conquest:fern"));

        let store = PlantRestorationStore::open(FileBackend::in_dir(dir.path()));
        assert_eq!(store.get_plant(BlockPos::new(2, 65, 0)), Some(id("minecraft:fern")));
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let world_path = dir.path().join("world.json");

        let region = Region::new(0, 0, 4, 1);
        let mut world = MemoryWorld::flat(region, 64, &id("minecraft:grass_block"));
        world.set_column(0, 0, 65, &id("minecraft:stone"));
        world.set_block(BlockPos::new(1, 65, 0), &id("minecraft:fern"));
        Snapshot::from_world(&world).save(&world_path).unwrap();
        let before = std::fs::read_to_string(&world_path).unwrap();

        let args = Args::try_parse_from([
            "layermc",
            "--config-dir",
            dir.path().join("config").to_str().unwrap(),
            "--data-dir",
            dir.path().to_str().unwrap(),
            "generate",
            "--world",
            world_path.to_str().unwrap(),
            "--from",
            "0,0",
            "--to",
            "3,0",
            "--dry-run",
        ])
        .unwrap();
        run(&args, None).unwrap();

        assert_eq!(std::fs::read_to_string(&world_path).unwrap(), before);
        assert!(!dir.path().join(layermc_storage::PLANTS_FILE).exists());
    }

    #[test]
    fn test_clear_plants() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = PlantRestorationStore::open(FileBackend::in_dir(dir.path()));
        store.store_plant(BlockPos::new(1, 2, 3), &id("minecraft:fern"));
        assert!(store.save());

        let args = Args::try_parse_from(["layermc", "--data-dir", dir.path().to_str().unwrap(), "clear-plants"]).unwrap();
        run(&args, None).unwrap();

        let store = PlantRestorationStore::open(FileBackend::in_dir(dir.path()));
        assert!(store.is_empty());
    }

    #[test]
    fn test_failed_plant_save_leaves_world_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let world_path = dir.path().join("world.json");

        let region = Region::new(0, 0, 4, 1);
        let mut world = MemoryWorld::flat(region, 64, &id("minecraft:grass_block"));
        world.set_column(0, 0, 65, &id("minecraft:stone"));
        world.set_block(BlockPos::new(1, 65, 0), &id("minecraft:fern"));
        Snapshot::from_world(&world).save(&world_path).unwrap();
        let before = std::fs::read_to_string(&world_path).unwrap();

        // A directory where the temp file goes makes the plant data write fail
        let temp = dir.path().join(format!("{}.tmp", layermc_storage::PLANTS_FILE));
        std::fs::create_dir(&temp).unwrap();

        let args = Args::try_parse_from([
            "layermc",
            "--config-dir",
            dir.path().join("config").to_str().unwrap(),
            "--data-dir",
            dir.path().to_str().unwrap(),
            "generate",
            "--world",
            world_path.to_str().unwrap(),
            "--from",
            "0,0",
            "--to",
            "3,0",
        ])
        .unwrap();
        assert!(run(&args, None).is_err());

        assert_eq!(std::fs::read_to_string(&world_path).unwrap(), before);
        let world = Snapshot::load(&world_path).unwrap().into_world();
        assert_eq!(world.block_at(BlockPos::new(1, 65, 0)), id("minecraft:fern"));
    }

    #[test]
    fn test_register_mapping_command() {
        let dir = tempfile::tempdir().unwrap();
        let config_dir = dir.path().join("config");
        let args = Args::try_parse_from([
            "layermc",
            "--config-dir",
            config_dir.to_str().unwrap(),
            "--data-dir",
            dir.path().to_str().unwrap(),
            "register-mapping",
            "--kind",
            "plant",
            "minecraft:azure_bluet",
            "conquest:azure_bluet",
        ])
        .unwrap();
        run(&args, None).unwrap();

        let (_, plants) = setup::load_resolvers(&config_dir, Arc::new(layermc_registry::OpenRegistry)).unwrap();
        assert_eq!(
            plants.to_decorative(&id("minecraft:azure_bluet")),
            Some(id("conquest:azure_bluet"))
        );
    }
}
