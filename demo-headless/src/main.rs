mod landscape;
mod render;

use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use wildfire_ca_core::{ExecutionMode, SimulationConfig, WildfireSimulation};

/// Wildfire cellular automaton demo with configurable parameters
#[derive(Parser, Debug)]
#[command(name = "wildfire-demo")]
#[command(about = "Headless wildfire cellular automaton demo", long_about = None)]
struct Args {
    /// TOML file with `SimulationConfig` overrides
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Input image (classified into forest and empty ground); a synthetic
    /// landscape is generated when omitted
    #[arg(short = 'i', long)]
    image: Option<PathBuf>,

    /// Grid width in cells (overrides the config file)
    #[arg(long)]
    width: Option<usize>,

    /// Grid height in cells (overrides the config file)
    #[arg(long)]
    height: Option<usize>,

    /// Number of generations to run
    #[arg(short, long, default_value_t = 120)]
    ticks: u64,

    /// Seed for a reproducible run
    #[arg(short, long)]
    seed: Option<u64>,

    /// Multiplier on the spontaneous ignition probability
    #[arg(long)]
    scale: Option<f64>,

    /// Classify vegetation without the saturation floor
    #[arg(long)]
    no_saturation_floor: bool,

    /// Step rows sequentially instead of across the thread pool
    #[arg(long)]
    sequential: bool,

    /// Wait the configured tick interval between generations
    #[arg(long)]
    realtime: bool,

    /// Write PNG frames into this directory
    #[arg(long)]
    frames: Option<PathBuf>,

    /// Write a frame every N generations
    #[arg(long, default_value_t = 10)]
    frame_every: u64,

    /// Report interval in generations
    #[arg(short, long, default_value_t = 10)]
    report_interval: u64,
}

fn load_config(args: &Args) -> Result<SimulationConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => toml::from_str::<SimulationConfig>(&std::fs::read_to_string(path)?)?,
        None => SimulationConfig::default(),
    };

    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    if let Some(scale) = args.scale {
        config.scale_factor = scale;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.no_saturation_floor {
        config.classifier.min_tree_saturation = None;
    }
    if args.sequential {
        config.execution = ExecutionMode::Sequential;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;

    println!("=== Wildfire Cellular Automaton Demo ===\n");

    let raster = match &args.image {
        Some(path) => {
            println!("Loading {}", path.display());
            landscape::load_image(path, config.width, config.height)?
        }
        None => {
            println!("Generating synthetic {}x{} landscape", config.width, config.height);
            landscape::synthetic(config.width, config.height)?
        }
    };
    // Frames are painted over the same pre-pass the classifier saw
    let source = raster.sharpened(config.sharpen_amount)?;

    let mut sim = WildfireSimulation::from_raster(config, &raster)?;
    let stats = sim.stats();
    println!(
        "Classified {} trees, {} empty cells (total fuel {:.0})",
        stats.counts.tree, stats.counts.empty, stats.total_fuel
    );
    println!(
        "Scale factor {}, seed {:?}, {:?} stepping\n",
        config.scale_factor, config.seed, config.execution
    );

    if let Some(dir) = &args.frames {
        std::fs::create_dir_all(dir)?;
    }

    println!(" Gen | Trees | Recovering | Burning | Burned | Markers | Fuel");
    println!("-----|-------|------------|---------|--------|---------|----------");

    let started = Instant::now();
    let mut total_ignitions = 0usize;
    let mut peak_burning = 0usize;

    for _ in 0..args.ticks {
        let tick_started = Instant::now();

        if let Some(dir) = &args.frames {
            if sim.generation() % args.frame_every.max(1) == 0 {
                let frame = render::render_frame(
                    sim.grid(),
                    &source,
                    &sim.ignition_log().markers(),
                    config.transition.ignition_fuel_ratio,
                );
                render::save_frame(&frame, dir, sim.generation())?;
            }
        }
        sim.advance_markers();

        let report = sim.tick();
        total_ignitions += report.new_ignitions.len();

        let stats = sim.stats();
        peak_burning = peak_burning.max(stats.counts.burning);
        if report.generation % args.report_interval.max(1) == 0 {
            println!(
                "{:4} | {:5} | {:10} | {:7} | {:6} | {:7} | {:8.0}",
                stats.generation,
                stats.counts.tree,
                stats.recovering,
                stats.counts.burning,
                stats.counts.burned,
                stats.active_markers,
                stats.total_fuel
            );
        }

        if args.realtime {
            let interval = config.tick_interval();
            if let Some(remaining) = interval.checked_sub(tick_started.elapsed()) {
                std::thread::sleep(remaining);
            }
        }
    }

    let elapsed = started.elapsed();
    info!(
        generations = sim.generation(),
        elapsed_ms = elapsed.as_millis() as u64,
        "run complete"
    );

    println!("\n=== Simulation Complete ===");
    println!("Generations: {}", sim.generation());
    println!("Spontaneous ignitions: {}", total_ignitions);
    println!("Peak burning cells: {}", peak_burning);
    println!(
        "Average step time: {:.2} ms",
        elapsed.as_secs_f64() * 1000.0 / args.ticks.max(1) as f64
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saturation_floor_flag() {
        let args = Args::try_parse_from(["wildfire-demo"]).unwrap();
        let config = load_config(&args).unwrap();
        assert!(config.classifier.min_tree_saturation.is_some());

        let args =
            Args::try_parse_from(["wildfire-demo", "--no-saturation-floor", "--sequential"])
                .unwrap();
        let config = load_config(&args).unwrap();
        assert_eq!(config.classifier.min_tree_saturation, None);
        assert_eq!(config.execution, ExecutionMode::Sequential);
    }
}
