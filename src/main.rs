use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use city_traffic::simulation::{Simulation, FRAMERATE};

#[derive(Parser)]
#[command(name = "city_traffic")]
#[command(about = "Headless city traffic sandbox")]
struct Cli {
    /// Number of simulation ticks to run
    #[arg(long, default_value = "600")]
    ticks: u32,

    /// Time delta per tick in seconds (defaults to one frame)
    #[arg(long)]
    delta: Option<f64>,

    /// Probability of spawning a vehicle at each road joint
    #[arg(long, default_value = "0.5")]
    density: f64,

    /// Probability of spawning a pedestrian at each sidewalk joint
    #[arg(long, default_value = "0.25")]
    pedestrian_density: f64,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Print a summary every this many ticks (0 disables)
    #[arg(long, default_value = "60")]
    summary_every: u32,

    /// Also draw a text map with each summary
    #[arg(long)]
    draw_map: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let delta = cli.delta.unwrap_or(1.0 / f64::from(FRAMERATE));

    let mut world = match cli.seed {
        Some(seed) => Simulation::create_test_world_with_seed(seed),
        None => Simulation::create_test_world(),
    }
    .context("Failed to build the test city")?;

    info!("Ticks: {}, Delta: {:.4}s", cli.ticks, delta);
    world.spawn_agents(cli.density);
    world.spawn_pedestrians(cli.pedestrian_density);

    println!("Initial state:");
    report(&world, cli.draw_map);

    for tick in 1..=cli.ticks {
        world.update(delta);

        if cli.summary_every > 0 && tick % cli.summary_every == 0 {
            println!("--- After tick {} ({:.1}s simulated time) ---", tick, world.time);
            report(&world, cli.draw_map);
        }
    }

    let stats = world.stats();
    info!("=== SIMULATION COMPLETE ===");
    info!("Elapsed time: {:.2}s", world.time);
    info!("Total agents spawned: {}", stats.agents_spawned);
    info!("Active agents: {}", world.active_agent_count());
    info!("Crashed agents: {}", stats.crashes);
    info!("Routes assigned: {}", stats.routes_assigned);
    info!("Unreachable route attempts: {}", stats.routes_unreachable);
    info!("Road joints: {}", world.roads().n_joints());
    info!("Sidewalk joints: {}", world.sidewalks().n_joints());

    Ok(())
}

fn report(world: &Simulation, draw_map: bool) {
    world.print_summary();
    if draw_map {
        println!("{}", world.draw_map(32.0));
    }
    println!();
}
