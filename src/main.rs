/* 3rd party libraries */
use clap::{Arg, Command};
use crossbeam_channel as cbc;
use log::{error, info};
use std::thread::Builder;
use std::time::Duration;

/* Custom libraries */
use shared::BuildingSnapshot;
use sim::Simulation;

/* Modules */
mod building;
mod config;
mod elevator;
mod shared;
mod sim;

/// Ticks between snapshots handed to the observer thread.
const SNAPSHOT_EVERY: u64 = 20;

/* Main */
fn main() -> std::io::Result<()> {
    env_logger::init();

    let matches = Command::new("elevator-sim")
        .about("Multi-elevator building simulation")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .takes_value(true)
                .default_value("config.toml")
                .help("Path to the configuration file"),
        )
        .arg(
            Arg::new("ticks")
                .short('t')
                .long("ticks")
                .takes_value(true)
                .help("Number of ticks to run (overrides the configuration)"),
        )
        .arg(
            Arg::new("seed")
                .short('s')
                .long("seed")
                .takes_value(true)
                .help("Traffic generator seed (overrides the configuration)"),
        )
        .arg(Arg::new("fast").long("fast").help("Run unpaced, ignoring tick_ms"))
        .get_matches();

    // Load the configuration
    let mut config =
        crate::unwrap_or_exit!(config::load_config(matches.value_of("config").unwrap()));
    if let Some(ticks) = matches.value_of("ticks") {
        config.simulation.n_ticks = crate::unwrap_or_exit!(ticks.parse());
    }
    if let Some(seed) = matches.value_of("seed") {
        config.simulation.seed = crate::unwrap_or_exit!(seed.parse());
    }
    let fast = matches.is_present("fast");

    // Create the simulation
    let mut sim = Simulation::new(&config);
    sim.init();

    // Start the observer thread. It stands in for the renderer: it reads
    // snapshots and emits them as JSON lines, and never mutates state.
    let (state_tx, state_rx) = cbc::unbounded::<BuildingSnapshot>();
    let observer_thread = Builder::new().name("observer".into());
    let observer_handle = observer_thread.spawn(move || {
        for snapshot in state_rx.iter() {
            match serde_json::to_string(&snapshot) {
                Ok(line) => info!(target: "snapshot", "{}", line),
                Err(e) => error!("failed to serialize snapshot: {}", e),
            }
        }
    })?;

    // Main loop
    info!(
        "running {} ticks ({} floors, {} elevators)",
        config.simulation.n_ticks, config.building.n_floors, config.building.n_elevators
    );
    let ticker = cbc::tick(Duration::from_millis(config.simulation.tick_ms));
    for _ in 0..config.simulation.n_ticks {
        if !fast {
            let _ = ticker.recv();
        }
        sim.step();
        if sim.tick() % SNAPSHOT_EVERY == 0 {
            let _ = state_tx.send(sim.snapshot());
        }
    }

    info!(
        "simulation finished: {} delivered, {} waiting, {} riding",
        sim.building().n_delivered(),
        sim.building().n_waiting(),
        sim.building().n_riding()
    );

    drop(state_tx);
    let _ = observer_handle.join();

    Ok(())
}
