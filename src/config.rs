/***************************************/
/*        3rd party libraries          */
/***************************************/
use anyhow::Context;
use serde::Deserialize;
use std::fs;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::elevator::fsm::{DEFAULT_MAX_ACCEL, DEFAULT_MAX_OCCUPANTS, DEFAULT_MAX_VEL};

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Deserialize, Clone)]
pub struct Config {
    pub simulation: SimulationConfig,
    pub building: BuildingConfig,
    pub elevator: ElevatorConfig,
}

#[derive(Deserialize, Clone)]
pub struct SimulationConfig {
    pub tick_ms: u64,
    pub n_ticks: u64,
    pub seed: u64,
    pub arrival_probability: f64,
}

#[derive(Deserialize, Clone)]
pub struct BuildingConfig {
    pub n_floors: u8,
    pub n_elevators: u8,
    pub floor_height: f64,
}

#[derive(Deserialize, Clone)]
pub struct ElevatorConfig {
    #[serde(default = "default_max_vel")]
    pub max_vel: f64,
    #[serde(default = "default_max_accel")]
    pub max_accel: f64,
    #[serde(default = "default_max_occupants")]
    pub max_occupants: usize,
}

fn default_max_vel() -> f64 {
    DEFAULT_MAX_VEL
}

fn default_max_accel() -> f64 {
    DEFAULT_MAX_ACCEL
}

fn default_max_occupants() -> usize {
    DEFAULT_MAX_OCCUPANTS
}

/***************************************/
/*             Public API              */
/***************************************/
pub fn load_config(path: &str) -> anyhow::Result<Config> {
    let config_str = fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration file '{}'", path))?;
    let config: Config =
        toml::from_str(&config_str).context("failed to parse configuration file")?;

    // Limits must be usable by the profile generator; a zero cap would make
    // every journey infeasible.
    anyhow::ensure!(config.elevator.max_vel > 0.0, "elevator.max_vel must be positive");
    anyhow::ensure!(config.elevator.max_accel > 0.0, "elevator.max_accel must be positive");
    anyhow::ensure!(config.building.floor_height > 0.0, "building.floor_height must be positive");
    anyhow::ensure!(config.building.n_floors >= 2, "building.n_floors must be at least 2");
    anyhow::ensure!(config.building.n_elevators >= 1, "building.n_elevators must be at least 1");
    anyhow::ensure!(
        (0.0..=1.0).contains(&config.simulation.arrival_probability),
        "simulation.arrival_probability must be in [0, 1]"
    );

    Ok(config)
}
