use std::path::Path;

use crate::api::simulation_config_dto::SimulationConfigDto;
use crate::domain::cluster_model::config::SimulationConfig;
use crate::domain::cluster_model::policy_type::PolicyType;
use crate::domain::simulator::simulator::{RunSummary, Simulation};
use crate::error::Result;
use crate::loader::parser::parse_json_file;

pub mod api;
pub mod domain;
pub mod error;
pub mod loader;
pub mod logger;

/// Loads and validates a simulation config from a JSON file.
///
/// A `policy` given here wins over the one named in the file.
pub fn load_config(file_path: impl AsRef<Path>, policy: Option<PolicyType>) -> Result<SimulationConfig> {
    let dto: SimulationConfigDto = parse_json_file(file_path)?;
    log::info!("JSON config parsed successfully.");

    let config = SimulationConfig::try_from((dto, policy))?;
    log::info!("Simulation config for policy '{}' validated.", config.policy);

    Ok(config)
}

/// Runs a full simulation with the given config.
pub fn run_simulation(config: SimulationConfig) -> RunSummary {
    Simulation::new(config).run()
}
