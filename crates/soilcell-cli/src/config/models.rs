use soilcell::core::models::facility::FacilityParameters;
use soilcell::engine::config::OptimizeConfig;

/// Fully merged configuration handed to a command.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub facility: FacilityParameters,
    pub optimize: OptimizeConfig,
}
