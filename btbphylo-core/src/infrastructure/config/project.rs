// btbphylo-core/src/infrastructure/config/project.rs

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};
use validator::Validate;

use crate::domain::project::PipelineConfig;
use crate::infrastructure::error::InfrastructureError;

const CONFIG_CANDIDATES: [&str; 2] = ["btbphylo.yaml", "btbphylo.yml"];

#[instrument(skip(project_dir))]
pub fn load_project_config(project_dir: &Path) -> Result<PipelineConfig, InfrastructureError> {
    // 1. Locate the main file
    let config_path = find_main_config(project_dir)?;
    info!(path = ?config_path, "Loading project configuration");

    // 2. Parse YAML
    let content = fs::read_to_string(&config_path)?;
    let mut config: PipelineConfig = serde_yaml::from_str(&content)?;

    // 3. Environment overrides (BTBPHYLO_RESULTS_PATH=/tmp/out btbphylo view-bovine)
    apply_env_overrides(&mut config);

    // 4. Validate once everything is layered
    config
        .validate()
        .map_err(|e| InfrastructureError::ConfigError(format!("{}: {e}", config_path.display())))?;

    Ok(config)
}

fn find_main_config(root: &Path) -> Result<PathBuf, InfrastructureError> {
    for filename in CONFIG_CANDIDATES {
        let p = root.join(filename);
        if p.exists() {
            return Ok(p);
        }
    }
    Err(InfrastructureError::ConfigNotFound(format!(
        "No configuration file found in {:?}. Checked: {:?}",
        root, CONFIG_CANDIDATES
    )))
}

fn apply_env_overrides(config: &mut PipelineConfig) {
    if let Ok(val) = std::env::var("BTBPHYLO_RESULTS_PATH") {
        info!(old = ?config.results_path, new = ?val, "Overriding results path via ENV");
        config.results_path = val;
    }
    if let Ok(val) = std::env::var("BTBPHYLO_SUMMARY_PATH") {
        info!(old = ?config.summary_path, new = ?val, "Overriding summary path via ENV");
        config.summary_path = val;
    }
}
