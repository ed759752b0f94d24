// btbphylo-core/src/infrastructure/config/filter.rs

use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::domain::error::DomainError;
use crate::domain::filter::FilterSpec;
use crate::error::PhyloError;
use crate::infrastructure::error::InfrastructureError;

/// Loads a persisted filter: a JSON object, or YAML for `.yaml`/`.yml` files,
/// mapping column names to `[min, max]` or lists of values.
pub fn load_filter_spec(path: &Path) -> Result<FilterSpec, PhyloError> {
    if !path.exists() {
        return Err(InfrastructureError::NotFound(path.to_path_buf()).into());
    }
    let content = fs::read_to_string(path)?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    );
    let config: BTreeMap<String, JsonValue> = if is_yaml {
        serde_yaml::from_str(&content).map_err(InfrastructureError::YamlError)?
    } else {
        serde_json::from_str(&content).map_err(InfrastructureError::JsonError)?
    };
    info!(path = ?path, constraints = config.len(), "Filter config loaded");
    Ok(FilterSpec::from_config(&config)?)
}

/// Inline criteria or a config file, never both.
pub fn resolve_filter_spec(
    inline: FilterSpec,
    config: Option<&Path>,
) -> Result<FilterSpec, PhyloError> {
    match config {
        None => Ok(inline),
        Some(_) if !inline.is_empty() => Err(DomainError::ConflictingArguments {
            arguments: inline.keys(),
        }
        .into()),
        Some(path) => load_filter_spec(path),
    }
}
