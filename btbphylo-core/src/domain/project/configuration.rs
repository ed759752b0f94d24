// btbphylo-core/src/domain/project/configuration.rs

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use validator::Validate;

use crate::domain::dedup::{TieBreak, default_rules};
use crate::domain::error::DomainError;
use crate::domain::filter::FilterSpec;
use crate::domain::thresholds::{DEFAULT_QUANTILE, default_excluded_clades};

/// Contents of `btbphylo.yaml`. Relative paths resolve against the project dir.
#[derive(Debug, Deserialize, Serialize, Validate, Clone, PartialEq)]
pub struct PipelineConfig {
    #[serde(default = "default_name")]
    #[validate(length(min = 1, message = "Project name cannot be empty"))]
    pub name: String,

    #[serde(rename = "results-path", default = "default_results_path")]
    pub results_path: String,

    #[serde(rename = "summary-path", default = "default_summary_path")]
    pub summary_path: String,

    /// Local directory of sequencing batches holding `*FinalOut*.csv` files.
    #[serde(rename = "batches-path", default)]
    pub batches_path: Option<String>,

    #[serde(rename = "cattle-path", default = "default_cattle_path")]
    pub cattle_path: String,

    #[serde(rename = "movement-path", default = "default_movement_path")]
    pub movement_path: String,

    #[serde(rename = "clade-info-path", default = "default_clade_info_path")]
    pub clade_info_path: String,

    #[serde(default = "default_quantile")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub quantile: f64,

    #[serde(rename = "exclude-clades", default = "default_excluded_clades")]
    pub exclude_clades: Vec<String>,

    #[serde(default = "default_rules")]
    #[validate(length(min = 1, message = "At least one tie-break rule is required"))]
    pub dedup: Vec<TieBreak>,

    /// Global quality filter, `column -> [min, max] | [values]`.
    #[serde(default = "default_filters")]
    pub filters: BTreeMap<String, JsonValue>,

    #[serde(default)]
    pub eartags: Option<EartagConfig>,

    /// Maximum number of clade filter passes running at once.
    #[serde(default = "default_concurrency")]
    #[validate(range(min = 1))]
    pub concurrency: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct EartagConfig {
    #[serde(rename = "cattle-column", default = "default_eartag_column")]
    pub cattle_column: String,
    #[serde(rename = "movement-column", default = "default_eartag_column")]
    pub movement_column: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            results_path: default_results_path(),
            summary_path: default_summary_path(),
            batches_path: None,
            cattle_path: default_cattle_path(),
            movement_path: default_movement_path(),
            clade_info_path: default_clade_info_path(),
            quantile: default_quantile(),
            exclude_clades: default_excluded_clades(),
            dedup: default_rules(),
            filters: default_filters(),
            eartags: None,
            concurrency: default_concurrency(),
        }
    }
}

impl PipelineConfig {
    pub fn filter_spec(&self) -> Result<FilterSpec, DomainError> {
        FilterSpec::from_config(&self.filters)
    }

    pub fn resolve(&self, project_dir: &Path, relative: &str) -> PathBuf {
        project_dir.join(relative)
    }
}

fn default_name() -> String {
    "btb-phylo".to_string()
}
fn default_results_path() -> String {
    "results".to_string()
}
fn default_summary_path() -> String {
    "all_wgs_samples.csv".to_string()
}
fn default_cattle_path() -> String {
    "cattle.csv".to_string()
}
fn default_movement_path() -> String {
    "movement.csv".to_string()
}
fn default_clade_info_path() -> String {
    "CladeInfo.csv".to_string()
}
fn default_quantile() -> f64 {
    DEFAULT_QUANTILE
}
fn default_concurrency() -> usize {
    4
}
fn default_eartag_column() -> String {
    "Eartag".to_string()
}
fn default_filters() -> BTreeMap<String, JsonValue> {
    BTreeMap::from([
        ("pcMapped".to_string(), JsonValue::from(vec![90.0, 100.0])),
        ("flag".to_string(), JsonValue::from(vec!["BritishbTB"])),
    ])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_minimal_yaml_uses_defaults() -> Result<()> {
        let config: PipelineConfig = serde_yaml::from_str("name: viewbovine\n")?;
        assert_eq!(config.results_path, "results");
        assert_eq!(config.dedup, default_rules());
        assert_eq!(
            config.filter_spec()?,
            FilterSpec::new()
                .include("flag", ["BritishbTB"])
                .range("pcMapped", 90.0, 100.0)
        );
        assert!(config.validate().is_ok());
        Ok(())
    }

    #[test]
    fn test_validation_rejects_bad_values() -> Result<()> {
        let config: PipelineConfig =
            serde_yaml::from_str("name: x\nquantile: 1.5\nconcurrency: 0\ndedup: []\n")?;
        let errors = config.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("quantile"));
        assert!(fields.contains_key("concurrency"));
        assert!(fields.contains_key("dedup"));
        Ok(())
    }
}
