// btbphylo-core/src/infrastructure/error.rs

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(btbphylo::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    #[error("Required file not found: {}", .0.display())]
    #[diagnostic(
        code(btbphylo::infra::not_found),
        help("Check the path in btbphylo.yaml or on the command line.")
    )]
    NotFound(PathBuf),

    // --- TABLES (CSV) ---
    #[error("CSV Error: {0}")]
    #[diagnostic(code(btbphylo::infra::csv))]
    Csv(#[from] csv::Error),

    #[error("{}:{line}: cannot parse '{value}' in numeric column '{column}'", .path.display())]
    #[diagnostic(
        code(btbphylo::infra::parse_value),
        help("Numeric columns accept decimal numbers or empty cells.")
    )]
    ParseValue {
        path: PathBuf,
        line: u64,
        column: String,
        value: String,
    },

    // --- CONFIG / YAML / JSON ---
    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(btbphylo::infra::yaml),
        help("Check your YAML syntax (indentation, types).")
    )]
    YamlError(#[from] serde_yaml::Error),

    #[error("JSON Error: {0}")]
    #[diagnostic(code(btbphylo::infra::json))]
    JsonError(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    #[diagnostic(code(btbphylo::infra::config))]
    ConfigError(String),

    #[error("Project configuration not found at '{0}'")]
    #[diagnostic(code(btbphylo::infra::config_missing))]
    ConfigNotFound(String),
}
