// btbphylo-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

use crate::domain::table::ColumnKind;

#[derive(Error, Debug, Diagnostic, Clone, PartialEq)]
pub enum DomainError {
    #[error("Unknown column '{column}': must be one of: {}", .valid.join(", "))]
    #[diagnostic(
        code(btbphylo::domain::unknown_column),
        help("Column names are case sensitive (e.g. 'pcMapped', 'Ncount', 'group').")
    )]
    UnknownColumn { column: String, valid: Vec<String> },

    #[error("Column '{column}' is {found}, expected {expected}")]
    #[diagnostic(code(btbphylo::domain::column_type))]
    InvalidColumnType {
        column: String,
        expected: ColumnKind,
        found: ColumnKind,
    },

    #[error("Invalid constraint on '{column}': {reason}")]
    #[diagnostic(
        code(btbphylo::domain::constraint),
        help(
            "Numeric columns take exactly two numbers [min, max] with min < max; categorical columns take a non-empty list of strings."
        )
    )]
    InvalidConstraint { column: String, reason: String },

    #[error("Insufficient samples: only {passed} sample(s) passed the filter")]
    #[diagnostic(
        code(btbphylo::domain::insufficient_samples),
        help("Relax the filter criteria or allow the result to be wiped out.")
    )]
    InsufficientSamples { passed: usize },

    #[error("No tie-break rules provided for duplicate resolution")]
    #[diagnostic(
        code(btbphylo::domain::no_rules),
        help("Pass at least one rule, e.g. 'pcMapped=max'.")
    )]
    NoRulesProvided,

    #[error("Invalid tie-break rule '{column}={target}': {reason}")]
    #[diagnostic(code(btbphylo::domain::rule))]
    InvalidRule {
        column: String,
        target: String,
        reason: String,
    },

    #[error("Conflicting arguments: {} cannot be combined with a filter config file", .arguments.join(", "))]
    #[diagnostic(
        code(btbphylo::domain::conflicting_arguments),
        help("Either pass filter criteria inline or point to a config file, not both.")
    )]
    ConflictingArguments { arguments: Vec<String> },

    #[error("Schema Error: {0}")]
    #[diagnostic(code(btbphylo::domain::schema))]
    SchemaError(String),
}
