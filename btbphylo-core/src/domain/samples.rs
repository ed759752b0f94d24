// btbphylo-core/src/domain/samples.rs

use regex::Regex;
use std::sync::LazyLock;

use crate::domain::error::DomainError;
use crate::domain::table::{Column, ColumnData, SAMPLE, SUBMISSION, Table};

static SUBMISSION_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\d{2}-\d{4,5}-\d{2}").ok());

/// Derives the submission number from a sample name.
///
/// The first `NN-NNNN(N)-NN` run is prefixed with `AF-`; names without one are
/// kept as-is. The result is always upper-cased.
pub fn extract_submission_no(sample: &str) -> String {
    let found = SUBMISSION_PATTERN
        .as_ref()
        .and_then(|re| re.find(sample))
        .map(|m| format!("AF-{}", m.as_str()));
    found.unwrap_or_else(|| sample.to_string()).to_uppercase()
}

/// Returns `table` with a `Submission` column computed from `Sample`.
pub fn add_submission_column(table: &Table) -> Result<Table, DomainError> {
    let submissions: Vec<Option<String>> = table
        .keys(SAMPLE)?
        .into_iter()
        .map(|s| s.map(extract_submission_no))
        .collect();
    table
        .clone()
        .with_column(Column::new(SUBMISSION, ColumnData::Categorical(submissions)))
}

/// Adds `Submission` only when the table does not carry one yet.
pub fn ensure_submission_column(table: Table) -> Result<Table, DomainError> {
    if table.has_column(SUBMISSION) {
        Ok(table)
    } else {
        add_submission_column(&table)
    }
}
