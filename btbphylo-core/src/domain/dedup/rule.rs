// btbphylo-core/src/domain/dedup/rule.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::error::DomainError;

/// What a tie-break keeps within a duplicated key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TieBreakTarget {
    /// Rows holding the per-key minimum of a numeric column.
    Min,
    /// Rows holding the per-key maximum of a numeric column.
    Max,
    /// Rows equal to a literal in a categorical column.
    Equals(String),
}

impl TieBreakTarget {
    pub fn as_str(&self) -> &str {
        match self {
            TieBreakTarget::Min => "min",
            TieBreakTarget::Max => "max",
            TieBreakTarget::Equals(v) => v,
        }
    }
}

impl From<String> for TieBreakTarget {
    fn from(value: String) -> Self {
        match value.as_str() {
            "min" => TieBreakTarget::Min,
            "max" => TieBreakTarget::Max,
            _ => TieBreakTarget::Equals(value),
        }
    }
}

impl From<&str> for TieBreakTarget {
    fn from(value: &str) -> Self {
        TieBreakTarget::from(value.to_string())
    }
}

impl From<TieBreakTarget> for String {
    fn from(target: TieBreakTarget) -> Self {
        target.as_str().to_string()
    }
}

impl fmt::Display for TieBreakTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One ordered tie-break rule, e.g. `pcMapped=max` or `Outcome=Pass`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TieBreak {
    pub column: String,
    #[serde(rename = "keep")]
    pub target: TieBreakTarget,
}

impl TieBreak {
    pub fn new(column: impl Into<String>, target: impl Into<TieBreakTarget>) -> Self {
        Self {
            column: column.into(),
            target: target.into(),
        }
    }

    pub fn max(column: impl Into<String>) -> Self {
        Self::new(column, TieBreakTarget::Max)
    }

    pub fn min(column: impl Into<String>) -> Self {
        Self::new(column, TieBreakTarget::Min)
    }

    pub fn equals(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(column, TieBreakTarget::Equals(value.into()))
    }
}

impl fmt::Display for TieBreak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.column, self.target)
    }
}

impl FromStr for TieBreak {
    type Err = DomainError;

    /// Parses `column=target`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((column, target)) if !column.trim().is_empty() && !target.trim().is_empty() => {
                Ok(TieBreak::new(column.trim(), target.trim()))
            }
            _ => Err(DomainError::InvalidRule {
                column: s.to_string(),
                target: String::new(),
                reason: "expected 'column=target'".into(),
            }),
        }
    }
}

/// Rules applied when none are configured: best mapping, fewest Ns.
pub fn default_rules() -> Vec<TieBreak> {
    vec![
        TieBreak::equals("Outcome", "Pass"),
        TieBreak::equals("flag", "BritishbTB"),
        TieBreak::max("pcMapped"),
        TieBreak::min("Ncount"),
    ]
}
