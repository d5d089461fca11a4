use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::SignatureError;

/// Check severity, ordered from most to least severe.
///
/// `High` is 0 so "at least as severe as the threshold" is a plain
/// numeric `<=` comparison.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Severity {
    High = 0,
    Medium = 1,
    Low = 2,
    #[default]
    Informational = 3,
}

impl Severity {
    /// True when `self` is as severe as `threshold` or worse.
    pub fn reaches(self, threshold: Severity) -> bool {
        self <= threshold
    }

    pub fn all() -> [Severity; 4] {
        [
            Severity::High,
            Severity::Medium,
            Severity::Low,
            Severity::Informational,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
            Severity::Informational => "Informational",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = SignatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "High" => Ok(Severity::High),
            "Medium" => Ok(Severity::Medium),
            "Low" => Ok(Severity::Low),
            "Informational" => Ok(Severity::Informational),
            other => Err(SignatureError::InvalidSeverity(other.to_string())),
        }
    }
}

/// Accepted severity names, for error messages.
pub fn severities_as_string() -> String {
    Severity::all()
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
