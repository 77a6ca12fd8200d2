//! Triage risk levels.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse urgency classification of a completed intake.
///
/// Variants are declared in ascending order of urgency so that `Ord`
/// follows LOW < MODERATE < HIGH.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TriageLevel {
    #[serde(rename = "LOW RISK")]
    Low,
    #[serde(rename = "MODERATE RISK")]
    Moderate,
    #[serde(rename = "HIGH RISK")]
    High,
}

impl TriageLevel {
    /// The literal level string handed to prompt building and formatting.
    pub fn as_str(&self) -> &'static str {
        match self {
            TriageLevel::Low => "LOW RISK",
            TriageLevel::Moderate => "MODERATE RISK",
            TriageLevel::High => "HIGH RISK",
        }
    }
}

impl fmt::Display for TriageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
