//! Structured symptom models threaded through an intake conversation.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Reported severity of the symptoms.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
}

impl Severity {
    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Mild => "mild",
            Severity::Moderate => "moderate",
            Severity::Severe => "severe",
        }
    }

    /// Parse a severity name, ignoring case and surrounding whitespace.
    ///
    /// Unknown strings yield `None` rather than an error.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "mild" => Some(Severity::Mild),
            "moderate" => Some(Severity::Moderate),
            "severe" => Some(Severity::Severe),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Symptoms, severity and duration extracted from one or more user turns.
///
/// `None` marks a field that has not been extracted yet. A duration of
/// `Some(0)` is a real value and is distinct from unset.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SymptomStruct {
    /// Canonical symptom phrases from the fixed vocabulary
    pub symptoms: BTreeSet<String>,
    /// Reported severity
    pub severity: Option<Severity>,
    /// Duration in days
    pub duration: Option<u32>,
}

impl SymptomStruct {
    /// Create an empty struct with every field unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// A struct is complete once both severity and duration are known.
    pub fn is_complete(&self) -> bool {
        self.severity.is_some() && self.duration.is_some()
    }

    /// Space-joined canonical symptoms, used as the retrieval query.
    pub fn retrieval_query(&self) -> String {
        self.symptoms
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}
