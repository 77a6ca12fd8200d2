//! Condition knowledge-base models.

use serde::{Deserialize, Serialize};

/// A condition as it appears in the knowledge-base dataset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConditionEntry {
    /// Condition name, unique within the knowledge base
    pub condition: String,
    /// Typical symptoms
    #[serde(default)]
    pub symptoms: Vec<String>,
    /// Common causes
    #[serde(default)]
    pub causes: Vec<String>,
    /// Known risk factors
    #[serde(default)]
    pub risk_factors: Vec<String>,
    /// Signs that need emergency care
    #[serde(default)]
    pub emergency_signs: Vec<String>,
    /// When a doctor visit is advised
    #[serde(default)]
    pub when_to_see_doctor: Vec<String>,
    /// Safe self-care measures
    #[serde(default)]
    pub self_care: Vec<String>,
    /// Where the information comes from
    #[serde(default)]
    pub source: String,
}

impl ConditionEntry {
    /// Create an entry with only a name.
    pub fn new(condition: String) -> Self {
        Self {
            condition,
            symptoms: Vec::new(),
            causes: Vec::new(),
            risk_factors: Vec::new(),
            emergency_signs: Vec::new(),
            when_to_see_doctor: Vec::new(),
            self_care: Vec::new(),
            source: String::new(),
        }
    }

    /// Render the entry as the document text stored for retrieval.
    pub fn to_document(&self) -> String {
        format!(
            "Condition: {}\n\
             Symptoms: {}\n\
             Causes: {}\n\
             Risk Factors: {}\n\
             Emergency Signs: {}\n\
             When to See Doctor: {}\n\
             Self Care: {}\n\
             Source: {}",
            self.condition,
            self.symptoms.join(", "),
            self.causes.join(", "),
            self.risk_factors.join(", "),
            self.emergency_signs.join(", "),
            self.when_to_see_doctor.join(", "),
            self.self_care.join(", "),
            self.source,
        )
    }

    /// Convert into the record form returned by retrieval.
    pub fn to_record(&self) -> ConditionRecord {
        ConditionRecord {
            condition: self.condition.clone(),
            content: self.to_document(),
        }
    }
}

/// A retrieved piece of background text about one condition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConditionRecord {
    /// Condition name ("unknown" when the source had none)
    pub condition: String,
    /// Opaque context text
    pub content: String,
}
