//! Final answer models handed to the presentation layer.

use serde::{Deserialize, Serialize};

use super::{ConditionRecord, SymptomStruct, TriageLevel};

/// Fallback used when the generated text carries no disclaimer section.
pub const DEFAULT_DISCLAIMER: &str = "This is informational and not a diagnosis.";

/// Generated explanation split into fixed sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StructuredAnswer {
    pub causes: String,
    pub red_flags: String,
    pub doctor: String,
    pub self_care: String,
    pub sources: String,
    /// Never empty once produced by a formatter
    pub disclaimer: String,
}

impl StructuredAnswer {
    /// Fill the disclaimer with the default text if it is empty.
    pub fn ensure_disclaimer(&mut self) {
        if self.disclaimer.is_empty() {
            self.disclaimer = DEFAULT_DISCLAIMER.to_string();
        }
    }
}

/// Everything the presentation layer needs to render a completed turn.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinalAnswer {
    /// Sectioned explanation
    pub answer: StructuredAnswer,
    /// Triage level of the intake
    pub triage: TriageLevel,
    /// The completed intake
    pub intake: SymptomStruct,
    /// Background records used as generation context
    pub retrieved: Vec<ConditionRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_disclaimer() {
        let mut answer = StructuredAnswer::default();
        answer.ensure_disclaimer();
        assert_eq!(answer.disclaimer, DEFAULT_DISCLAIMER);

        answer.disclaimer = "Custom.\n".into();
        answer.ensure_disclaimer();
        assert_eq!(answer.disclaimer, "Custom.\n");
    }
}
