//! Rule-based field extraction from normalized symptom text.
//!
//! Three independent extractions run over the normalized text:
//! - Symptoms: substring containment against a closed vocabulary
//! - Severity: first matching term of an ordered lexicon
//! - Duration: first matching rule of an ordered pattern list
//!
//! Every table is ordered and first match wins, so the order of entries is
//! part of the behavior. Unmatched fields come back as `None`.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use super::Normalizer;
use crate::models::{Severity, SymptomStruct};

/// How a matched duration rule produces its day count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationValue {
    /// Parse the first capture group as the number of days
    Captured,
    /// The phrase itself stands for a fixed number of days
    Fixed(u32),
}

/// One ordered duration rule.
#[derive(Debug, Clone)]
pub struct DurationRule {
    pattern: Regex,
    value: DurationValue,
}

impl DurationRule {
    /// Compile a rule from a regex pattern.
    pub fn new(pattern: &str, value: DurationValue) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            value,
        })
    }

    /// Apply the rule to normalized text.
    ///
    /// A captured number that does not fit in `u32` does not count as a match.
    pub fn apply(&self, text: &str) -> Option<u32> {
        match self.value {
            DurationValue::Captured => self
                .pattern
                .captures(text)?
                .get(1)?
                .as_str()
                .parse::<u32>()
                .ok(),
            DurationValue::Fixed(days) => self.pattern.is_match(text).then_some(days),
        }
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

static DEFAULT_DURATION_RULES: LazyLock<Vec<DurationRule>> = LazyLock::new(|| {
    vec![
        rule(r"^([0-9]+)\n?$", DurationValue::Captured),
        rule(r"([0-9]+)\s*days?", DurationValue::Captured),
        rule(r"([0-9]+)\s*day", DurationValue::Captured),
        rule(r"([0-9]+)\s*din", DurationValue::Captured),
        rule(r"([0-9]+)\s*d", DurationValue::Captured),
        rule(r"kal se", DurationValue::Fixed(1)),
        rule(r"yesterday", DurationValue::Fixed(1)),
        rule(r"couple of days", DurationValue::Fixed(2)),
    ]
});

fn rule(pattern: &str, value: DurationValue) -> DurationRule {
    DurationRule::new(pattern, value).expect("Invalid duration regex pattern")
}

/// Extractor for the structured intake fields.
pub struct FieldExtractor {
    normalizer: Normalizer,
    /// Canonical symptom phrases
    vocabulary: Vec<String>,
    /// Ordered lexicon: term → severity
    severity_lexicon: Vec<(String, Severity)>,
    /// Ordered duration rules
    duration_rules: Vec<DurationRule>,
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor {
    /// Create an extractor with the default normalizer and tables.
    pub fn new() -> Self {
        Self::with_normalizer(Normalizer::new())
    }

    /// Create an extractor with a custom normalizer and the default tables.
    pub fn with_normalizer(normalizer: Normalizer) -> Self {
        Self {
            normalizer,
            vocabulary: Self::default_vocabulary(),
            severity_lexicon: Self::default_severity_lexicon(),
            duration_rules: DEFAULT_DURATION_RULES.clone(),
        }
    }

    /// Build the structured fields for one turn of raw user text.
    pub fn extract(&self, text: &str) -> SymptomStruct {
        let normalized = self.normalizer.normalize(text);

        let extracted = SymptomStruct {
            symptoms: self.match_symptoms(&normalized),
            severity: self.match_severity(&normalized),
            duration: self.match_duration(&normalized),
        };

        tracing::debug!(
            symptoms = ?extracted.symptoms,
            severity = ?extracted.severity,
            duration = ?extracted.duration,
            "Extracted intake fields"
        );

        extracted
    }

    /// Symptoms mentioned in raw text, always a subset of the vocabulary.
    pub fn extract_symptoms(&self, text: &str) -> BTreeSet<String> {
        self.match_symptoms(&self.normalizer.normalize(text))
    }

    /// Severity of the first lexicon term found in raw text.
    pub fn extract_severity(&self, text: &str) -> Option<Severity> {
        self.match_severity(&self.normalizer.normalize(text))
    }

    /// Duration in days from the first matching rule.
    pub fn extract_duration(&self, text: &str) -> Option<u32> {
        self.match_duration(&self.normalizer.normalize(text))
    }

    /// Get the normalizer for direct access.
    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// The closed symptom vocabulary.
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// Add a canonical symptom phrase to the vocabulary.
    pub fn add_symptom(&mut self, symptom: &str) {
        let symptom = symptom.to_lowercase();
        if !self.vocabulary.contains(&symptom) {
            self.vocabulary.push(symptom);
        }
    }

    /// Append a severity term. Earlier terms keep precedence.
    pub fn add_severity_term(&mut self, term: &str, severity: Severity) {
        self.severity_lexicon.push((term.to_lowercase(), severity));
    }

    /// Append a duration rule. Earlier rules keep precedence.
    pub fn add_duration_rule(
        &mut self,
        pattern: &str,
        value: DurationValue,
    ) -> Result<(), regex::Error> {
        self.duration_rules.push(DurationRule::new(pattern, value)?);
        Ok(())
    }

    fn match_symptoms(&self, normalized: &str) -> BTreeSet<String> {
        self.vocabulary
            .iter()
            .filter(|symptom| normalized.contains(symptom.as_str()))
            .cloned()
            .collect()
    }

    fn match_severity(&self, normalized: &str) -> Option<Severity> {
        self.severity_lexicon
            .iter()
            .find(|(term, _)| normalized.contains(term.as_str()))
            .map(|(_, severity)| *severity)
    }

    fn match_duration(&self, normalized: &str) -> Option<u32> {
        self.duration_rules
            .iter()
            .find_map(|rule| rule.apply(normalized))
    }

    /// Default canonical symptom vocabulary.
    fn default_vocabulary() -> Vec<String> {
        [
            "fever",
            "rash",
            "headache",
            "cough",
            "sore throat",
            "fatigue",
            "vomiting",
            "nausea",
            "chills",
            "body ache",
            "shortness of breath",
            "difficulty breathing",
            "diarrhea",
            "dizziness",
            "abdominal pain",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }

    /// Default severity lexicon, in match order.
    fn default_severity_lexicon() -> Vec<(String, Severity)> {
        [
            ("mild", Severity::Mild),
            ("little", Severity::Mild),
            ("thoda", Severity::Mild),
            ("moderate", Severity::Moderate),
            ("normal", Severity::Moderate),
            ("severe", Severity::Severe),
            ("zyada", Severity::Severe),
            ("intense", Severity::Severe),
        ]
        .into_iter()
        .map(|(term, severity)| (term.to_string(), severity))
        .collect()
    }
}
