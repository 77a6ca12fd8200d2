//! Rule-based triage classification.
//!
//! Rules are evaluated in order and the first match wins:
//! 1. Any red-flag symptom → HIGH
//! 2. Duration ≥ 3 days with moderate or severe symptoms → MODERATE
//! 3. Severe symptoms → MODERATE
//! 4. Otherwise → LOW

use crate::models::{Severity, SymptomStruct, TriageLevel};

/// Minimum duration (days) for the prolonged-symptoms rule.
const PROLONGED_DAYS: u32 = 3;

/// A single triage rule.
#[derive(Debug, Clone, PartialEq)]
pub enum TriageRule {
    /// Any listed symptom present (case-insensitive)
    RedFlag { flags: Vec<String>, level: TriageLevel },
    /// Duration at least `min_days` and severity one of `severities`
    Prolonged {
        min_days: u32,
        severities: Vec<Severity>,
        level: TriageLevel,
    },
    /// Severity equals `severity`
    SeverityIs { severity: Severity, level: TriageLevel },
}

impl TriageRule {
    fn evaluate(
        &self,
        symptoms: &[String],
        severity: Option<Severity>,
        duration: Option<u32>,
    ) -> Option<TriageLevel> {
        let matched = match self {
            TriageRule::RedFlag { flags, .. } => symptoms
                .iter()
                .any(|s| flags.iter().any(|flag| *flag == *s)),
            TriageRule::Prolonged {
                min_days,
                severities,
                ..
            } => {
                duration.is_some_and(|d| d >= *min_days)
                    && severity.is_some_and(|s| severities.contains(&s))
            }
            TriageRule::SeverityIs { severity: target, .. } => severity == Some(*target),
        };

        matched.then(|| self.level())
    }

    pub fn level(&self) -> TriageLevel {
        match self {
            TriageRule::RedFlag { level, .. }
            | TriageRule::Prolonged { level, .. }
            | TriageRule::SeverityIs { level, .. } => *level,
        }
    }
}

/// Ordered triage rule table with a fallback level.
pub struct TriageClassifier {
    rules: Vec<TriageRule>,
    fallback: TriageLevel,
}

impl Default for TriageClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl TriageClassifier {
    /// Create a classifier with the default rule table.
    pub fn new() -> Self {
        Self {
            rules: vec![
                TriageRule::RedFlag {
                    flags: Self::default_red_flags(),
                    level: TriageLevel::High,
                },
                TriageRule::Prolonged {
                    min_days: PROLONGED_DAYS,
                    severities: vec![Severity::Moderate, Severity::Severe],
                    level: TriageLevel::Moderate,
                },
                TriageRule::SeverityIs {
                    severity: Severity::Severe,
                    level: TriageLevel::Moderate,
                },
            ],
            fallback: TriageLevel::Low,
        }
    }

    /// Classify symptoms, severity and duration into a risk level.
    ///
    /// Total and pure: unset severity or duration simply fails to match the
    /// rules that need them.
    pub fn classify<S: AsRef<str>>(
        &self,
        symptoms: &[S],
        severity: Option<Severity>,
        duration: Option<u32>,
    ) -> TriageLevel {
        let lowered: Vec<String> = symptoms
            .iter()
            .map(|s| s.as_ref().to_lowercase())
            .collect();

        let level = self
            .rules
            .iter()
            .find_map(|rule| rule.evaluate(&lowered, severity, duration))
            .unwrap_or(self.fallback);

        tracing::debug!(?severity, ?duration, level = %level, "Triage classified");
        level
    }

    /// Classify with a free-form severity string (case-insensitive).
    ///
    /// Unknown severity strings are treated as unset.
    pub fn classify_raw<S: AsRef<str>>(
        &self,
        symptoms: &[S],
        severity: Option<&str>,
        duration: Option<u32>,
    ) -> TriageLevel {
        self.classify(symptoms, severity.and_then(Severity::parse), duration)
    }

    /// Classify a completed intake.
    pub fn classify_intake(&self, intake: &SymptomStruct) -> TriageLevel {
        let symptoms: Vec<&str> = intake.symptoms.iter().map(String::as_str).collect();
        self.classify(&symptoms, intake.severity, intake.duration)
    }

    /// Add a red-flag symptom to the first red-flag rule.
    pub fn add_red_flag(&mut self, flag: &str) {
        let flag = flag.trim().to_lowercase();
        for rule in &mut self.rules {
            if let TriageRule::RedFlag { flags, .. } = rule {
                if !flags.contains(&flag) {
                    flags.push(flag);
                }
                return;
            }
        }
    }

    /// The rule table in evaluation order.
    pub fn rules(&self) -> &[TriageRule] {
        &self.rules
    }

    /// Default red-flag symptoms.
    fn default_red_flags() -> Vec<String> {
        [
            "difficulty breathing",
            "severe chest pain",
            "loss of consciousness",
            "one-sided weakness",
            "vomiting blood",
            "bluish lips",
            "bleeding",
            "severe abdominal pain",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }
}
