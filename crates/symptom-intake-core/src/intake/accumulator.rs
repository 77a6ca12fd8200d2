//! Dialogue accumulator: merges turns and decides what to ask next.
//!
//! A session is either idle (no pending struct) or collecting (a partial
//! struct waits for more answers). Each turn extracts a fresh struct,
//! merges it over the pending one and either asks exactly one clarifying
//! question or hands the completed struct on.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{FieldExtractor, IntakeSession};
use crate::models::SymptomStruct;

/// The single question asked while an intake is incomplete.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ClarifyingQuestion {
    Duration,
    Severity,
}

impl ClarifyingQuestion {
    /// Text shown to the user.
    pub fn text(&self) -> &'static str {
        match self {
            ClarifyingQuestion::Duration => "For how many days have you had these symptoms?",
            ClarifyingQuestion::Severity => {
                "Would you say the symptoms are mild, moderate, or severe?"
            }
        }
    }
}

impl fmt::Display for ClarifyingQuestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Result of feeding one user turn to the accumulator.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// More information is needed; the partial struct stays pending.
    Clarify {
        question: ClarifyingQuestion,
        pending: SymptomStruct,
    },
    /// Severity and duration are known; the session is idle again.
    Complete(SymptomStruct),
}

impl TurnOutcome {
    pub fn is_complete(&self) -> bool {
        matches!(self, TurnOutcome::Complete(_))
    }
}

/// Merge a fresh extraction over a pending struct.
///
/// Fresh values win wherever they are present: a set severity or duration,
/// or a non-empty symptom set. Pending values persist otherwise.
pub fn merge(pending: &SymptomStruct, fresh: &SymptomStruct) -> SymptomStruct {
    SymptomStruct {
        symptoms: if fresh.symptoms.is_empty() {
            pending.symptoms.clone()
        } else {
            fresh.symptoms.clone()
        },
        severity: fresh.severity.or(pending.severity),
        duration: fresh.duration.or(pending.duration),
    }
}

/// True when severity or duration is still unset.
pub fn needs_clarification(intake: &SymptomStruct) -> bool {
    !intake.is_complete()
}

/// Next question to ask, duration before severity. `None` once complete.
pub fn next_question(intake: &SymptomStruct) -> Option<ClarifyingQuestion> {
    if intake.duration.is_none() {
        return Some(ClarifyingQuestion::Duration);
    }
    if intake.severity.is_none() {
        return Some(ClarifyingQuestion::Severity);
    }
    None
}

/// Drives the collecting/idle state machine of an [`IntakeSession`].
pub struct Accumulator {
    extractor: FieldExtractor,
}

impl Default for Accumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Accumulator {
    /// Create an accumulator with the default extractor.
    pub fn new() -> Self {
        Self::with_extractor(FieldExtractor::new())
    }

    /// Create an accumulator with a custom extractor.
    pub fn with_extractor(extractor: FieldExtractor) -> Self {
        Self { extractor }
    }

    /// Process one user turn against the session state.
    pub fn advance(&self, session: &mut IntakeSession, text: &str) -> TurnOutcome {
        let fresh = self.extractor.extract(text);

        let working = match session.take_pending() {
            Some(pending) => merge(&pending, &fresh),
            None => fresh,
        };
        session.record_turn();

        match next_question(&working) {
            Some(question) => {
                tracing::info!(
                    session_id = %session.id(),
                    question = ?question,
                    "Intake incomplete, asking for clarification"
                );
                session.set_pending(working.clone());
                TurnOutcome::Clarify {
                    question,
                    pending: working,
                }
            }
            None => {
                tracing::info!(
                    session_id = %session.id(),
                    symptoms = working.symptoms.len(),
                    "Intake complete"
                );
                TurnOutcome::Complete(working)
            }
        }
    }

    /// Get the extractor for direct access.
    pub fn extractor(&self) -> &FieldExtractor {
        &self.extractor
    }
}
