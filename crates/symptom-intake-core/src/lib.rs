//! Symptom Intake Core Library
//!
//! Conversational symptom intake: free text in, structured summary and
//! triage level out.
//!
//! # Architecture
//!
//! ```text
//! User text → Normalization → Field Extraction → Merge with pending struct
//!                                                      │
//!                                   ┌──────────────────┴──────────────────┐
//!                                   │                                     │
//!                         severity/duration unset                  both known
//!                                   │                                     │
//!                                   ▼                                     ▼
//!                       One clarifying question                 Triage Classifier
//!                       (duration before severity)                        │
//!                                                                         ▼
//!                                                       Retrieve → Prompt → Generate
//!                                                                         │
//!                                                                         ▼
//!                                                              Safety formatting
//! ```
//!
//! # Core Principle
//!
//! **Extraction and triage never fail.** Anything the rules cannot read is
//! left unset and drives the next clarifying question instead.
//!
//! # Modules
//!
//! - [`intake`]: Normalizer, field extractor, accumulator and sessions
//! - [`triage`]: Ordered red-flag / duration / severity rules
//! - [`models`]: Domain types (SymptomStruct, TriageLevel, ConditionRecord, etc.)
//! - [`pipeline`]: Collaborator traits and the per-turn assistant
//! - [`db`]: SQLite condition knowledge base with FTS5 search

pub mod db;
pub mod intake;
pub mod models;
pub mod pipeline;
pub mod triage;

// Re-export commonly used types
pub use db::Database;
pub use intake::{
    merge, needs_clarification, next_question, Accumulator, ClarifyingQuestion, FieldExtractor,
    IntakeSession, Normalizer, SharedSession, TurnOutcome,
};
pub use models::{
    ConditionEntry, ConditionRecord, FinalAnswer, Severity, StructuredAnswer, SymptomStruct,
    TriageLevel,
};
pub use pipeline::{Assistant, AssistantConfig, TurnReply};
pub use triage::TriageClassifier;

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum SymptomIntakeError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Session busy: {0}")]
    SessionBusy(String),

    #[error("Session unavailable: {0}")]
    SessionPoisoned(String),
}

impl From<db::DbError> for SymptomIntakeError {
    fn from(e: db::DbError) -> Self {
        SymptomIntakeError::DatabaseError(e.to_string())
    }
}

impl From<serde_json::Error> for SymptomIntakeError {
    fn from(e: serde_json::Error) -> Self {
        SymptomIntakeError::SerializationError(e.to_string())
    }
}

impl From<intake::IntakeError> for SymptomIntakeError {
    fn from(e: intake::IntakeError) -> Self {
        match e {
            intake::IntakeError::TurnInProgress => SymptomIntakeError::SessionBusy(e.to_string()),
            intake::IntakeError::Poisoned(_) => SymptomIntakeError::SessionPoisoned(e.to_string()),
        }
    }
}

impl<T> From<std::sync::PoisonError<T>> for SymptomIntakeError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        SymptomIntakeError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a knowledge-base database at the given path.
#[uniffi::export]
pub fn open_database(path: String) -> Result<Arc<SymptomIntakeCore>, SymptomIntakeError> {
    let db = Database::open(&path)?;
    Ok(Arc::new(SymptomIntakeCore::new(db)))
}

/// Create an in-memory database (for testing).
#[uniffi::export]
pub fn open_database_in_memory() -> Result<Arc<SymptomIntakeCore>, SymptomIntakeError> {
    let db = Database::open_in_memory()?;
    Ok(Arc::new(SymptomIntakeCore::new(db)))
}

/// Lowercase and substitute colloquial terms.
#[uniffi::export]
pub fn normalize_text(text: String) -> String {
    Normalizer::new().normalize(&text)
}

/// Extract symptoms, severity and duration from a single message.
#[uniffi::export]
pub fn extract_intake(text: String) -> FfiSymptomSummary {
    FieldExtractor::new().extract(&text).into()
}

/// Classify a triage level; returns one of the literal level strings.
#[uniffi::export]
pub fn classify_triage(
    symptoms: Vec<String>,
    severity: Option<String>,
    duration_days: Option<u32>,
) -> String {
    TriageClassifier::new()
        .classify_raw(&symptoms, severity.as_deref(), duration_days)
        .as_str()
        .to_string()
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe knowledge base and intake engine for FFI.
#[derive(uniffi::Object)]
pub struct SymptomIntakeCore {
    db: Arc<Mutex<Database>>,
    accumulator: Arc<Accumulator>,
    classifier: Arc<TriageClassifier>,
}

impl SymptomIntakeCore {
    fn new(db: Database) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            accumulator: Arc::new(Accumulator::new()),
            classifier: Arc::new(TriageClassifier::new()),
        }
    }
}

#[uniffi::export]
impl SymptomIntakeCore {
    // =========================================================================
    // Knowledge Base Operations
    // =========================================================================

    /// Import a JSON array of condition entries. Returns the number written.
    pub fn import_conditions_json(&self, json: String) -> Result<u32, SymptomIntakeError> {
        let db = self.db.lock()?;
        let count = db.import_conditions_json(&json)?;
        Ok(count as u32)
    }

    /// Add or update a condition entry.
    pub fn upsert_condition(&self, entry: FfiConditionEntry) -> Result<(), SymptomIntakeError> {
        if entry.condition.trim().is_empty() {
            return Err(SymptomIntakeError::InvalidInput(
                "condition name must not be empty".into(),
            ));
        }
        let db = self.db.lock()?;
        db.upsert_condition(&entry.into())?;
        Ok(())
    }

    /// Search the knowledge base for a symptom query.
    pub fn search_conditions(
        &self,
        query: String,
        limit: u32,
    ) -> Result<Vec<FfiConditionRecord>, SymptomIntakeError> {
        let db = self.db.lock()?;
        let records = db.search_conditions(&query, limit as usize)?;
        Ok(records.into_iter().map(|r| r.into()).collect())
    }

    // =========================================================================
    // Session Operations
    // =========================================================================

    /// Start a new intake conversation.
    pub fn start_session(&self) -> Arc<FfiIntakeSession> {
        Arc::new(FfiIntakeSession {
            session: SharedSession::new(),
            db: Arc::clone(&self.db),
            accumulator: Arc::clone(&self.accumulator),
            classifier: Arc::clone(&self.classifier),
            top_k: pipeline::DEFAULT_TOP_K,
        })
    }
}

/// One intake conversation exposed over FFI.
///
/// Turns on the same session must not overlap; an overlapping `submit`
/// fails with `SessionBusy`.
#[derive(uniffi::Object)]
pub struct FfiIntakeSession {
    session: SharedSession,
    db: Arc<Mutex<Database>>,
    accumulator: Arc<Accumulator>,
    classifier: Arc<TriageClassifier>,
    top_k: usize,
}

#[uniffi::export]
impl FfiIntakeSession {
    /// Session identifier.
    pub fn session_id(&self) -> Result<String, SymptomIntakeError> {
        let session = self.session.begin_turn()?;
        Ok(session.id().to_string())
    }

    /// True while a clarifying question is outstanding.
    pub fn is_collecting(&self) -> Result<bool, SymptomIntakeError> {
        let session = self.session.begin_turn()?;
        Ok(session.is_collecting())
    }

    /// Process one user message.
    ///
    /// A completed intake carries its triage level and retrieved condition
    /// context; answer generation is left to the host.
    pub fn submit(&self, text: String) -> Result<FfiTurnOutcome, SymptomIntakeError> {
        let mut session = self.session.begin_turn()?;

        match self.accumulator.advance(&mut session, &text) {
            TurnOutcome::Clarify { question, pending } => Ok(FfiTurnOutcome::Clarify {
                question: question.text().to_string(),
                pending: pending.into(),
            }),
            TurnOutcome::Complete(intake) => {
                let triage = self.classifier.classify_intake(&intake);
                let retrieval_query = intake.retrieval_query();
                let conditions = {
                    let db = self.db.lock()?;
                    pipeline::retrieve_context(&*db, &retrieval_query, self.top_k)
                };

                Ok(FfiTurnOutcome::Complete {
                    summary: intake.into(),
                    triage: triage.as_str().to_string(),
                    retrieval_query,
                    conditions: conditions.into_iter().map(|c| c.into()).collect(),
                })
            }
        }
    }

    /// Drop any pending answers and start over.
    pub fn reset(&self) -> Result<(), SymptomIntakeError> {
        let mut session = self.session.begin_turn()?;
        session.reset();
        Ok(())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe symptom summary.
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiSymptomSummary {
    pub symptoms: Vec<String>,
    pub severity: Option<String>,
    pub duration_days: Option<u32>,
}

impl From<SymptomStruct> for FfiSymptomSummary {
    fn from(intake: SymptomStruct) -> Self {
        Self {
            symptoms: intake.symptoms.into_iter().collect(),
            severity: intake.severity.map(|s| s.as_str().to_string()),
            duration_days: intake.duration,
        }
    }
}

/// FFI-safe turn outcome.
#[derive(Debug, Clone, PartialEq, uniffi::Enum)]
pub enum FfiTurnOutcome {
    Clarify {
        question: String,
        pending: FfiSymptomSummary,
    },
    Complete {
        summary: FfiSymptomSummary,
        triage: String,
        retrieval_query: String,
        conditions: Vec<FfiConditionRecord>,
    },
}

/// FFI-safe retrieved condition record.
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiConditionRecord {
    pub condition: String,
    pub content: String,
}

impl From<ConditionRecord> for FfiConditionRecord {
    fn from(record: ConditionRecord) -> Self {
        Self {
            condition: record.condition,
            content: record.content,
        }
    }
}

/// FFI-safe condition entry.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiConditionEntry {
    pub condition: String,
    pub symptoms: Vec<String>,
    pub causes: Vec<String>,
    pub risk_factors: Vec<String>,
    pub emergency_signs: Vec<String>,
    pub when_to_see_doctor: Vec<String>,
    pub self_care: Vec<String>,
    pub source: String,
}

impl From<FfiConditionEntry> for ConditionEntry {
    fn from(entry: FfiConditionEntry) -> Self {
        ConditionEntry {
            condition: entry.condition,
            symptoms: entry.symptoms,
            causes: entry.causes,
            risk_factors: entry.risk_factors,
            emergency_signs: entry.emergency_signs,
            when_to_see_doctor: entry.when_to_see_doctor,
            self_care: entry.self_care,
            source: entry.source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATASET: &str = r#"[
        {"condition": "Dengue", "symptoms": ["fever", "rash", "headache"], "source": "WHO"},
        {"condition": "Common cold", "symptoms": ["cough", "sore throat"], "source": "CDC"}
    ]"#;

    #[test]
    fn test_classify_triage_strings() {
        assert_eq!(
            classify_triage(vec!["fever".into()], Some("Severe".into()), Some(1)),
            "MODERATE RISK"
        );
        assert_eq!(
            classify_triage(vec!["bluish lips".into()], None, None),
            "HIGH RISK"
        );
        assert_eq!(classify_triage(vec![], Some("mild".into()), Some(1)), "LOW RISK");
    }

    #[test]
    fn test_normalize_and_extract() {
        assert_eq!(normalize_text("Thoda Bukhar".into()), "mild fever");

        let summary = extract_intake("thoda bukhar 2 din se".into());
        assert_eq!(summary.symptoms, vec!["fever"]);
        assert_eq!(summary.severity.as_deref(), Some("mild"));
        assert_eq!(summary.duration_days, Some(2));
    }

    #[test]
    fn test_session_flow_over_ffi() {
        let core = open_database_in_memory().unwrap();
        assert_eq!(core.import_conditions_json(DATASET.into()).unwrap(), 2);

        let session = core.start_session();
        let first = session.submit("fever and rash".into()).unwrap();
        match first {
            FfiTurnOutcome::Clarify { question, pending } => {
                assert_eq!(question, "For how many days have you had these symptoms?");
                assert_eq!(pending.symptoms, vec!["fever", "rash"]);
            }
            other => panic!("expected clarification, got {:?}", other),
        }
        assert!(session.is_collecting().unwrap());

        let second = session.submit("3 days, severe".into()).unwrap();
        match second {
            FfiTurnOutcome::Complete {
                summary,
                triage,
                retrieval_query,
                conditions,
            } => {
                assert_eq!(summary.duration_days, Some(3));
                assert_eq!(triage, "MODERATE RISK");
                assert_eq!(retrieval_query, "fever rash");
                assert_eq!(conditions[0].condition, "Dengue");
            }
            other => panic!("expected completion, got {:?}", other),
        }
        assert!(!session.is_collecting().unwrap());
    }

    #[test]
    fn test_intake_error_mapping() {
        assert!(matches!(
            SymptomIntakeError::from(intake::IntakeError::TurnInProgress),
            SymptomIntakeError::SessionBusy(_)
        ));
        assert!(matches!(
            SymptomIntakeError::from(intake::IntakeError::Poisoned("lock".into())),
            SymptomIntakeError::SessionPoisoned(_)
        ));
    }

    #[test]
    fn test_busy_session_over_ffi() {
        let core = open_database_in_memory().unwrap();
        let session = core.start_session();

        let held = session.session.begin_turn().unwrap();
        assert!(matches!(
            session.submit("fever".into()),
            Err(SymptomIntakeError::SessionBusy(_))
        ));
        drop(held);
        assert!(session.submit("fever".into()).is_ok());
    }

    #[test]
    fn test_reset_session() {
        let core = open_database_in_memory().unwrap();
        let session = core.start_session();

        session.submit("headache".into()).unwrap();
        session.reset().unwrap();
        assert!(!session.is_collecting().unwrap());
        assert!(!session.session_id().unwrap().is_empty());
    }

    #[test]
    fn test_upsert_condition_rejects_blank_name() {
        let core = open_database_in_memory().unwrap();
        let entry = FfiConditionEntry {
            condition: "  ".into(),
            symptoms: vec![],
            causes: vec![],
            risk_factors: vec![],
            emergency_signs: vec![],
            when_to_see_doctor: vec![],
            self_care: vec![],
            source: String::new(),
        };

        assert!(matches!(
            core.upsert_condition(entry),
            Err(SymptomIntakeError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_search_conditions_over_ffi() {
        let core = open_database_in_memory().unwrap();
        core.import_conditions_json(DATASET.into()).unwrap();

        let results = core.search_conditions("sore throat".into(), 3).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].condition, "Common cold");
    }
}
