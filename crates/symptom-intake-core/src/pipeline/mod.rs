//! Turn pipeline and the collaborator interfaces it calls.
//!
//! ```text
//! text → Accumulator ─┬─ incomplete → clarifying question
//!                     └─ complete → Triage → Retrieve → Prompt → Generate → Format
//! ```
//!
//! Collaborators run only after the intake is complete and the session is
//! idle again, so their failures cannot leave a session collecting.

mod assistant;

pub use assistant::*;

use thiserror::Error;

use crate::models::{ConditionRecord, StructuredAnswer, TriageLevel};

/// Retrieval errors.
#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error("Retrieval backend error: {0}")]
    Backend(String),

    #[error("Retrieval unavailable: {0}")]
    Unavailable(String),
}

/// Generation errors.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Generation request failed: {0}")]
    Request(String),

    #[error("Generation API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Empty generation response")]
    EmptyResponse,

    #[error("Generator not configured: {0}")]
    NotConfigured(String),
}

/// Background text lookup for a set of symptoms.
pub trait ConditionRetriever {
    /// Return up to `top_k` records for a space-joined symptom query, best first.
    fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<ConditionRecord>, RetrievalError>;
}

/// Builds the generation prompt.
pub trait PromptBuilder {
    /// `triage_level` is one of the literal [`TriageLevel`] strings.
    fn build(&self, user_text: &str, records: &[ConditionRecord], triage_level: &str) -> String;
}

/// Produces raw response text from a prompt.
pub trait ResponseGenerator {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Splits raw response text into answer sections.
pub trait ResponseFormatter {
    /// The returned disclaimer is never empty.
    fn format(&self, raw: &str, triage: TriageLevel) -> StructuredAnswer;
}

/// Number of condition records retrieved per completed intake.
pub const DEFAULT_TOP_K: usize = 3;

/// Orchestrator settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantConfig {
    /// Records requested from the retriever
    pub top_k: usize,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
        }
    }
}
