//! Symptom intake: normalization, field extraction and turn accumulation.
//!
//! Pipeline: Normalization → Extraction → Merge with pending → Question or Complete

mod accumulator;
mod extractor;
mod normalizer;
mod session;

pub use accumulator::*;
pub use extractor::*;
pub use normalizer::*;
pub use session::*;

use thiserror::Error;

/// Intake errors.
///
/// Extraction itself never fails; these cover session handling only.
#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("A turn is already in progress for this session")]
    TurnInProgress,

    #[error("Session lock poisoned: {0}")]
    Poisoned(String),
}

pub type IntakeResult<T> = Result<T, IntakeError>;
