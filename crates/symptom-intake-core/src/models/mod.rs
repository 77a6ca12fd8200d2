//! Domain models for the symptom intake system.

mod answer;
mod condition;
mod symptom;
mod triage;

pub use answer::*;
pub use condition::*;
pub use symptom::*;
pub use triage::*;
