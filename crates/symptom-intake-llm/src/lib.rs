//! Answer generation for completed symptom intakes.
//!
//! Provides the default prompt builder, response generators and the safety
//! formatter plugged into `symptom_intake_core::Assistant`. The Gemini REST
//! generator is compiled only with the `gemini` feature.

pub mod config;
pub mod generation;
pub mod prompts;
pub mod safety;

pub use config::*;
pub use generation::*;
pub use prompts::*;
pub use safety::*;
