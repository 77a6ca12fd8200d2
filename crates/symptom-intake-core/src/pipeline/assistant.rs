//! Per-turn orchestration of intake, triage and answer generation.

use super::{
    AssistantConfig, ConditionRetriever, PromptBuilder, ResponseFormatter, ResponseGenerator,
};
use crate::intake::{Accumulator, ClarifyingQuestion, IntakeResult, IntakeSession, SharedSession, TurnOutcome};
use crate::models::{ConditionRecord, FinalAnswer, SymptomStruct};
use crate::triage::TriageClassifier;

/// Retrieve context for a completed intake, degrading to no context on failure.
pub fn retrieve_context<R>(retriever: &R, query: &str, top_k: usize) -> Vec<ConditionRecord>
where
    R: ConditionRetriever + ?Sized,
{
    match retriever.retrieve(query, top_k) {
        Ok(records) => {
            tracing::debug!(query, count = records.len(), "Retrieved condition context");
            records
        }
        Err(e) => {
            tracing::warn!(error = %e, query, "Retrieval failed, continuing without context");
            Vec::new()
        }
    }
}

/// What the assistant says back for one user turn.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnReply {
    /// Ask one clarifying question; no triage or generation happened.
    Question {
        question: ClarifyingQuestion,
        pending: SymptomStruct,
    },
    /// The intake is complete and an answer was produced.
    Answer(FinalAnswer),
}

/// Symptom assistant wiring the core to its collaborators.
pub struct Assistant<R, P, G, F> {
    accumulator: Accumulator,
    classifier: TriageClassifier,
    retriever: R,
    prompts: P,
    generator: G,
    formatter: F,
    config: AssistantConfig,
}

impl<R, P, G, F> Assistant<R, P, G, F>
where
    R: ConditionRetriever,
    P: PromptBuilder,
    G: ResponseGenerator,
    F: ResponseFormatter,
{
    /// Create an assistant with default extraction, triage and config.
    pub fn new(retriever: R, prompts: P, generator: G, formatter: F) -> Self {
        Self {
            accumulator: Accumulator::new(),
            classifier: TriageClassifier::new(),
            retriever,
            prompts,
            generator,
            formatter,
            config: AssistantConfig::default(),
        }
    }

    pub fn with_config(mut self, config: AssistantConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_accumulator(mut self, accumulator: Accumulator) -> Self {
        self.accumulator = accumulator;
        self
    }

    pub fn with_classifier(mut self, classifier: TriageClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Handle one user turn for a session.
    pub fn handle_turn(&self, session: &mut IntakeSession, text: &str) -> TurnReply {
        match self.accumulator.advance(session, text) {
            TurnOutcome::Clarify { question, pending } => TurnReply::Question { question, pending },
            TurnOutcome::Complete(intake) => TurnReply::Answer(self.answer(text, intake)),
        }
    }

    /// Handle one user turn on a shared session, rejecting overlapping turns.
    ///
    /// The session stays claimed until the reply is built, including
    /// retrieval and generation.
    pub fn handle_shared_turn(&self, session: &SharedSession, text: &str) -> IntakeResult<TurnReply> {
        let mut guard = session.begin_turn()?;
        Ok(self.handle_turn(&mut guard, text))
    }

    /// Triage, retrieve, generate and format for a completed intake.
    fn answer(&self, text: &str, intake: SymptomStruct) -> FinalAnswer {
        let triage = self.classifier.classify_intake(&intake);
        tracing::info!(triage = %triage, "Triage assigned");

        let retrieved = retrieve_context(&self.retriever, &intake.retrieval_query(), self.config.top_k);
        let prompt = self.prompts.build(text, &retrieved, triage.as_str());

        let raw = match self.generator.generate(&prompt) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "Generation failed, passing error text through");
                format!("[ERROR] {}", e)
            }
        };

        let answer = self.formatter.format(&raw, triage);

        FinalAnswer {
            answer,
            triage,
            intake,
            retrieved,
        }
    }

    /// Get the classifier for direct access.
    pub fn classifier(&self) -> &TriageClassifier {
        &self.classifier
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::models::{Severity, StructuredAnswer, TriageLevel, DEFAULT_DISCLAIMER};
    use crate::pipeline::{GenerationError, RetrievalError};

    struct StubRetriever {
        fail: bool,
        queries: RefCell<Vec<(String, usize)>>,
    }

    impl StubRetriever {
        fn new(fail: bool) -> Self {
            Self {
                fail,
                queries: RefCell::new(Vec::new()),
            }
        }
    }

    impl ConditionRetriever for StubRetriever {
        fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<ConditionRecord>, RetrievalError> {
            self.queries.borrow_mut().push((query.to_string(), top_k));
            if self.fail {
                return Err(RetrievalError::Unavailable("index offline".into()));
            }
            Ok(vec![ConditionRecord {
                condition: "Dengue".into(),
                content: "Condition: Dengue".into(),
            }])
        }
    }

    struct EchoPrompts;

    impl PromptBuilder for EchoPrompts {
        fn build(&self, user_text: &str, records: &[ConditionRecord], triage_level: &str) -> String {
            format!("{}|{}|{}", user_text, records.len(), triage_level)
        }
    }

    struct StubGenerator {
        fail: bool,
        prompts: RefCell<Vec<String>>,
    }

    impl StubGenerator {
        fn new(fail: bool) -> Self {
            Self {
                fail,
                prompts: RefCell::new(Vec::new()),
            }
        }
    }

    impl ResponseGenerator for StubGenerator {
        fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
            self.prompts.borrow_mut().push(prompt.to_string());
            if self.fail {
                return Err(GenerationError::Request("timeout".into()));
            }
            Ok(format!("Causes\nviral\n{}", prompt))
        }
    }

    struct RawFormatter;

    impl ResponseFormatter for RawFormatter {
        fn format(&self, raw: &str, _triage: TriageLevel) -> StructuredAnswer {
            let mut answer = StructuredAnswer {
                causes: raw.to_string(),
                ..Default::default()
            };
            answer.ensure_disclaimer();
            answer
        }
    }

    fn assistant(
        retriever_fails: bool,
        generator_fails: bool,
    ) -> Assistant<StubRetriever, EchoPrompts, StubGenerator, RawFormatter> {
        Assistant::new(
            StubRetriever::new(retriever_fails),
            EchoPrompts,
            StubGenerator::new(generator_fails),
            RawFormatter,
        )
    }

    #[test]
    fn test_question_turn_skips_collaborators() {
        let assistant = assistant(false, false);
        let mut session = IntakeSession::new();

        let reply = assistant.handle_turn(&mut session, "difficulty breathing");
        assert!(matches!(
            reply,
            TurnReply::Question {
                question: ClarifyingQuestion::Duration,
                ..
            }
        ));
        assert!(assistant.retriever.queries.borrow().is_empty());
        assert!(assistant.generator.prompts.borrow().is_empty());
    }

    #[test]
    fn test_complete_turn_runs_pipeline() {
        let assistant = assistant(false, false);
        let mut session = IntakeSession::new();

        let reply = assistant.handle_turn(&mut session, "3 days fever and rash, severe");
        let answer = match reply {
            TurnReply::Answer(answer) => answer,
            other => panic!("expected answer, got {:?}", other),
        };

        assert_eq!(answer.triage, TriageLevel::Moderate);
        assert_eq!(answer.intake.severity, Some(Severity::Severe));
        assert_eq!(answer.retrieved.len(), 1);
        assert_eq!(
            assistant.retriever.queries.borrow().as_slice(),
            &[("fever rash".to_string(), 3)]
        );
        assert_eq!(
            assistant.generator.prompts.borrow().as_slice(),
            &["3 days fever and rash, severe|1|MODERATE RISK".to_string()]
        );
        assert!(!session.is_collecting());
    }

    #[test]
    fn test_retrieval_failure_continues_without_context() {
        let assistant = assistant(true, false);
        let mut session = IntakeSession::new();

        let reply = assistant.handle_turn(&mut session, "2 days cough, mild");
        match reply {
            TurnReply::Answer(answer) => {
                assert!(answer.retrieved.is_empty());
                assert_eq!(answer.triage, TriageLevel::Low);
            }
            other => panic!("expected answer, got {:?}", other),
        }
        assert!(!session.is_collecting());
    }

    #[test]
    fn test_generation_failure_passes_error_text() {
        let assistant = assistant(false, true);
        let mut session = IntakeSession::new();

        let reply = assistant.handle_turn(&mut session, "2 days cough, mild");
        match reply {
            TurnReply::Answer(answer) => {
                assert!(answer.answer.causes.starts_with("[ERROR] "));
                assert!(answer.answer.causes.contains("timeout"));
                assert_eq!(answer.answer.disclaimer, DEFAULT_DISCLAIMER);
            }
            other => panic!("expected answer, got {:?}", other),
        }
        // A downstream failure never puts the session back into collecting.
        assert!(!session.is_collecting());
    }

    #[test]
    fn test_custom_top_k() {
        let assistant = assistant(false, false).with_config(AssistantConfig { top_k: 5 });
        let mut session = IntakeSession::new();

        assistant.handle_turn(&mut session, "1 day headache, mild");
        assert_eq!(assistant.retriever.queries.borrow()[0].1, 5);
        assert_eq!(assistant.config().top_k, 5);
    }

    #[test]
    fn test_shared_turn_rejects_overlap() {
        let assistant = assistant(false, false);
        let shared = SharedSession::new();

        let held = shared.begin_turn().unwrap();
        assert!(assistant.handle_shared_turn(&shared, "fever").is_err());
        drop(held);

        let reply = assistant.handle_shared_turn(&shared, "fever").unwrap();
        assert!(matches!(reply, TurnReply::Question { .. }));
    }
}
