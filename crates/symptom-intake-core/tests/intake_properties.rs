//! Property tests for extraction, merging and triage.

use std::collections::BTreeSet;

use proptest::prelude::*;
use symptom_intake_core::intake::{
    merge, needs_clarification, next_question, ClarifyingQuestion, FieldExtractor,
};
use symptom_intake_core::models::{Severity, SymptomStruct, TriageLevel};
use symptom_intake_core::triage::TriageClassifier;

const VOCAB: &[&str] = &[
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
];

const RED_FLAGS: &[&str] = &[
    "difficulty breathing",
    "severe chest pain",
    "loss of consciousness",
    "one-sided weakness",
    "vomiting blood",
    "bluish lips",
    "bleeding",
    "severe abdominal pain",
];

fn severity_strategy() -> impl Strategy<Value = Option<Severity>> {
    prop_oneof![
        Just(None),
        Just(Some(Severity::Mild)),
        Just(Some(Severity::Moderate)),
        Just(Some(Severity::Severe)),
    ]
}

fn symptom_struct_strategy() -> impl Strategy<Value = SymptomStruct> {
    (
        prop::collection::btree_set(prop::sample::select(VOCAB), 0..4),
        severity_strategy(),
        prop::option::of(0u32..30),
    )
        .prop_map(|(symptoms, severity, duration)| SymptomStruct {
            symptoms: symptoms.into_iter().map(String::from).collect(),
            severity,
            duration,
        })
}

proptest! {
    #[test]
    fn extracted_symptoms_are_vocabulary_terms(text in ".{0,80}") {
        let extractor = FieldExtractor::new();
        let symptoms = extractor.extract_symptoms(&text);
        let vocabulary: BTreeSet<&str> = extractor.vocabulary().iter().map(String::as_str).collect();

        for symptom in &symptoms {
            prop_assert!(vocabulary.contains(symptom.as_str()));
        }
    }

    #[test]
    fn extraction_is_deterministic(text in ".{0,80}") {
        let extractor = FieldExtractor::new();
        prop_assert_eq!(extractor.extract(&text), extractor.extract(&text));
    }

    #[test]
    fn vocabulary_terms_in_text_are_found(
        picked in prop::collection::btree_set(prop::sample::select(VOCAB), 1..4),
        filler in "[ .,]{1,3}",
    ) {
        let text = picked.iter().copied().collect::<Vec<_>>().join(filler.as_str());
        let symptoms = FieldExtractor::new().extract_symptoms(&text);

        for term in picked {
            prop_assert!(symptoms.contains(term));
        }
    }

    #[test]
    fn merge_with_self_is_identity(s in symptom_struct_strategy()) {
        prop_assert_eq!(merge(&s, &s), s);
    }

    #[test]
    fn merge_fills_forward(
        pending in symptom_struct_strategy(),
        fresh in symptom_struct_strategy(),
    ) {
        let merged = merge(&pending, &fresh);

        prop_assert_eq!(merged.severity, fresh.severity.or(pending.severity));
        prop_assert_eq!(merged.duration, fresh.duration.or(pending.duration));
        if fresh.symptoms.is_empty() {
            prop_assert_eq!(&merged.symptoms, &pending.symptoms);
        } else {
            prop_assert_eq!(&merged.symptoms, &fresh.symptoms);
        }
    }

    #[test]
    fn clarification_truth_table(s in symptom_struct_strategy()) {
        let expected = s.severity.is_none() || s.duration.is_none();
        prop_assert_eq!(needs_clarification(&s), expected);
        prop_assert_eq!(next_question(&s).is_some(), expected);
    }

    #[test]
    fn duration_asked_before_severity(s in symptom_struct_strategy()) {
        let question = next_question(&s);
        if s.duration.is_none() {
            prop_assert_eq!(question, Some(ClarifyingQuestion::Duration));
        } else if s.severity.is_none() {
            prop_assert_eq!(question, Some(ClarifyingQuestion::Severity));
        } else {
            prop_assert_eq!(question, None);
        }
    }

    #[test]
    fn triage_is_pure(s in symptom_struct_strategy()) {
        let classifier = TriageClassifier::new();
        let first = classifier.classify_intake(&s);
        let second = TriageClassifier::new().classify_intake(&s);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn red_flag_is_always_high(
        flag in prop::sample::select(RED_FLAGS),
        s in symptom_struct_strategy(),
    ) {
        let mut symptoms: Vec<String> = s.symptoms.into_iter().collect();
        symptoms.push(flag.to_uppercase());

        let level = TriageClassifier::new().classify(&symptoms, s.severity, s.duration);
        prop_assert_eq!(level, TriageLevel::High);
    }

    #[test]
    fn no_severity_without_red_flag_is_low(duration in prop::option::of(0u32..365)) {
        let level = TriageClassifier::new().classify(&["fever"], None, duration);
        prop_assert_eq!(level, TriageLevel::Low);
    }
}
