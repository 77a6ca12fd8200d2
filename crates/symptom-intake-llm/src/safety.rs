//! Safety formatting: split generated text into fixed answer sections.
//!
//! A line is a heading when it contains one of the section keywords; the
//! heading line itself is dropped and the following lines are appended to
//! that section. Lines before the first heading are discarded.

use symptom_intake_core::pipeline::ResponseFormatter;
use symptom_intake_core::{StructuredAnswer, TriageLevel};

/// Answer section a heading switches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Causes,
    RedFlags,
    Doctor,
    SelfCare,
    Sources,
    Disclaimer,
}

/// Heading keywords, checked in order. The first keyword found wins.
const HEADING_KEYWORDS: &[(&str, Section)] = &[
    ("cause", Section::Causes),
    ("red flag", Section::RedFlags),
    ("watch", Section::RedFlags),
    ("doctor", Section::Doctor),
    ("seek", Section::Doctor),
    ("self", Section::SelfCare),
    ("home", Section::SelfCare),
    ("source", Section::Sources),
    ("disclaimer", Section::Disclaimer),
];

/// Section a line switches to, if it is a heading.
pub fn heading_section(line: &str) -> Option<Section> {
    let lowered = line.trim().to_lowercase();
    HEADING_KEYWORDS
        .iter()
        .find(|(keyword, _)| lowered.contains(keyword))
        .map(|(_, section)| *section)
}

fn section_mut(answer: &mut StructuredAnswer, section: Section) -> &mut String {
    match section {
        Section::Causes => &mut answer.causes,
        Section::RedFlags => &mut answer.red_flags,
        Section::Doctor => &mut answer.doctor,
        Section::SelfCare => &mut answer.self_care,
        Section::Sources => &mut answer.sources,
        Section::Disclaimer => &mut answer.disclaimer,
    }
}

/// Split raw text into sections, filling the disclaimer when missing.
pub fn split_sections(raw: &str) -> StructuredAnswer {
    let mut answer = StructuredAnswer::default();
    let mut current = None;

    for line in raw.split('\n') {
        match heading_section(line) {
            Some(section) => current = Some(section),
            None => {
                if let Some(section) = current {
                    let target = section_mut(&mut answer, section);
                    target.push_str(line);
                    target.push('\n');
                }
            }
        }
    }

    answer.ensure_disclaimer();
    answer
}

/// Default [`ResponseFormatter`] using keyword headings.
#[derive(Debug, Clone, Copy, Default)]
pub struct SafetyFormatter;

impl ResponseFormatter for SafetyFormatter {
    fn format(&self, raw: &str, triage: TriageLevel) -> StructuredAnswer {
        let answer = split_sections(raw);
        tracing::debug!(
            triage = %triage,
            has_causes = !answer.causes.is_empty(),
            has_red_flags = !answer.red_flags.is_empty(),
            "Formatted generated answer"
        );
        answer
    }
}
