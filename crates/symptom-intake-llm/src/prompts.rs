//! Answer-generation prompts for the symptom assistant.

use symptom_intake_core::pipeline::PromptBuilder;
use symptom_intake_core::ConditionRecord;

/// Role statement opening every prompt.
pub const ROLE_PROMPT: &str = "You are a medical information assistant. You do not diagnose or prescribe treatment. You explain possible causes, red flag symptoms, and when to seek medical care.";

/// Response sections the model is asked to produce, in order.
pub const RESPONSE_SECTIONS: &[&str] = &[
    "Explanation",
    "Possible Causes (Not a Diagnosis)",
    "Red Flags to Watch For",
    "When to Seek Medical Care",
    "Self-Care (Safe Only)",
    "Sources",
    "Disclaimer",
];

/// Safety rules appended to every prompt.
pub const SAFETY_RULES: &[&str] = &[
    "Use differential language: \"may\", \"could\", \"possibly\"",
    "Do NOT prescribe medications",
    "Do NOT provide doses",
    "Do NOT claim diagnosis",
    "Include only medically safe self-care",
    "Keep tone calm, professional, and informative",
];

/// Render retrieved records as `---` separated context blocks.
pub fn format_context(records: &[ConditionRecord]) -> String {
    let mut context = String::new();
    for record in records {
        context.push_str("\n\n---\nCondition: ");
        context.push_str(&record.condition);
        context.push('\n');
        context.push_str(&record.content);
    }
    context
}

/// Build the full generation prompt.
pub fn make_medical_prompt(user_text: &str, records: &[ConditionRecord], triage_level: &str) -> String {
    let sections = RESPONSE_SECTIONS
        .iter()
        .enumerate()
        .map(|(i, title)| format!("{}. **{}**", i + 1, title))
        .collect::<Vec<_>>()
        .join("\n");

    let rules = SAFETY_RULES
        .iter()
        .map(|rule| format!("- {}", rule))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"
{}

User Query:
{}

Retrieved Medical Context:
{}

Triage Level: {}

Structure your response as:

{}

Rules:
{}

Now generate the response.
"#,
        ROLE_PROMPT,
        user_text,
        format_context(records),
        triage_level,
        sections,
        rules
    )
}

/// Default [`PromptBuilder`] for medical information answers.
#[derive(Debug, Clone, Copy, Default)]
pub struct MedicalPromptBuilder;

impl PromptBuilder for MedicalPromptBuilder {
    fn build(&self, user_text: &str, records: &[ConditionRecord], triage_level: &str) -> String {
        make_medical_prompt(user_text, records, triage_level)
    }
}
