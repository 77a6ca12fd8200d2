//! Colloquial text normalizer.
//!
//! Handles:
//! - Lowercasing
//! - Hinglish / casual term substitution (bukhar→fever, pet dard→abdominal pain)
//!
//! Substitution is plain substring replacement, applied in table order. It is
//! not word-boundary aware, so a term embedded in a longer word is replaced
//! too.

/// Normalizer for free-text symptom descriptions.
pub struct Normalizer {
    /// Ordered term map: colloquial term → canonical English
    terms: Vec<(String, String)>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    /// Create a new normalizer with the default term table.
    pub fn new() -> Self {
        Self {
            terms: Self::default_terms(),
        }
    }

    /// Lowercase the text and substitute every known colloquial term.
    pub fn normalize(&self, text: &str) -> String {
        let mut normalized = text.to_lowercase();
        for (term, canonical) in &self.terms {
            if normalized.contains(term.as_str()) {
                normalized = normalized.replace(term.as_str(), canonical);
            }
        }
        normalized
    }

    /// Append a custom term mapping. Existing mappings keep precedence.
    pub fn add_term(&mut self, term: &str, canonical: &str) {
        self.terms
            .push((term.to_lowercase(), canonical.to_lowercase()));
    }

    /// The term table in application order.
    pub fn terms(&self) -> &[(String, String)] {
        &self.terms
    }

    /// Default Hinglish term mappings.
    fn default_terms() -> Vec<(String, String)> {
        [
            ("bukhar", "fever"),
            ("thoda", "mild"),
            ("zyada", "severe"),
            ("badan dard", "body ache"),
            ("chakkar", "dizziness"),
            ("ulti", "vomiting"),
            ("khansi", "cough"),
            ("galey mein dard", "sore throat"),
            ("saans nahi aa rhi", "difficulty breathing"),
            ("saans phoolna", "shortness of breath"),
            ("thand lagna", "chills"),
            ("thand lag rahi", "chills"),
            ("pet dard", "abdominal pain"),
            ("pet mein dard", "abdominal pain"),
        ]
        .into_iter()
        .map(|(term, canonical)| (term.to_string(), canonical.to_string()))
        .collect()
    }
}
