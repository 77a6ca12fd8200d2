//! Response generators.

use symptom_intake_core::pipeline::{GenerationError, ResponseGenerator};

/// Generator returning fixed text, for tests and offline use.
#[derive(Debug, Clone)]
pub struct MockGenerator {
    response: String,
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_MOCK_RESPONSE)
    }
}

impl MockGenerator {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

impl ResponseGenerator for MockGenerator {
    fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        Ok(self.response.clone())
    }
}

/// Canned sectioned answer used by [`MockGenerator::default`].
pub const DEFAULT_MOCK_RESPONSE: &str = "1. **Explanation**
These symptoms may have several explanations.
2. **Possible Causes (Not a Diagnosis)**
A viral infection could possibly explain them.
3. **Red Flags to Watch For**
Difficulty breathing or bluish lips.
4. **When to Seek Medical Care**
If symptoms persist beyond three days or get worse.
5. **Self-Care (Safe Only)**
Rest and drink plenty of fluids.
6. **Sources**
WHO, CDC
7. **Disclaimer**
This is general information and not a diagnosis.";

#[cfg(feature = "gemini")]
pub use gemini::GeminiGenerator;

#[cfg(feature = "gemini")]
mod gemini {
    use std::time::Duration;

    use reqwest::blocking::Client;
    use serde::{Deserialize, Serialize};
    use symptom_intake_core::pipeline::{GenerationError, ResponseGenerator};

    use crate::config::GeminiConfig;

    const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

    #[derive(Serialize)]
    struct GenerateRequest<'a> {
        contents: Vec<Content<'a>>,
    }

    #[derive(Serialize)]
    struct Content<'a> {
        parts: Vec<Part<'a>>,
    }

    #[derive(Serialize)]
    struct Part<'a> {
        text: &'a str,
    }

    #[derive(Deserialize)]
    struct GenerateResponse {
        #[serde(default)]
        candidates: Vec<Candidate>,
    }

    #[derive(Deserialize)]
    struct Candidate {
        content: Option<CandidateContent>,
    }

    #[derive(Deserialize)]
    struct CandidateContent {
        #[serde(default)]
        parts: Vec<CandidatePart>,
    }

    #[derive(Deserialize)]
    struct CandidatePart {
        text: Option<String>,
    }

    /// Generator backed by the Gemini `generateContent` REST endpoint.
    pub struct GeminiGenerator {
        client: Client,
        config: GeminiConfig,
    }

    impl GeminiGenerator {
        pub fn new(config: GeminiConfig) -> Result<Self, GenerationError> {
            let client = Client::builder()
                .timeout(Duration::from_millis(config.timeout_ms))
                .build()
                .map_err(|e| GenerationError::Request(format!("Failed to build HTTP client: {}", e)))?;
            Ok(Self { client, config })
        }

        /// Build from environment variables (see [`GeminiConfig::from_env`]).
        pub fn from_env() -> Result<Self, GenerationError> {
            Self::new(GeminiConfig::from_env())
        }

        pub fn config(&self) -> &GeminiConfig {
            &self.config
        }
    }

    impl ResponseGenerator for GeminiGenerator {
        fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
            let api_key = self.config.api_key.as_deref().ok_or_else(|| {
                GenerationError::NotConfigured("GEMINI_API_KEY or GOOGLE_API_KEY is not set".into())
            })?;

            let url = format!("{}/models/{}:generateContent", API_BASE, self.config.model);
            let body = GenerateRequest {
                contents: vec![Content {
                    parts: vec![Part { text: prompt }],
                }],
            };

            tracing::debug!(model = %self.config.model, prompt_len = prompt.len(), "Calling Gemini");

            let resp = self
                .client
                .post(url)
                .header("x-goog-api-key", api_key)
                .json(&body)
                .send()
                .map_err(|e| GenerationError::Request(e.to_string()))?;

            let status = resp.status();
            if !status.is_success() {
                let message = resp
                    .text()
                    .unwrap_or_else(|_| "Unable to read response body".to_string());
                return Err(GenerationError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let parsed: GenerateResponse = resp
                .json()
                .map_err(|e| GenerationError::Request(e.to_string()))?;

            let text: String = parsed
                .candidates
                .into_iter()
                .next()
                .and_then(|c| c.content)
                .map(|content| {
                    content
                        .parts
                        .into_iter()
                        .filter_map(|p| p.text)
                        .collect()
                })
                .unwrap_or_default();

            if text.is_empty() {
                return Err(GenerationError::EmptyResponse);
            }
            Ok(text)
        }
    }

}
