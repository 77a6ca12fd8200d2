//! Generator configuration from the environment.

/// Model used when `GEMINI_MODEL` is not set.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Request timeout used when `GEMINI_TIMEOUT_MS` is not set or invalid.
pub const DEFAULT_TIMEOUT_MS: u64 = 60_000;

/// Settings for the Gemini generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiConfig {
    /// API key; generation reports `NotConfigured` without one
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_ms: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl GeminiConfig {
    /// Load from the process environment, reading `.env` first if present.
    ///
    /// `GEMINI_API_KEY` takes precedence over `GOOGLE_API_KEY`.
    pub fn from_env() -> Self {
        // Missing .env is fine
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = non_empty("GEMINI_API_KEY").or_else(|| non_empty("GOOGLE_API_KEY"));
        let model = non_empty("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());
        let timeout_ms = non_empty("GEMINI_TIMEOUT_MS")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_MS);

        if api_key.is_none() {
            tracing::warn!("No GEMINI_API_KEY or GOOGLE_API_KEY set; generation will fail");
        }

        Self {
            api_key,
            model,
            timeout_ms,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_vars() {
        let config = GeminiConfig::from_lookup(lookup(&[]));
        assert_eq!(config, GeminiConfig::default());
        assert!(!config.is_configured());
    }

    #[test]
    fn test_gemini_key_preferred() {
        let config = GeminiConfig::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "gem"),
            ("GOOGLE_API_KEY", "goog"),
        ]));
        assert_eq!(config.api_key.as_deref(), Some("gem"));

        let config = GeminiConfig::from_lookup(lookup(&[
            ("GEMINI_API_KEY", " "),
            ("GOOGLE_API_KEY", "goog"),
        ]));
        assert_eq!(config.api_key.as_deref(), Some("goog"));
    }

    #[test]
    fn test_model_and_timeout_overrides() {
        let config = GeminiConfig::from_lookup(lookup(&[
            ("GEMINI_MODEL", "gemini-2.5-pro"),
            ("GEMINI_TIMEOUT_MS", "1500"),
        ]));
        assert_eq!(config.model, "gemini-2.5-pro");
        assert_eq!(config.timeout_ms, 1500);

        let config = GeminiConfig::from_lookup(lookup(&[("GEMINI_TIMEOUT_MS", "soon")]));
        assert_eq!(config.timeout_ms, DEFAULT_TIMEOUT_MS);
    }
}
