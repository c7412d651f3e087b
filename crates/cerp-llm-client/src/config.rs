//! Collaborator configuration.
//!
//! Both collaborators are optional. An unset endpoint means "not
//! configured", and the extraction service falls back accordingly; only a
//! present-but-malformed value is an error.

use url::Url;

/// Default extraction model.
pub const DEFAULT_MODEL: &str = "gemini-3-pro-preview";
/// Default LLM request timeout in seconds.
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 60;
/// Default knowledge-base request timeout in seconds.
pub const DEFAULT_KNOWLEDGE_TIMEOUT_SECS: u64 = 10;
/// Default number of snippets retrieved per query.
pub const DEFAULT_TOP_K: usize = 3;

/// LLM gateway configuration.
///
/// Custom `Debug` implementation redacts the `api_key` field.
#[derive(Clone)]
pub struct LlmConfig {
    /// Full URL of the extraction endpoint.
    pub url: Url,
    pub api_key: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("url", &self.url)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl LlmConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `CERP_LLM_URL` (required)
    /// - `CERP_LLM_API_KEY` (required)
    /// - `CERP_LLM_MODEL` (default: `gemini-3-pro-preview`)
    /// - `CERP_LLM_TIMEOUT_SECS` (default: 60)
    ///
    /// Returns `Ok(None)` when either required variable is unset.
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit variable source.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Option<Self>, ConfigError> {
        let (Some(raw_url), Some(api_key)) = (
            non_empty(lookup("CERP_LLM_URL")),
            non_empty(lookup("CERP_LLM_API_KEY")),
        ) else {
            return Ok(None);
        };
        Ok(Some(Self {
            url: parse_url("CERP_LLM_URL", &raw_url)?,
            api_key,
            model: non_empty(lookup("CERP_LLM_MODEL"))
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            timeout_secs: parse_or(
                "CERP_LLM_TIMEOUT_SECS",
                lookup("CERP_LLM_TIMEOUT_SECS"),
                DEFAULT_LLM_TIMEOUT_SECS,
            )?,
        }))
    }
}

/// Knowledge-base retrieval configuration.
#[derive(Debug, Clone)]
pub struct KnowledgeConfig {
    /// Full URL of the query endpoint.
    pub url: Url,
    pub top_k: usize,
    pub timeout_secs: u64,
}

impl KnowledgeConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `CERP_KNOWLEDGE_URL` (required)
    /// - `CERP_KNOWLEDGE_TOP_K` (default: 3)
    ///
    /// Returns `Ok(None)` when `CERP_KNOWLEDGE_URL` is unset.
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Option<Self>, ConfigError> {
        let Some(raw_url) = non_empty(lookup("CERP_KNOWLEDGE_URL")) else {
            return Ok(None);
        };
        Ok(Some(Self {
            url: parse_url("CERP_KNOWLEDGE_URL", &raw_url)?,
            top_k: parse_or(
                "CERP_KNOWLEDGE_TOP_K",
                lookup("CERP_KNOWLEDGE_TOP_K"),
                DEFAULT_TOP_K,
            )?,
            timeout_secs: DEFAULT_KNOWLEDGE_TIMEOUT_SECS,
        }))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_url(var: &str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

fn parse_or<T: std::str::FromStr>(
    var: &str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match non_empty(raw) {
        None => Ok(default),
        Some(v) => v
            .parse()
            .map_err(|_| ConfigError::InvalidValue(var.to_string(), v)),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("invalid value for {0}: {1:?}")]
    InvalidValue(String, String),
    #[error("API key contains characters not allowed in an HTTP header")]
    InvalidCredential,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn llm_unconfigured_without_url_or_key() {
        assert!(LlmConfig::from_lookup(vars(&[])).unwrap().is_none());
        assert!(LlmConfig::from_lookup(vars(&[("CERP_LLM_URL", "http://llm")]))
            .unwrap()
            .is_none());
        assert!(LlmConfig::from_lookup(vars(&[("CERP_LLM_API_KEY", "k")]))
            .unwrap()
            .is_none());
    }

    #[test]
    fn llm_defaults_applied() {
        let cfg = LlmConfig::from_lookup(vars(&[
            ("CERP_LLM_URL", "http://127.0.0.1:9000/v1/extract"),
            ("CERP_LLM_API_KEY", "secret"),
        ]))
        .unwrap()
        .unwrap();
        assert_eq!(cfg.model, DEFAULT_MODEL);
        assert_eq!(cfg.timeout_secs, 60);
        assert_eq!(cfg.url.path(), "/v1/extract");
    }

    #[test]
    fn llm_debug_redacts_key() {
        let cfg = LlmConfig::from_lookup(vars(&[
            ("CERP_LLM_URL", "http://llm"),
            ("CERP_LLM_API_KEY", "super-secret"),
        ]))
        .unwrap()
        .unwrap();
        let debug = format!("{cfg:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("super-secret"));
    }

    #[test]
    fn invalid_values_rejected() {
        let bad_url = LlmConfig::from_lookup(vars(&[
            ("CERP_LLM_URL", "not a url"),
            ("CERP_LLM_API_KEY", "k"),
        ]));
        assert!(matches!(bad_url, Err(ConfigError::InvalidUrl(..))));

        let bad_top_k = KnowledgeConfig::from_lookup(vars(&[
            ("CERP_KNOWLEDGE_URL", "http://kb"),
            ("CERP_KNOWLEDGE_TOP_K", "many"),
        ]));
        assert!(matches!(bad_top_k, Err(ConfigError::InvalidValue(..))));
    }

    #[test]
    fn knowledge_top_k_defaults_to_three() {
        let cfg = KnowledgeConfig::from_lookup(vars(&[("CERP_KNOWLEDGE_URL", "http://kb/query")]))
            .unwrap()
            .unwrap();
        assert_eq!(cfg.top_k, 3);
        assert!(KnowledgeConfig::from_lookup(vars(&[])).unwrap().is_none());
    }
}
