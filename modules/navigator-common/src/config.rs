use std::time::Duration;

use anyhow::Result;

use crate::error::NavigatorError;

pub const DEFAULT_GOOGLE_SEARCH_URL: &str = "https://www.googleapis.com/customsearch/v1";
pub const DEFAULT_SCRAPE_SEARCH_URL: &str = "https://html.duckduckgo.com/html/";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Outbound calls stay under ten seconds so one dead source cannot stall a search.
pub const DEFAULT_SEARCH_TIMEOUT: Duration = Duration::from_secs(8);
const MAX_SEARCH_TIMEOUT_SECS: u64 = 9;

/// Credentials for the structured search provider. Both halves are required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleCredentials {
    pub api_key: String,
    pub engine_id: String,
}

/// Immutable settings for the course aggregator.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub google: Option<GoogleCredentials>,
    pub google_search_url: String,
    pub scrape_search_url: String,
    pub timeout: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            google: None,
            google_search_url: DEFAULT_GOOGLE_SEARCH_URL.to_string(),
            scrape_search_url: DEFAULT_SCRAPE_SEARCH_URL.to_string(),
            timeout: DEFAULT_SEARCH_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub gemini_api_key: String,
    pub gemini_model: String,
}

/// Application configuration loaded from environment variables (and `.env`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub search: SearchConfig,
    pub llm: Option<LlmConfig>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let config = Self::from_lookup(|key| std::env::var(key).ok())?;
        config.log_keys();
        Ok(config)
    }

    /// Build from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let google = match (get("GOOGLE_SEARCH_API_KEY"), get("GOOGLE_SEARCH_ENGINE_ID")) {
            (Some(api_key), Some(engine_id)) => Some(GoogleCredentials { api_key, engine_id }),
            _ => None,
        };

        let timeout = match get("SEARCH_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.parse().map_err(|_| {
                    NavigatorError::Config(format!("SEARCH_TIMEOUT_SECS must be a number, got {raw:?}"))
                })?;
                Duration::from_secs(secs.clamp(1, MAX_SEARCH_TIMEOUT_SECS))
            }
            None => DEFAULT_SEARCH_TIMEOUT,
        };

        let search = SearchConfig {
            google,
            google_search_url: get("GOOGLE_SEARCH_URL")
                .unwrap_or_else(|| DEFAULT_GOOGLE_SEARCH_URL.to_string()),
            scrape_search_url: get("SCRAPE_SEARCH_URL")
                .unwrap_or_else(|| DEFAULT_SCRAPE_SEARCH_URL.to_string()),
            timeout,
        };

        let llm = get("GEMINI_API_KEY").map(|gemini_api_key| LlmConfig {
            gemini_api_key,
            gemini_model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
        });

        Ok(Self { search, llm })
    }

    fn log_keys(&self) {
        fn preview(val: &str) -> String {
            let n = val.chars().take(5).map(char::len_utf8).sum::<usize>();
            format!("{}...({} chars)", &val[..n], val.len())
        }

        tracing::info!("Config loaded:");
        match &self.search.google {
            Some(creds) => {
                tracing::info!("  GOOGLE_SEARCH_API_KEY: {}", preview(&creds.api_key));
                tracing::info!("  GOOGLE_SEARCH_ENGINE_ID: {}", preview(&creds.engine_id));
            }
            None => tracing::info!("  GOOGLE_SEARCH_API_KEY: <not set>, structured search disabled"),
        }
        tracing::info!("  SCRAPE_SEARCH_URL: {}", self.search.scrape_search_url);
        tracing::info!("  SEARCH_TIMEOUT_SECS: {}", self.search.timeout.as_secs());
        match &self.llm {
            Some(llm) => tracing::info!(
                "  GEMINI_API_KEY: {} (model {})",
                preview(&llm.gemini_api_key),
                llm.gemini_model
            ),
            None => tracing::info!("  GEMINI_API_KEY: <not set>, narration uses built-in layout"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert!(config.search.google.is_none());
        assert!(config.llm.is_none());
        assert_eq!(config.search.timeout, DEFAULT_SEARCH_TIMEOUT);
        assert_eq!(config.search.scrape_search_url, DEFAULT_SCRAPE_SEARCH_URL);
    }

    #[test]
    fn google_requires_both_key_and_engine() {
        let config = AppConfig::from_lookup(lookup(&[("GOOGLE_SEARCH_API_KEY", "abc")])).unwrap();
        assert!(config.search.google.is_none());

        let config = AppConfig::from_lookup(lookup(&[
            ("GOOGLE_SEARCH_API_KEY", "abc"),
            ("GOOGLE_SEARCH_ENGINE_ID", "cx1"),
        ]))
        .unwrap();
        assert_eq!(
            config.search.google,
            Some(GoogleCredentials {
                api_key: "abc".into(),
                engine_id: "cx1".into()
            })
        );
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = AppConfig::from_lookup(lookup(&[("GEMINI_API_KEY", "   ")])).unwrap();
        assert!(config.llm.is_none());
    }

    #[test]
    fn timeout_is_clamped_below_ten_seconds() {
        let config = AppConfig::from_lookup(lookup(&[("SEARCH_TIMEOUT_SECS", "60")])).unwrap();
        assert_eq!(config.search.timeout, Duration::from_secs(9));
    }

    #[test]
    fn bad_timeout_is_a_config_error() {
        let err = AppConfig::from_lookup(lookup(&[("SEARCH_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert!(err.to_string().contains("SEARCH_TIMEOUT_SECS"));
    }

    #[test]
    fn gemini_model_defaults() {
        let config = AppConfig::from_lookup(lookup(&[("GEMINI_API_KEY", "key-123")])).unwrap();
        assert_eq!(config.llm.unwrap().gemini_model, DEFAULT_GEMINI_MODEL);
    }
}
