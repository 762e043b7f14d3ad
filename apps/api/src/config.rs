use anyhow::{Context, Result};

pub const DEFAULT_LLM_BASE_URL: &str = "https://api.poe.com/v1";
pub const DEFAULT_LLM_MODEL: &str = "GenAI-career-planner";
pub const DEFAULT_CHAT_QUERY_LIMIT: usize = 10;

/// Application configuration loaded from environment variables.
/// Everything is optional: without `DATABASE_URL` the service keeps state in
/// memory, and without `LLM_API_KEY` the chat assistant answers from canned replies.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub database_url: Option<String>,
    pub llm_api_key: Option<String>,
    pub llm_base_url: String,
    pub llm_model: String,
    pub chat_query_limit: usize,
    pub catalog_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            database_url: None,
            llm_api_key: None,
            llm_base_url: DEFAULT_LLM_BASE_URL.to_string(),
            llm_model: DEFAULT_LLM_MODEL.to_string(),
            chat_query_limit: DEFAULT_CHAT_QUERY_LIMIT,
            catalog_path: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();
        Ok(Config {
            port: parse_env("PORT", defaults.port)?,
            rust_log: optional_env("RUST_LOG").unwrap_or(defaults.rust_log),
            database_url: optional_env("DATABASE_URL"),
            llm_api_key: optional_env("LLM_API_KEY"),
            llm_base_url: optional_env("LLM_BASE_URL").unwrap_or(defaults.llm_base_url),
            llm_model: optional_env("LLM_MODEL").unwrap_or(defaults.llm_model),
            chat_query_limit: parse_env("CHAT_QUERY_LIMIT", defaults.chat_query_limit)?,
            catalog_path: optional_env("CATALOG_PATH"),
        })
    }
}

/// Reads a variable, treating unset and blank the same.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.chat_query_limit, 10);
        assert!(config.database_url.is_none());
        assert_eq!(config.llm_base_url, DEFAULT_LLM_BASE_URL);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("PATHWAY_TEST_BAD_PORT", "eighty");
        let err = parse_env::<u16>("PATHWAY_TEST_BAD_PORT", 8080).unwrap_err();
        assert!(err.to_string().contains("PATHWAY_TEST_BAD_PORT"));
        std::env::remove_var("PATHWAY_TEST_BAD_PORT");
    }

    #[test]
    fn test_blank_variable_falls_back_to_default() {
        std::env::set_var("PATHWAY_TEST_BLANK_LIMIT", "  ");
        assert_eq!(parse_env::<usize>("PATHWAY_TEST_BLANK_LIMIT", 10).unwrap(), 10);
        assert!(optional_env("PATHWAY_TEST_BLANK_LIMIT").is_none());
        std::env::remove_var("PATHWAY_TEST_BLANK_LIMIT");
    }
}
