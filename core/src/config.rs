//! Client configuration.
//!
//! Loaded from TOML or from the environment:
//!
//! ```toml
//! base_url = "https://api.example.com/api/v1"
//! success_message = "Saved"
//! user_agent = "resource-client/0.1"
//! ```
//!
//! `RESOURCE_API_BASE_URL` (required) and `RESOURCE_API_SUCCESS_MESSAGE`
//! (optional) cover the same fields for `from_env`.

use serde::Deserialize;
use url::Url;

use crate::error::ApiError;

pub const DEFAULT_SUCCESS_MESSAGE: &str = "성공";

pub const BASE_URL_ENV: &str = "RESOURCE_API_BASE_URL";
pub const SUCCESS_MESSAGE_ENV: &str = "RESOURCE_API_SUCCESS_MESSAGE";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
    /// Used when a mutating call succeeds without a `msg`.
    #[serde(default = "default_success_message")]
    pub success_message: String,
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_success_message() -> String {
    DEFAULT_SUCCESS_MESSAGE.to_string()
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let config = Self {
            base_url: base_url.to_string(),
            success_message: default_success_message(),
            user_agent: None,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ApiError> {
        let config: Self = toml::from_str(text).map_err(|e| ApiError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let base_url = lookup(BASE_URL_ENV)
            .ok_or_else(|| ApiError::Config(format!("{BASE_URL_ENV} is not set")))?;
        let mut config = Self::new(&base_url)?;
        if let Some(message) = lookup(SUCCESS_MESSAGE_ENV) {
            config.success_message = message;
        }
        Ok(config)
    }

    /// The base URL must be absolute http(s).
    pub fn validate(&self) -> Result<(), ApiError> {
        let url = Url::parse(&self.base_url)?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(ApiError::Config(format!("unsupported scheme: {other}"))),
        }
    }

    pub fn with_success_message(mut self, message: impl Into<String>) -> Self {
        self.success_message = message.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_defaults_success_message() {
        let config = ClientConfig::from_toml_str(r#"base_url = "https://api.example.com""#).unwrap();
        assert_eq!(config.base_url, "https://api.example.com");
        assert_eq!(config.success_message, DEFAULT_SUCCESS_MESSAGE);
        assert!(config.user_agent.is_none());
    }

    #[test]
    fn toml_overrides() {
        let config = ClientConfig::from_toml_str(
            r#"
            base_url = "http://localhost:8080/api/v1"
            success_message = "Saved"
            user_agent = "tests"
            "#,
        )
        .unwrap();
        assert_eq!(config.success_message, "Saved");
        assert_eq!(config.user_agent.as_deref(), Some("tests"));
    }

    #[test]
    fn rejects_relative_and_non_http_urls() {
        assert!(matches!(ClientConfig::new("/api/v1"), Err(ApiError::Config(_))));
        assert!(matches!(ClientConfig::new("ftp://host"), Err(ApiError::Config(_))));
    }

    #[test]
    fn rejects_missing_base_url() {
        assert!(matches!(
            ClientConfig::from_toml_str(r#"success_message = "x""#),
            Err(ApiError::Config(_))
        ));
    }

    fn vars<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key: &str| pairs.iter().find(|(k, _)| *k == key).map(|(_, v)| v.to_string())
    }

    #[test]
    fn lookup_reads_both_variables() {
        let config = ClientConfig::from_lookup(vars(&[
            (BASE_URL_ENV, "https://api.example.com/api/v1"),
            (SUCCESS_MESSAGE_ENV, "Saved"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "https://api.example.com/api/v1");
        assert_eq!(config.success_message, "Saved");
    }

    #[test]
    fn lookup_without_message_keeps_default() {
        let config = ClientConfig::from_lookup(vars(&[(BASE_URL_ENV, "http://localhost:3000")])).unwrap();
        assert_eq!(config.success_message, DEFAULT_SUCCESS_MESSAGE);
    }

    #[test]
    fn lookup_without_base_url_fails() {
        let err = ClientConfig::from_lookup(vars(&[(SUCCESS_MESSAGE_ENV, "Saved")])).unwrap_err();
        assert!(matches!(&err, ApiError::Config(m) if m.contains(BASE_URL_ENV)), "{err:?}");
    }

    // The only test that touches the process environment.
    #[test]
    fn from_env_reads_process_environment() {
        std::env::set_var(BASE_URL_ENV, "https://env.example.com");
        std::env::set_var(SUCCESS_MESSAGE_ENV, "Stored");
        let config = ClientConfig::from_env().unwrap();
        assert_eq!(config.base_url, "https://env.example.com");
        assert_eq!(config.success_message, "Stored");

        std::env::remove_var(BASE_URL_ENV);
        std::env::remove_var(SUCCESS_MESSAGE_ENV);
        assert!(matches!(ClientConfig::from_env(), Err(ApiError::Config(_))));
    }
}
