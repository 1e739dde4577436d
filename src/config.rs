//! Navigator and API configuration
//!
//! Both configs deserialize from JSON with every field optional, falling back
//! to the defaults below.

use crate::history::ScrollBehavior;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// NavigatorConfig
// ============================================================================

/// Texts and limits used by the navigator and the built-in pages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorConfig {
    /// Text under the spinner while a page loads
    pub loading_text: String,
    /// Prepended to the error message in the retry panel
    pub error_prefix: String,
    /// Label of the reload button in the retry panel
    pub retry_label: String,
    /// Message on the not-found page
    pub not_found_text: String,
    /// Label of the link back home on the not-found page
    pub home_label: String,
    /// Where auth-required panels send the user
    pub login_path: String,
    /// Where the already-signed-in panel sends the user
    pub signed_in_home: String,
    /// How the window scrolls back to the top after a page is mounted
    pub scroll_behavior: ScrollBehavior,
    /// Guard redirects followed within one navigation before failing
    pub max_redirects: usize,
}

impl NavigatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loading_text(mut self, text: impl Into<String>) -> Self {
        self.loading_text = text.into();
        self
    }

    pub fn error_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.error_prefix = prefix.into();
        self
    }

    pub fn retry_label(mut self, label: impl Into<String>) -> Self {
        self.retry_label = label.into();
        self
    }

    pub fn login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    pub fn signed_in_home(mut self, path: impl Into<String>) -> Self {
        self.signed_in_home = path.into();
        self
    }

    pub fn scroll_behavior(mut self, behavior: ScrollBehavior) -> Self {
        self.scroll_behavior = behavior;
        self
    }

    pub fn max_redirects(mut self, limit: usize) -> Self {
        self.max_redirects = limit;
        self
    }

    /// Parse from JSON; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            loading_text: "Loading...".to_string(),
            error_prefix: "Failed to load page: ".to_string(),
            retry_label: "Retry".to_string(),
            not_found_text: "Page not found".to_string(),
            home_label: "Back to home".to_string(),
            login_path: "/login".to_string(),
            signed_in_home: "/marketplace".to_string(),
            scroll_behavior: ScrollBehavior::Smooth,
            max_redirects: 5,
        }
    }
}

// ============================================================================
// ApiConfig
// ============================================================================

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Served from the same origin as the API; all URLs are relative
    Production,
    /// Dev server talking to a local backend on port 8000
    Development,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Production => f.write_str("production"),
            Environment::Development => f.write_str("development"),
        }
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "development" | "dev" => Ok(Environment::Development),
            other => Err(format!("unknown environment: {}", other)),
        }
    }
}

/// Base URLs the page factories fetch from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_url: String,
    pub static_url: String,
    pub media_url: String,
}

impl ApiConfig {
    const DEV_ORIGIN: &'static str = "http://localhost:8000";

    pub fn for_environment(env: Environment) -> Self {
        let origin = match env {
            Environment::Production => "",
            Environment::Development => Self::DEV_ORIGIN,
        };
        Self {
            base_url: origin.to_string(),
            api_url: format!("{}/api", origin),
            static_url: format!("{}/static", origin),
            media_url: format!("{}/media", origin),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Join an API path onto `api_url`.
    pub fn endpoint(&self, path: &str) -> String {
        join(&self.api_url, path)
    }

    /// Join a media path onto `media_url`.
    pub fn media(&self, path: &str) -> String {
        join(&self.media_url, path)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::for_environment(Environment::Production)
    }
}

fn join(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigator_config_defaults() {
        let config = NavigatorConfig::default();
        assert_eq!(config.login_path, "/login");
        assert_eq!(config.max_redirects, 5);
        assert_eq!(config.scroll_behavior, ScrollBehavior::Smooth);
    }

    #[test]
    fn test_navigator_config_builder() {
        let config = NavigatorConfig::new()
            .loading_text("Загрузка...")
            .retry_label("Повторить")
            .scroll_behavior(ScrollBehavior::Instant)
            .max_redirects(2);

        assert_eq!(config.loading_text, "Загрузка...");
        assert_eq!(config.retry_label, "Повторить");
        assert_eq!(config.scroll_behavior, ScrollBehavior::Instant);
        assert_eq!(config.max_redirects, 2);
    }

    #[test]
    fn test_navigator_config_partial_json() {
        let config =
            NavigatorConfig::from_json(r#"{"login_path": "/signin", "scroll_behavior": "instant"}"#)
                .unwrap();
        assert_eq!(config.login_path, "/signin");
        assert_eq!(config.scroll_behavior, ScrollBehavior::Instant);
        assert_eq!(config.loading_text, "Loading...");
    }

    #[test]
    fn test_api_config_environments() {
        let prod = ApiConfig::for_environment(Environment::Production);
        assert_eq!(prod.api_url, "/api");
        assert_eq!(prod.endpoint("/accounts/profile/"), "/api/accounts/profile/");

        let dev = ApiConfig::for_environment(Environment::Development);
        assert_eq!(dev.api_url, "http://localhost:8000/api");
        assert_eq!(dev.media("ads/1.jpg"), "http://localhost:8000/media/ads/1.jpg");
    }

    #[test]
    fn test_environment_parse() {
        assert_eq!(
            "production".parse::<Environment>().unwrap(),
            Environment::Production
        );
        assert_eq!(
            " DEV ".parse::<Environment>().unwrap(),
            Environment::Development
        );
        assert!("staging".parse::<Environment>().is_err());
        assert_eq!(Environment::Development.to_string(), "development");
    }
}
