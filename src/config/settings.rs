//! Settings structures for doclist-rs configuration

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Main settings structure, loaded from settings.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub outgoing: OutgoingSettings,
    pub search: SearchSettings,
    pub drafts: DraftsSettings,
    pub auth: AuthSettings,
    pub views: ViewSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse settings from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the service cannot run with
    pub fn validate(&self) -> Result<()> {
        let timeout = self.outgoing.request_timeout;
        if !timeout.is_finite() || timeout <= 0.0 {
            bail!(
                "outgoing.request_timeout must be a positive number of seconds, got {}",
                timeout
            );
        }
        if self.views.max_views == 0 {
            bail!("views.max_views must be at least 1");
        }
        if self.views.idle_timeout == 0 {
            bail!("views.idle_timeout must be at least 1 second");
        }
        Ok(())
    }

    /// Merge with environment variables (DOCLIST_* prefix)
    pub fn merge_env(&mut self) {
        self.merge_vars(|key| std::env::var(key).ok());
    }

    /// Merge overrides from an arbitrary variable lookup
    pub fn merge_vars<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("DOCLIST_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Some(val) = lookup("DOCLIST_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = lookup("DOCLIST_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Some(val) = lookup("DOCLIST_SEARCH_APP_ID") {
            self.search.app_id = val;
        }
        if let Some(val) = lookup("DOCLIST_SEARCH_API_KEY") {
            self.search.api_key = val;
        }
        if let Some(val) = lookup("DOCLIST_DOCS_INDEX") {
            self.search.docs_index_name = val;
        }
        if let Some(val) = lookup("DOCLIST_DRAFTS_URL") {
            self.drafts.base_url = val;
        }
    }
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Include upstream error details in API error responses
    pub debug: bool,
    /// Instance name reported in logs and /health
    pub instance_name: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            debug: false,
            instance_name: "doclist".to_string(),
        }
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 8000,
            bind_address: "127.0.0.1".to_string(),
        }
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Per-source request timeout in seconds
    pub request_timeout: f64,
    /// Pool max idle connections per host
    pub pool_maxsize: usize,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// Proxy settings
    pub proxies: ProxySettings,
    /// Extra headers to send with every request
    pub extra_headers: HashMap<String, String>,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: crate::DEFAULT_TIMEOUT as f64,
            pool_maxsize: 20,
            verify_ssl: true,
            proxies: ProxySettings::default(),
            extra_headers: HashMap::new(),
        }
    }
}

/// Proxy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
    pub all: Option<String>,
}

/// Search index (published documents) settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Application ID sent as X-Algolia-Application-Id
    pub app_id: String,
    /// Search-only API key sent as X-Algolia-API-Key
    pub api_key: String,
    /// Override for the API host (defaults to the app's DSN host)
    pub host: Option<String>,
    /// Base index name; sort variants append `_createdTime_asc|desc`
    pub docs_index_name: String,
    /// Hits requested per page
    pub hits_per_page: u32,
    /// Facet values returned per facet
    pub max_values_per_facet: u32,
}

impl SearchSettings {
    /// Effective API host
    pub fn host(&self) -> String {
        match self.host {
            Some(ref host) => host.trim_end_matches('/').to_string(),
            None => format!("https://{}-dsn.algolia.net", self.app_id),
        }
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            app_id: String::new(),
            api_key: String::new(),
            host: None,
            docs_index_name: "docs".to_string(),
            hits_per_page: crate::HITS_PER_PAGE,
            max_values_per_facet: crate::MAX_VALUES_PER_FACET,
        }
    }
}

/// Drafts API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftsSettings {
    /// Base URL of the application API serving /api/v1/drafts
    pub base_url: String,
}

impl Default for DraftsSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
        }
    }
}

/// Authenticated-user settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// Header carrying the authenticated user's email, set by the auth proxy
    pub user_header: String,
    /// Fallback identity for local development
    pub default_email: Option<String>,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            user_header: "x-auth-request-email".to_string(),
            default_email: None,
        }
    }
}

/// Per-user view registry settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    /// Views kept at most; least recently used ones are evicted first
    pub max_views: u64,
    /// Seconds a view is kept without being used
    pub idle_timeout: u64,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            max_views: 10_000,
            idle_timeout: 600,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8000);
        assert!(!settings.general.debug);
        assert_eq!(settings.search.hits_per_page, 12);
        assert_eq!(settings.search.max_values_per_facet, 100);
        assert_eq!(settings.auth.user_header, "x-auth-request-email");
    }

    #[test]
    fn test_partial_yaml() {
        let yaml = r#"
search:
  app_id: ABC123
  docs_index_name: prod_docs
drafts:
  base_url: https://hermes.example.com
"#;
        let settings = Settings::from_yaml(yaml).unwrap();
        assert_eq!(settings.search.docs_index_name, "prod_docs");
        assert_eq!(settings.search.host(), "https://ABC123-dsn.algolia.net");
        assert_eq!(settings.search.hits_per_page, 12);
        assert_eq!(settings.drafts.base_url, "https://hermes.example.com");
        assert_eq!(settings.server.port, 8000);
    }

    #[test]
    fn test_host_override_trims_slash() {
        let mut search = SearchSettings::default();
        search.host = Some("http://localhost:9200/".to_string());
        assert_eq!(search.host(), "http://localhost:9200");
    }

    #[test]
    fn test_rejects_bad_timeout() {
        for value in ["-1", "0", ".nan", ".inf"] {
            let yaml = format!("outgoing:\n  request_timeout: {}\n", value);
            let err = Settings::from_yaml(&yaml).unwrap_err();
            assert!(
                err.to_string().contains("request_timeout"),
                "{}: {}",
                value,
                err
            );
        }

        let settings = Settings::from_yaml("outgoing:\n  request_timeout: 2.5\n").unwrap();
        assert_eq!(settings.outgoing.request_timeout, 2.5);
    }

    #[test]
    fn test_rejects_empty_view_registry() {
        let err = Settings::from_yaml("views:\n  max_views: 0\n").unwrap_err();
        assert!(err.to_string().contains("max_views"));
    }

    #[test]
    fn test_merge_vars() {
        let mut settings = Settings::default();
        settings.merge_vars(|key| match key {
            "DOCLIST_PORT" => Some("9000".to_string()),
            "DOCLIST_DOCS_INDEX" => Some("staging_docs".to_string()),
            "DOCLIST_DEBUG" => Some("true".to_string()),
            _ => None,
        });
        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.search.docs_index_name, "staging_docs");
        assert!(settings.general.debug);
    }
}
