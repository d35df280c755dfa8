//! Authenticated-user resolution
//!
//! Authentication happens upstream; this module only reads the identity the
//! authenticating proxy forwards.

use crate::config::AuthSettings;
use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};

/// The user the listing is built for
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrentUser {
    pub email: String,
}

impl CurrentUser {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }
}

/// Resolves the current user from an incoming request
pub trait UserProvider: Send + Sync {
    fn current_user(&self, headers: &HeaderMap) -> Option<CurrentUser>;
}

/// Reads the user's email from a configured header
#[derive(Debug, Clone)]
pub struct HeaderUserProvider {
    header: String,
    default_email: Option<String>,
}

impl HeaderUserProvider {
    pub fn new(settings: &AuthSettings) -> Self {
        Self {
            header: settings.user_header.to_ascii_lowercase(),
            default_email: settings.default_email.clone(),
        }
    }

    /// Header name the identity is read from, and forwarded under
    pub fn header(&self) -> &str {
        &self.header
    }
}

impl UserProvider for HeaderUserProvider {
    fn current_user(&self, headers: &HeaderMap) -> Option<CurrentUser> {
        headers
            .get(self.header.as_str())
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(CurrentUser::new)
            .or_else(|| self.default_email.clone().map(CurrentUser::new))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_user_from_header() {
        let provider = HeaderUserProvider::new(&AuthSettings::default());
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-auth-request-email",
            HeaderValue::from_static(" me@example.com "),
        );

        assert_eq!(
            provider.current_user(&headers),
            Some(CurrentUser::new("me@example.com"))
        );
    }

    #[test]
    fn test_missing_user() {
        let provider = HeaderUserProvider::new(&AuthSettings::default());
        assert_eq!(provider.current_user(&HeaderMap::new()), None);
    }

    #[test]
    fn test_default_email_fallback() {
        let settings = AuthSettings {
            user_header: "X-Forwarded-Email".to_string(),
            default_email: Some("dev@example.com".to_string()),
        };
        let provider = HeaderUserProvider::new(&settings);
        assert_eq!(provider.header(), "x-forwarded-email");
        assert_eq!(
            provider.current_user(&HeaderMap::new()),
            Some(CurrentUser::new("dev@example.com"))
        );
    }
}
