//! Outgoing request and response types

use crate::error::FetchError;

/// HTTP request to one of the document sources
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// URL to request, without query string
    pub url: String,
    /// HTTP method
    pub method: HttpMethod,
    /// Request headers
    pub headers: Vec<(String, String)>,
    /// Pre-encoded query string, appended after `?`
    pub query: Option<String>,
    /// JSON body
    pub json: Option<serde_json::Value>,
}

impl ApiRequest {
    /// Create a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(url, HttpMethod::Get)
    }

    /// Create a POST request
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(url, HttpMethod::Post)
    }

    fn new(url: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            url: url.into(),
            method,
            headers: Vec::new(),
            query: None,
            json: None,
        }
    }

    /// Add a header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Attach an already encoded query string; key order is kept as given
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Add JSON body
    pub fn json(mut self, data: serde_json::Value) -> Self {
        self.json = Some(data);
        self
    }

    /// Full URL including the query string
    pub fn full_url(&self) -> String {
        match self.query {
            Some(ref q) if !q.is_empty() => format!("{}?{}", self.url, q),
            _ => self.url.clone(),
        }
    }
}

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// HTTP response from a document source
#[derive(Debug)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub text: String,
    /// Response URL (after redirects)
    pub url: String,
}

impl ApiResponse {
    /// Check if response is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Fail on non-2xx, otherwise decode the body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, FetchError> {
        if !self.is_success() {
            return Err(FetchError::Status {
                status: self.status,
                url: self.url.clone(),
            });
        }
        Ok(serde_json::from_str(&self.text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_url() {
        let req = ApiRequest::get("http://api/v1/drafts").query("a=1&b=2");
        assert_eq!(req.full_url(), "http://api/v1/drafts?a=1&b=2");
        assert_eq!(ApiRequest::get("http://api").full_url(), "http://api");
    }

    #[test]
    fn test_json_rejects_error_status() {
        let response = ApiResponse {
            status: 503,
            text: "{}".to_string(),
            url: "http://api".to_string(),
        };
        let err = response.json::<serde_json::Value>().unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 503, .. }));
    }

    #[test]
    fn test_json_decodes_body() {
        let response = ApiResponse {
            status: 200,
            text: r#"{"page": 2}"#.to_string(),
            url: "http://api".to_string(),
        };
        let value: serde_json::Value = response.json().unwrap();
        assert_eq!(value["page"], 2);
    }
}
