//! Replayable request descriptions.

use reqwest::Method;
use serde::Serialize;

use crate::error::ApiError;

/// An API call that can be sent more than once.
///
/// The client may replay a request after refreshing the session token, so
/// requests are kept as plain data and turned into a `reqwest` request on
/// every attempt.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: Option<serde_json::Value>,
    /// Attach the bearer token and recover from 401.
    pub(crate) authenticated: bool,
    /// Set once the request has been replayed after a refresh.
    pub(crate) retried: bool,
}

impl ApiRequest {
    /// A request for `path`, relative to the configured base URL.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
            authenticated: true,
            retried: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Add a header, passed through verbatim. Invalid names or values
    /// surface as [`ApiError::Request`] when the request is sent.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Serialize `body` as the JSON payload.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::Request(format!("failed to serialize request body: {e}")))?;
        self.body = Some(value);
        Ok(self)
    }

    /// Send without credentials and without 401 recovery (e.g. the login call).
    pub fn anonymous(mut self) -> Self {
        self.authenticated = false;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether this is the replay that follows a token refresh.
    pub fn is_retry(&self) -> bool {
        self.retried
    }
}
