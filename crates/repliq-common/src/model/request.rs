use bytes::Bytes;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

use super::headers::Headers;

/// HTTP method of an outgoing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Head,
    Patch,
    Options,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Patch => "PATCH",
            Self::Options => "OPTIONS",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation failure for a [`Request`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidRequest {
    #[error("request path is empty")]
    EmptyPath,

    #[error("request path must be relative to the replica, got '{0}'")]
    AbsolutePath(String),

    #[error("request timeout must be positive")]
    ZeroTimeout,
}

/// An immutable description of an outgoing call.
///
/// A request names a method and a path relative to whichever replica ends up
/// serving it; the replica host is supplied by the dispatch engine, not the
/// request. Requests are built once and passed by shared reference
/// (`Arc<Request>`) through the whole pipeline without mutation.
///
/// # Example
///
/// ```
/// use repliq_common::Request;
/// use std::time::Duration;
///
/// let request = Request::get("users/42")
///     .with_header("Accept", "application/json")
///     .with_timeout(Duration::from_secs(5));
///
/// assert_eq!(request.path, "users/42");
/// assert!(request.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Request {
    pub method: Method,
    /// Path relative to the replica endpoint, without a scheme or host.
    pub path: String,
    pub headers: Headers,
    pub body: Bytes,
    /// Overall time budget for the call. When absent, the client's
    /// configured default applies.
    pub timeout: Option<Duration>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Headers::new(),
            body: Bytes::new(),
            timeout: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn head(path: impl Into<String>) -> Self {
        Self::new(Method::Head, path)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers = self.headers.with(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Checks the request for structural problems that make dispatch
    /// pointless: an empty or absolute path, or a zero time budget.
    pub fn validate(&self) -> Result<(), InvalidRequest> {
        if self.path.is_empty() {
            return Err(InvalidRequest::EmptyPath);
        }
        if self.path.contains("://") {
            return Err(InvalidRequest::AbsolutePath(self.path.clone()));
        }
        if self.timeout == Some(Duration::ZERO) {
            return Err(InvalidRequest::ZeroTimeout);
        }
        Ok(())
    }
}
