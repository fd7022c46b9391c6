use bytes::Bytes;
use serde::Serialize;

use super::code::ResponseCode;
use super::headers::Headers;

/// An immutable response to a single attempt.
///
/// Responses come either off the wire or from the synthetic catalog in
/// [`known`]. Past construction they are always handled as `Arc<Response>`,
/// so reference identity stays meaningful: the aggregated result attributes
/// its final response to a replica by pointer comparison, never by value.
#[derive(Debug, Clone, Serialize)]
pub struct Response {
    pub code: ResponseCode,
    pub headers: Headers,
    pub body: Bytes,
}

impl Response {
    pub fn new(code: ResponseCode) -> Self {
        Self {
            code,
            headers: Headers::new(),
            body: Bytes::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers = self.headers.with(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn is_success(&self) -> bool {
        self.code.is_success()
    }

    /// First value of the named header, if present.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }
}

/// Canonical responses for outcomes that have no real network response.
///
/// Each accessor returns a clone of one process-wide `Arc`, so two lookups
/// of the same code are reference-identical. The aggregated result's
/// fallback path draws from this catalog.
pub mod known {
    use std::sync::{Arc, LazyLock};

    use super::{Response, ResponseCode};

    macro_rules! canonical {
        ($name:ident, $code:ident) => {
            pub fn $name() -> Arc<Response> {
                static INSTANCE: LazyLock<Arc<Response>> =
                    LazyLock::new(|| Arc::new(Response::new(ResponseCode::$code)));
                Arc::clone(&INSTANCE)
            }
        };
    }

    canonical!(unknown, Unknown);
    canonical!(request_timeout, RequestTimeout);
    canonical!(too_many_requests, TooManyRequests);
    canonical!(unknown_failure, UnknownFailure);
    canonical!(canceled, Canceled);
    canonical!(connect_failure, ConnectFailure);
    canonical!(send_failure, SendFailure);
    canonical!(receive_failure, ReceiveFailure);

    /// Catalog lookup by code. Returns `None` for codes with no canonical
    /// instance.
    pub fn for_code(code: ResponseCode) -> Option<Arc<Response>> {
        match code {
            ResponseCode::Unknown => Some(unknown()),
            ResponseCode::RequestTimeout => Some(request_timeout()),
            ResponseCode::TooManyRequests => Some(too_many_requests()),
            ResponseCode::UnknownFailure => Some(unknown_failure()),
            ResponseCode::Canceled => Some(canceled()),
            ResponseCode::ConnectFailure => Some(connect_failure()),
            ResponseCode::SendFailure => Some(send_failure()),
            ResponseCode::ReceiveFailure => Some(receive_failure()),
            _ => None,
        }
    }
}
