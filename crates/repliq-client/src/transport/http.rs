//! Hyper-based HTTP transport.

use async_trait::async_trait;
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use std::time::Duration;

use repliq_common::fault::Fault;
use repliq_common::{Request, Response, ResponseCode};

use super::Transport;

/// HTTP transport over hyper.
///
/// Each attempt creates its own connection via the hyper legacy client.
/// This keeps concurrent attempts against the same replica fully
/// independent: no shared connection state, no serialization through a
/// pooled stream.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpTransport;

impl HttpTransport {
    pub fn new() -> Self {
        Self
    }

    /// Joins the replica endpoint and the request's relative path.
    ///
    /// Replicas may be bare `host:port` pairs or carry an explicit scheme.
    fn build_url(replica: &str, request: &Request) -> String {
        let path = request.path.trim_start_matches('/');
        if replica.contains("://") {
            format!("{}/{}", replica.trim_end_matches('/'), path)
        } else {
            format!("http://{}/{}", replica, path)
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        request: &Request,
        replica: &str,
        timeout: Duration,
    ) -> Result<Response, Fault> {
        let url = Self::build_url(replica, request);

        let mut builder = hyper::Request::builder()
            .method(request.method.as_str())
            .uri(&url);
        for (name, value) in request.headers.iter() {
            builder = builder.header(name, value);
        }
        let http_request = builder
            .body(Full::<Bytes>::new(request.body.clone()))
            .map_err(|e| Fault::other(format!("failed to build request for {}: {}", url, e)))?;

        let client = Client::builder(TokioExecutor::new()).build_http();

        let response = tokio::time::timeout(timeout, client.request(http_request))
            .await
            .map_err(|_| {
                Fault::timeout(format!("no response from {} within {:?}", replica, timeout))
            })?
            .map_err(|e| {
                if e.is_connect() {
                    Fault::connect(format!("failed to connect to {}: {}", replica, e))
                } else {
                    Fault::send(format!("request to {} failed: {}", replica, e))
                }
            })?;

        let status = response.status().as_u16();

        let mut result = Response::new(ResponseCode::from_u16(status));
        for (name, value) in response.headers() {
            if let Ok(value) = value.to_str() {
                result = result.with_header(name.as_str(), value);
            }
        }

        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| Fault::receive(format!("failed to read response from {}: {}", replica, e)))?
            .to_bytes();

        Ok(result.with_body(body))
    }
}
