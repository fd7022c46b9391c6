//! Transport boundary.
//!
//! The dispatch engine delegates actual byte transfer to a [`Transport`].
//! A transport either returns a [`Response`] or fails with a [`Fault`] tree;
//! faults never escape past the engine: they are absorbed into synthetic
//! responses so dispatch can continue to the next replica.

use async_trait::async_trait;
use std::time::Duration;

use repliq_common::fault::Fault;
use repliq_common::{Request, Response};

pub mod http;

pub use http::HttpTransport;

/// Sends one request to one replica.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `request` to `replica`, observing `timeout`.
    ///
    /// The timeout handed to an attempt is the remainder of the call's
    /// global budget at launch time, so a per-attempt deadline can never
    /// outlive the global one.
    async fn send(
        &self,
        request: &Request,
        replica: &str,
        timeout: Duration,
    ) -> Result<Response, Fault>;
}
