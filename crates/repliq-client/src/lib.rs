//! Repliq Cluster Client
//!
//! A resilient cluster-aware HTTP client: one logical request goes in, one
//! [`ClusterResult`](repliq_common::ClusterResult) comes out, whether the
//! call succeeded, timed out, was throttled, or exhausted every replica.
//!
//! # Overview
//!
//! The client is assembled from pluggable collaborators:
//!
//! - [`ReplicaSequencer`] produces the lazy candidate sequence for each
//!   call. [`RoundRobinSequencer`] is the built-in rotation over a managed
//!   replica list.
//! - [`Transport`] sends one request to one replica. [`HttpTransport`]
//!   is the built-in hyper implementation.
//! - [`ResponseClassifier`] decides per response whether dispatch stops
//!   (`Accept`) or moves on (`Reject`).
//! - [`AdmissionController`] is an optional pre-dispatch gate; a rejected call
//!   becomes a throttled result without contacting any replica.
//!
//! The [`AttemptOrchestrator`] in the middle drives attempts under the
//! request's time budget and the configured parallelism, absorbs transport
//! faults into synthetic responses, and settles on the first accepted
//! response.
//!
//! # Example
//!
//! ```no_run
//! use repliq_client::{ClusterClient, ClusterClientConfig, HttpTransport, RoundRobinSequencer};
//! use repliq_common::{ClusterResultStatus, Request};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let config = ClusterClientConfig {
//!     parallelism: 2,
//!     ..ClusterClientConfig::default()
//! };
//! let client = ClusterClient::with_config(
//!     Arc::new(HttpTransport::new()),
//!     Arc::new(RoundRobinSequencer::new(vec!["10.0.0.1:8080".into()])),
//!     config,
//! );
//!
//! let result = client
//!     .send(Request::get("health").with_timeout(Duration::from_secs(2)))
//!     .await;
//!
//! if result.status() == ClusterResultStatus::Success {
//!     println!("served by {:?}", result.replica());
//! }
//! # }
//! ```

pub mod admission;
pub mod classifier;
pub mod client;
pub mod config;
pub mod monitor;
pub mod orchestrator;
pub mod sequencer;
pub mod transport;

pub use admission::{AdmissionConfig, AdmissionController, AdmissionDecision, TokenBucketAdmission};
pub use classifier::{AcceptNonServerErrors, AcceptOnlySuccess, ResponseClassifier};
pub use client::ClusterClient;
pub use config::ClusterClientConfig;
pub use monitor::{PoolStats, SaturationMonitor};
pub use orchestrator::{AttemptOrchestrator, DispatchOutcome, DispatchState};
pub use sequencer::{ReplicaSequencer, RoundRobinSequencer};
pub use transport::{HttpTransport, Transport};

// Re-exported so callers don't need a direct tokio-util dependency to
// cancel a call.
pub use tokio_util::sync::CancellationToken;
