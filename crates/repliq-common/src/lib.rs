//! Repliq Common Types
//!
//! This crate provides the core result and response model for the repliq
//! cluster client.
//!
//! # Overview
//!
//! Repliq is a resilient cluster-aware HTTP client: given a logical request
//! and a set of candidate replica endpoints, it dispatches the request to one
//! or more replicas and folds the per-replica attempts into a single
//! aggregated outcome. This crate contains the shared vocabulary used by all
//! components:
//!
//! - **Model layer**: `Request`, `Response`, response codes (real HTTP codes
//!   plus a synthetic range for locally produced outcomes), per-attempt
//!   `ReplicaResult` records, and the aggregated `ClusterResult`.
//! - **Fault layer**: a tagged fault tree with depth-first predicate search,
//!   used to map transport failures onto synthetic response codes.
//!
//! # Example
//!
//! ```
//! use repliq_common::{ClusterResult, ClusterResultStatus, Request, ResponseCode};
//! use std::sync::Arc;
//!
//! let request = Arc::new(Request::get("users/42"));
//! let result = ClusterResult::new(
//!     ClusterResultStatus::TimeExpired,
//!     Vec::new(),
//!     None,
//!     request,
//! );
//!
//! // No replica produced an answer, so the response is synthesized from the
//! // status.
//! assert_eq!(result.response().code, ResponseCode::RequestTimeout);
//! assert!(result.replica().is_none());
//! ```

pub mod fault;
pub mod model;

pub use model::*;
