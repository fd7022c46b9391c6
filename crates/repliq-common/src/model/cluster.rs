use serde::Serialize;
use std::sync::Arc;

use super::code::ResponseCode;
use super::request::Request;
use super::response::{known, Response};
use super::result::ReplicaResult;

/// Terminal status of a cluster call. Exactly one per [`ClusterResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ClusterResultStatus {
    /// An accepted response was obtained.
    Success,
    /// The overall time budget ran out before any replica's response was
    /// accepted.
    TimeExpired,
    /// The dispatch logic itself faulted. Per-replica transport failures are
    /// never reported here; they are absorbed into replica results.
    UnexpectedException,
    /// The caller canceled the request.
    Canceled,
    /// Admission control rejected the call before any replica was contacted.
    Throttled,
    /// The replica sequencer yielded no candidates at all.
    ReplicasNotFound,
    /// Every attempted replica was rejected or failed.
    ReplicasExhausted,
    /// The request was invalid before dispatch could begin.
    IncorrectArguments,
}

impl ClusterResultStatus {
    /// The synthetic code substituted when a result carries no selected
    /// response.
    pub fn fallback_code(self) -> ResponseCode {
        match self {
            Self::TimeExpired => ResponseCode::RequestTimeout,
            Self::UnexpectedException => ResponseCode::UnknownFailure,
            Self::Canceled => ResponseCode::Canceled,
            Self::Throttled => ResponseCode::TooManyRequests,
            Self::Success
            | Self::ReplicasNotFound
            | Self::ReplicasExhausted
            | Self::IncorrectArguments => ResponseCode::Unknown,
        }
    }
}

/// The aggregated outcome of one cluster call.
///
/// Built exactly once when dispatch finishes (or through a terminal factory
/// such as [`ClusterResult::throttled`]) and immutable afterward: a value,
/// not a live object. The result owns its replica-result sequence and shares
/// ownership of the caller's request.
///
/// The final response and the winning replica are derived on access rather
/// than stored, so they can never drift out of sync with the status:
///
/// - [`response`](Self::response) is the selected response when one was
///   supplied, otherwise the canonical synthetic response for the status.
/// - [`replica`](Self::replica) is the address of the replica whose recorded
///   response is **reference-identical** to the final response. Two distinct
///   response instances with equal contents never match.
///
/// # Example
///
/// ```
/// use repliq_common::{ClusterResult, Request, ResponseCode};
/// use std::sync::Arc;
///
/// let request = Arc::new(Request::get("health"));
/// let result = ClusterResult::throttled(request);
///
/// assert!(result.replica_results().is_empty());
/// assert_eq!(result.response().code, ResponseCode::TooManyRequests);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ClusterResult {
    status: ClusterResultStatus,
    replica_results: Vec<ReplicaResult>,
    selected_response: Option<Arc<Response>>,
    request: Arc<Request>,
}

impl ClusterResult {
    pub fn new(
        status: ClusterResultStatus,
        replica_results: Vec<ReplicaResult>,
        selected_response: Option<Arc<Response>>,
        request: Arc<Request>,
    ) -> Self {
        Self {
            status,
            replica_results,
            selected_response,
            request,
        }
    }

    /// A call rejected by admission control. No replica was contacted.
    pub fn throttled(request: Arc<Request>) -> Self {
        Self::new(ClusterResultStatus::Throttled, Vec::new(), None, request)
    }

    /// A call whose sequencer yielded zero candidates.
    pub fn replicas_not_found(request: Arc<Request>) -> Self {
        Self::new(ClusterResultStatus::ReplicasNotFound, Vec::new(), None, request)
    }

    /// A call rejected before dispatch because the request was invalid.
    pub fn incorrect_arguments(request: Arc<Request>) -> Self {
        Self::new(ClusterResultStatus::IncorrectArguments, Vec::new(), None, request)
    }

    /// A call that faulted inside the dispatch logic itself.
    pub fn unexpected_exception(request: Arc<Request>) -> Self {
        Self::new(ClusterResultStatus::UnexpectedException, Vec::new(), None, request)
    }

    /// A call whose time budget expired, keeping whatever attempts completed.
    pub fn time_expired(request: Arc<Request>, replica_results: Vec<ReplicaResult>) -> Self {
        Self::new(ClusterResultStatus::TimeExpired, replica_results, None, request)
    }

    /// A call canceled by the caller, keeping whatever attempts completed.
    pub fn canceled(request: Arc<Request>, replica_results: Vec<ReplicaResult>) -> Self {
        Self::new(ClusterResultStatus::Canceled, replica_results, None, request)
    }

    pub fn status(&self) -> ClusterResultStatus {
        self.status
    }

    /// Per-attempt records, in attempt start order.
    pub fn replica_results(&self) -> &[ReplicaResult] {
        &self.replica_results
    }

    pub fn request(&self) -> &Arc<Request> {
        &self.request
    }

    /// The final response of the call.
    ///
    /// Returns the exact selected response instance when one was supplied,
    /// regardless of status; otherwise the canonical synthetic response
    /// mapped from the status.
    pub fn response(&self) -> Arc<Response> {
        match &self.selected_response {
            Some(response) => Arc::clone(response),
            None => known::for_code(self.status.fallback_code()).unwrap_or_else(known::unknown),
        }
    }

    /// Address of the replica that produced the final response.
    ///
    /// Matches by reference identity against the recorded attempts; `None`
    /// when the final response was never attributed to any replica (an empty
    /// attempt list, or a synthetic fallback).
    pub fn replica(&self) -> Option<&str> {
        let response = self.response();
        self.replica_results
            .iter()
            .find(|result| Arc::ptr_eq(&result.response, &response))
            .map(|result| result.replica.as_str())
    }
}
