use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use super::response::Response;

/// Classification of a single replica's response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    /// The response is final; stop trying other replicas.
    Accept,
    /// The response is not acceptable; try the next replica if budget allows.
    Reject,
}

/// The immutable record of one attempt against one replica.
///
/// Created exactly once by the dispatch engine when the attempt completes
/// and never mutated afterward. Every attempt carries a response: transport
/// failures are absorbed into synthetic responses before the record is
/// built. Ordering within the containing sequence reflects attempt start
/// order.
#[derive(Debug, Clone, Serialize)]
pub struct ReplicaResult {
    /// Endpoint that served (or failed to serve) this attempt.
    pub replica: String,
    pub response: Arc<Response>,
    pub verdict: Verdict,
    /// Wall time the attempt took, start to completion.
    pub elapsed: Duration,
}

impl ReplicaResult {
    pub fn new(
        replica: impl Into<String>,
        response: Arc<Response>,
        verdict: Verdict,
        elapsed: Duration,
    ) -> Self {
        Self {
            replica: replica.into(),
            response,
            verdict,
            elapsed,
        }
    }
}
