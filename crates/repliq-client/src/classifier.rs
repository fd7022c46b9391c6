//! Response classification.
//!
//! A classifier decides, per response, whether dispatch should stop
//! (`Accept`) or move on to the next replica (`Reject`). Classification is
//! deterministic and side-effect free; it only ever sees responses that were
//! actually produced; transport failures are turned into synthetic
//! responses before they reach the classifier.

use repliq_common::{Response, ResponseCode, Verdict};

/// Accept/reject policy for a single replica's response.
///
/// Pluggable per client so different request types can define different
/// acceptance policy. Plain closures implement the trait:
///
/// ```
/// use repliq_client::ResponseClassifier;
/// use repliq_common::{Response, ResponseCode, Verdict};
///
/// let only_ok = |response: &Response| {
///     if response.code == ResponseCode::Ok {
///         Verdict::Accept
///     } else {
///         Verdict::Reject
///     }
/// };
///
/// assert_eq!(only_ok.classify(&Response::new(ResponseCode::NotFound)), Verdict::Reject);
/// ```
pub trait ResponseClassifier: Send + Sync {
    fn classify(&self, response: &Response) -> Verdict;
}

impl<F> ResponseClassifier for F
where
    F: Fn(&Response) -> Verdict + Send + Sync,
{
    fn classify(&self, response: &Response) -> Verdict {
        self(response)
    }
}

/// Default policy: reject outcomes that another replica might do better on.
///
/// Rejects server errors, synthetic network failures, timeouts, and
/// throttling; accepts everything else, including client errors: a 404 from
/// one replica will be a 404 from all of them.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptNonServerErrors;

impl ResponseClassifier for AcceptNonServerErrors {
    fn classify(&self, response: &Response) -> Verdict {
        let code = response.code;
        if code.is_server_error()
            || code.is_synthetic()
            || matches!(code, ResponseCode::RequestTimeout | ResponseCode::TooManyRequests)
        {
            Verdict::Reject
        } else {
            Verdict::Accept
        }
    }
}

/// Strict policy: only 2xx responses are acceptable.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptOnlySuccess;

impl ResponseClassifier for AcceptOnlySuccess {
    fn classify(&self, response: &Response) -> Verdict {
        if response.is_success() {
            Verdict::Accept
        } else {
            Verdict::Reject
        }
    }
}
