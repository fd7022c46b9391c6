use std::time::Duration;

/// Configuration for a [`ClusterClient`](crate::ClusterClient).
///
/// The defaults give classic sequential failover: one attempt in flight at a
/// time, no attempt cap beyond the candidate sequence itself, and a 30
/// second overall budget for requests that do not carry their own timeout.
#[derive(Debug, Clone)]
pub struct ClusterClientConfig {
    /// Maximum number of attempts allowed to run concurrently.
    ///
    /// At 1 (the default), attempts are strictly sequential. Above 1, the
    /// first accepted response wins and remaining in-flight attempts are
    /// best-effort canceled.
    pub parallelism: usize,

    /// Hard ceiling on the number of attempts per call.
    ///
    /// `None` (the default) bounds dispatch by the candidate sequence alone.
    pub max_attempts: Option<usize>,

    /// Overall time budget applied when a request carries no timeout.
    pub default_timeout: Duration,

    /// Pause between consecutive attempts in sequential dispatch.
    ///
    /// Only applies when `parallelism` is 1; always bounded by the overall
    /// deadline. `None` (the default) moves to the next replica immediately.
    pub attempt_delay: Option<Duration>,

    /// In-flight call count at which the saturation monitor starts warning.
    ///
    /// Observability only: calls above this threshold still dispatch, they
    /// just get reported.
    pub max_in_flight: usize,
}

impl Default for ClusterClientConfig {
    fn default() -> Self {
        Self {
            parallelism: 1,
            max_attempts: None,
            default_timeout: Duration::from_secs(30),
            attempt_delay: None,
            max_in_flight: 256,
        }
    }
}
