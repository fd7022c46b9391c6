//! The cluster client facade.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant as StdInstant;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use repliq_common::{ClusterResult, Request};

use crate::admission::AdmissionController;
use crate::classifier::{AcceptNonServerErrors, ResponseClassifier};
use crate::config::ClusterClientConfig;
use crate::monitor::{PoolStats, SaturationMonitor};
use crate::orchestrator::AttemptOrchestrator;
use crate::sequencer::ReplicaSequencer;
use crate::transport::Transport;

/// A resilient cluster-aware HTTP client.
///
/// Given a logical request, the client asks its sequencer for candidate
/// replicas, dispatches attempts through its transport under the request's
/// time budget, classifies each response, and folds everything into one
/// [`ClusterResult`]. The caller always receives a result value: replica
/// failures, timeouts, throttling, and even faults inside the dispatch
/// logic all surface as statuses, never as errors.
///
/// # Example
///
/// ```no_run
/// use repliq_client::{ClusterClient, HttpTransport, RoundRobinSequencer};
/// use repliq_common::Request;
/// use std::sync::Arc;
///
/// # #[tokio::main]
/// # async fn main() {
/// let client = ClusterClient::new(
///     Arc::new(HttpTransport::new()),
///     Arc::new(RoundRobinSequencer::new(vec![
///         "10.0.0.1:8080".to_string(),
///         "10.0.0.2:8080".to_string(),
///     ])),
/// );
///
/// let result = client.send(Request::get("users/42")).await;
/// println!("{:?} from {:?}", result.response().code, result.replica());
/// # }
/// ```
pub struct ClusterClient {
    transport: Arc<dyn Transport>,
    sequencer: Arc<dyn ReplicaSequencer>,
    classifier: Arc<dyn ResponseClassifier>,
    admission: Option<Arc<dyn AdmissionController>>,
    config: ClusterClientConfig,
    monitor: SaturationMonitor,
    in_flight: AtomicUsize,
}

impl ClusterClient {
    /// Creates a client with default configuration and the default
    /// classifier.
    pub fn new(transport: Arc<dyn Transport>, sequencer: Arc<dyn ReplicaSequencer>) -> Self {
        Self::with_config(transport, sequencer, ClusterClientConfig::default())
    }

    /// Creates a client with custom configuration.
    pub fn with_config(
        transport: Arc<dyn Transport>,
        sequencer: Arc<dyn ReplicaSequencer>,
        config: ClusterClientConfig,
    ) -> Self {
        info!(
            parallelism = config.parallelism,
            default_timeout_ms = config.default_timeout.as_millis() as u64,
            "cluster client initialized"
        );
        Self {
            transport,
            sequencer,
            classifier: Arc::new(AcceptNonServerErrors),
            admission: None,
            config,
            monitor: SaturationMonitor::default(),
            in_flight: AtomicUsize::new(0),
        }
    }

    /// Replaces the response classifier.
    pub fn with_classifier(mut self, classifier: Arc<dyn ResponseClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Installs an admission controller consulted before every dispatch.
    pub fn with_admission(mut self, admission: Arc<dyn AdmissionController>) -> Self {
        self.admission = Some(admission);
        self
    }

    /// Sends a request to the cluster.
    pub async fn send(&self, request: impl Into<Arc<Request>>) -> ClusterResult {
        self.send_with_cancel(request, CancellationToken::new()).await
    }

    /// Sends a request under a caller-supplied cancellation token.
    ///
    /// Cancellation immediately stops new attempts, best-effort cancels
    /// in-flight ones, and reports whatever completed under the `Canceled`
    /// status.
    pub async fn send_with_cancel(
        &self,
        request: impl Into<Arc<Request>>,
        cancel: CancellationToken,
    ) -> ClusterResult {
        let request = request.into();

        if let Err(error) = request.validate() {
            warn!(%error, "rejecting invalid request");
            return ClusterResult::incorrect_arguments(request);
        }

        if let Some(admission) = &self.admission {
            if !admission.admit(&request).await.is_allowed() {
                debug!(path = %request.path, "call throttled by admission control");
                return ClusterResult::throttled(request);
            }
        }

        let in_flight = self.in_flight.fetch_add(1, Ordering::Relaxed) + 1;
        let _guard = InFlightGuard(&self.in_flight);
        self.monitor.observe(
            StdInstant::now(),
            PoolStats {
                in_flight,
                capacity: self.config.max_in_flight,
            },
        );

        let deadline =
            Instant::now() + request.timeout.unwrap_or(self.config.default_timeout);
        let orchestrator = AttemptOrchestrator::new(
            Arc::clone(&self.transport),
            Arc::clone(&self.classifier),
            &self.config,
        );
        let replicas = self.sequencer.sequence(&request);

        let dispatch = {
            let request = Arc::clone(&request);
            async move { orchestrator.dispatch(request, replicas, deadline, cancel).await }
        };

        // The dispatch runs as its own task: a fault inside the
        // orchestration logic surfaces as a status, never as a panic in the
        // caller.
        match tokio::spawn(dispatch).await {
            Ok(outcome) => {
                let status = outcome.status();
                debug!(?status, attempts = outcome.results.len(), "dispatch finished");
                ClusterResult::new(status, outcome.results, outcome.selected, request)
            }
            Err(join_error) => {
                warn!(%join_error, "dispatch task failed");
                ClusterResult::unexpected_exception(request)
            }
        }
    }
}

struct InFlightGuard<'a>(&'a AtomicUsize);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::Relaxed);
    }
}
