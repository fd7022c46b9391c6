//! Attempt orchestration.
//!
//! This is the engine that turns a candidate replica sequence into a single
//! dispatch outcome. It drives attempts under a deadline, a concurrency
//! width, and an optional attempt ceiling, and folds every completion into
//! an ordered record of what happened.
//!
//! # Architecture
//!
//! A dispatch run is a loop owned by one driver task:
//!
//! 1. **Launch**: while no response has been accepted and the concurrency
//!    budget has room, pull the next candidate from the (lazy) sequence and
//!    spawn an attempt task for it. The sequence is only pulled as far as
//!    the budget requires.
//! 2. **Await**: a biased select over attempt completions, caller
//!    cancellation, and the deadline, in that order, so a response that
//!    arrives at the same moment the deadline fires is still classified.
//! 3. **Record**: every completed attempt becomes a [`ReplicaResult`] in a
//!    slot indexed by attempt start order. Transport faults are absorbed
//!    into synthetic responses before recording; they never escape.
//! 4. **Settle**: on the first accepted response, already-completed attempts
//!    are drained without blocking (a racing accept with a lower attempt
//!    index explicitly wins the tie-break), the rest are best-effort
//!    aborted, and whatever still completed is recorded for diagnostics.
//!
//! Completions serialize through the driver task, so the result slots and
//! the accepted-attempt tracker have exactly one writer and the first
//! accept wins exactly once.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::task::{JoinError, JoinSet};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use repliq_common::fault::Fault;
use repliq_common::{ClusterResultStatus, ReplicaResult, Request, Response, Verdict};

use crate::classifier::ResponseClassifier;
use crate::config::ClusterClientConfig;
use crate::transport::Transport;

/// States of one dispatch run.
///
/// A run moves from `Idle` through `Running` into exactly one terminal
/// state, which determines the aggregated result's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    /// Dispatch has not started.
    Idle,
    /// Attempts are being issued.
    Running,
    /// A response was accepted.
    Completed,
    /// The deadline was reached before any response was accepted.
    Expired,
    /// The caller canceled the dispatch.
    Canceled,
    /// The candidate sequence ran dry without an accepted response.
    Exhausted,
    /// The dispatch logic itself faulted.
    Faulted,
}

impl DispatchState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Idle | Self::Running)
    }
}

/// What one dispatch run produced.
#[derive(Debug)]
pub struct DispatchOutcome {
    pub state: DispatchState,
    /// Completed attempts, in attempt start order.
    pub results: Vec<ReplicaResult>,
    /// The accepted response, present exactly when `state` is `Completed`.
    pub selected: Option<Arc<Response>>,
}

impl DispatchOutcome {
    /// Maps the terminal state onto the aggregated result status.
    pub fn status(&self) -> ClusterResultStatus {
        match self.state {
            DispatchState::Completed => ClusterResultStatus::Success,
            DispatchState::Expired => ClusterResultStatus::TimeExpired,
            DispatchState::Canceled => ClusterResultStatus::Canceled,
            DispatchState::Exhausted => {
                if self.results.is_empty() {
                    // The sequence yielded no candidates at all.
                    ClusterResultStatus::ReplicasNotFound
                } else {
                    ClusterResultStatus::ReplicasExhausted
                }
            }
            // Non-terminal states never escape dispatch; treat them as a
            // logic fault if they somehow do.
            DispatchState::Faulted | DispatchState::Idle | DispatchState::Running => {
                ClusterResultStatus::UnexpectedException
            }
        }
    }
}

/// One attempt task's report back to the driver.
struct AttemptCompletion {
    index: usize,
    replica: String,
    elapsed: Duration,
    outcome: Result<Response, Fault>,
}

/// Drives attempts against a candidate sequence under a deadline.
pub struct AttemptOrchestrator {
    transport: Arc<dyn Transport>,
    classifier: Arc<dyn ResponseClassifier>,
    parallelism: usize,
    max_attempts: Option<usize>,
    attempt_delay: Option<Duration>,
}

impl AttemptOrchestrator {
    pub fn new(
        transport: Arc<dyn Transport>,
        classifier: Arc<dyn ResponseClassifier>,
        config: &ClusterClientConfig,
    ) -> Self {
        Self {
            transport,
            classifier,
            parallelism: config.parallelism.max(1),
            max_attempts: config.max_attempts,
            attempt_delay: config.attempt_delay,
        }
    }

    /// Runs one dispatch to a terminal state.
    pub async fn dispatch(
        &self,
        request: Arc<Request>,
        mut replicas: Box<dyn Iterator<Item = String> + Send>,
        deadline: Instant,
        cancel: CancellationToken,
    ) -> DispatchOutcome {
        let mut state = DispatchState::Running;
        let mut in_flight: JoinSet<AttemptCompletion> = JoinSet::new();
        // One slot per started attempt; slot order is start order.
        let mut slots: Vec<Option<ReplicaResult>> = Vec::new();
        let mut accepted: Option<usize> = None;
        let mut sequence_dry = false;

        if cancel.is_cancelled() {
            return DispatchOutcome {
                state: DispatchState::Canceled,
                results: Vec::new(),
                selected: None,
            };
        }

        loop {
            // Pause between sequential attempts, if configured. Bounded by
            // the deadline and responsive to cancellation.
            if let Some(delay) = self.attempt_delay {
                if self.parallelism == 1
                    && !slots.is_empty()
                    && in_flight.is_empty()
                    && !sequence_dry
                    && self.max_attempts.map_or(true, |max| slots.len() < max)
                {
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => {
                            state = DispatchState::Canceled;
                            break;
                        }
                        _ = tokio::time::sleep_until(deadline) => {
                            state = DispatchState::Expired;
                            break;
                        }
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
            }

            // Launch until the concurrency budget is full or an accept has
            // already settled the call.
            while accepted.is_none()
                && !sequence_dry
                && in_flight.len() < self.parallelism
                && self.max_attempts.map_or(true, |max| slots.len() < max)
            {
                match replicas.next() {
                    Some(replica) => {
                        let index = slots.len();
                        slots.push(None);
                        debug!(attempt = index, replica = %replica, "starting attempt");

                        let transport = Arc::clone(&self.transport);
                        let request = Arc::clone(&request);
                        let budget = deadline.saturating_duration_since(Instant::now());
                        in_flight.spawn(async move {
                            let started = Instant::now();
                            let outcome =
                                AssertUnwindSafe(transport.send(&request, &replica, budget))
                                    .catch_unwind()
                                    .await
                                    .unwrap_or_else(|_| {
                                        Err(Fault::task_panic("attempt task panicked"))
                                    });
                            AttemptCompletion {
                                index,
                                replica,
                                elapsed: started.elapsed(),
                                outcome,
                            }
                        });
                    }
                    None => sequence_dry = true,
                }
            }

            if in_flight.is_empty() {
                state = if accepted.is_some() {
                    DispatchState::Completed
                } else {
                    DispatchState::Exhausted
                };
                break;
            }

            tokio::select! {
                biased;

                completion = in_flight.join_next() => {
                    if let Some(completion) = completion {
                        self.record(&mut slots, &mut accepted, &mut state, completion);
                    }
                    if accepted.is_some() {
                        // Tie-break drain: anything that has also finished by
                        // now gets recorded, and a lower-index accept among
                        // them wins over the one just observed.
                        while let Some(extra) = in_flight.try_join_next() {
                            self.record(&mut slots, &mut accepted, &mut state, extra);
                        }
                        state = DispatchState::Completed;
                        break;
                    }
                    if state == DispatchState::Faulted {
                        break;
                    }
                }

                _ = cancel.cancelled() => {
                    state = DispatchState::Canceled;
                    break;
                }

                _ = tokio::time::sleep_until(deadline) => {
                    state = DispatchState::Expired;
                    break;
                }
            }
        }

        // Best-effort cancel whatever is still running, then record any
        // attempt that had in fact already completed.
        in_flight.abort_all();
        while let Some(completion) = in_flight.join_next().await {
            self.record(&mut slots, &mut accepted, &mut state, completion);
        }

        let selected = match state {
            DispatchState::Completed => accepted
                .and_then(|index| slots.get(index))
                .and_then(|slot| slot.as_ref())
                .map(|result| Arc::clone(&result.response)),
            _ => None,
        };
        let results: Vec<ReplicaResult> = slots.into_iter().flatten().collect();

        debug!(
            ?state,
            attempts = results.len(),
            accepted = ?accepted,
            "dispatch settled"
        );

        DispatchOutcome {
            state,
            results,
            selected,
        }
    }

    /// Folds one attempt completion into the result slots.
    ///
    /// Faults are absorbed into synthetic responses here, so every recorded
    /// attempt carries a response. The accepted-attempt tracker keeps the
    /// lowest attempt index among accepts.
    fn record(
        &self,
        slots: &mut [Option<ReplicaResult>],
        accepted: &mut Option<usize>,
        state: &mut DispatchState,
        completion: Result<AttemptCompletion, JoinError>,
    ) {
        let completion = match completion {
            Ok(completion) => completion,
            Err(join_error) if join_error.is_cancelled() => {
                // An aborted in-flight attempt; nothing completed to record.
                debug!("in-flight attempt aborted");
                return;
            }
            Err(join_error) => {
                warn!(%join_error, "attempt task failed outside the transport");
                if *state == DispatchState::Running {
                    *state = DispatchState::Faulted;
                }
                return;
            }
        };

        let response = match completion.outcome {
            Ok(response) => Arc::new(response),
            Err(fault) => {
                warn!(
                    attempt = completion.index,
                    replica = %completion.replica,
                    fault = %fault,
                    "attempt failed; absorbing fault into a synthetic response"
                );
                Arc::new(Response::new(fault.response_code()))
            }
        };

        let verdict = self.classifier.classify(&response);
        debug!(
            attempt = completion.index,
            replica = %completion.replica,
            code = %response.code,
            ?verdict,
            "attempt completed"
        );

        // Accepts recorded after the run has settled are kept for
        // diagnostics only; they never override the decision.
        if verdict == Verdict::Accept && *state == DispatchState::Running {
            match *accepted {
                // The earliest-started accept wins a race.
                Some(current) if current <= completion.index => {}
                _ => *accepted = Some(completion.index),
            }
        }

        slots[completion.index] = Some(ReplicaResult::new(
            completion.replica,
            response,
            verdict,
            completion.elapsed,
        ));
    }
}
