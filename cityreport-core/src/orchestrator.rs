//! Drives one backoff controller per target until every target settles.
//!
//! Targets run concurrently on the current task. Each keeps exactly one call
//! in flight at a time and never observes the state of the others.

use futures::future::join_all;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::{
    backoff::{BackoffController, BackoffPolicy, NextStep, Phase},
    city::CityQuery,
    classify::ClassifiedResponse,
    console::Console,
    report::{self, Report},
    target::{ApiTarget, TargetId},
    transport::{Transport, TransportError},
};

/// How a target's loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    /// A structured report was printed.
    Reported,
    /// The target answered, but nothing usable could be shown.
    Unavailable,
    /// Server errors pushed the backoff to its threshold.
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetOutcome {
    pub target: TargetId,
    pub settled: Settled,
    /// Number of server errors observed.
    pub attempts: u32,
    /// Number of wait-then-call cycles started, including an interrupted one.
    pub calls: u32,
}

pub struct Orchestrator<'a> {
    transport: &'a dyn Transport,
    console: &'a dyn Console,
    policy: BackoffPolicy,
    cancel: CancellationToken,
}

impl<'a> Orchestrator<'a> {
    pub fn new(transport: &'a dyn Transport, console: &'a dyn Console, policy: BackoffPolicy) -> Self {
        Self { transport, console, policy, cancel: CancellationToken::new() }
    }

    /// Abort in-progress waits and calls when `cancel` fires.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Run every target to a terminal state. Outcomes come back in `targets` order.
    pub async fn run(&self, targets: &[ApiTarget], city: &CityQuery) -> Vec<TargetOutcome> {
        join_all(targets.iter().map(|target| self.drive(target, city))).await
    }

    #[tracing::instrument(skip_all, fields(api = %target.id()))]
    async fn drive(&self, target: &ApiTarget, city: &CityQuery) -> TargetOutcome {
        let id = target.id();
        let mut controller = BackoffController::new(self.policy);
        let mut settled = Settled::Exhausted;
        let mut calls = 0;

        loop {
            let wait = match controller.next_wait() {
                NextStep::WaitThenCall(wait) => wait,
                NextStep::Stop => {
                    if controller.state().phase() == Phase::Exhausted {
                        warn!(attempts = controller.state().attempt_count(), "backoff threshold reached");
                        self.console
                            .print(&format!("{} re-try threshold reached, terminating retrying", id.label()));
                    }
                    break;
                }
            };

            calls += 1;
            let response = self.call(target, wait).await;
            controller.observe(&response);

            match response {
                ClassifiedResponse::ServerError { status } => {
                    warn!(status, attempts = controller.state().attempt_count(), "server error");
                    self.console.print(&format!("{} call failed (HTTP {status}), re-trying...", id.label()));
                }
                ClassifiedResponse::Success { status, body } => {
                    debug!(status, "call succeeded");
                    settled = self.emit(id, report::format_body(id, &body, city));
                }
                ClassifiedResponse::ClientError { status, body } => {
                    warn!(status, "client error, not retrying");
                    settled = self.emit(id, report::format_body(id, &body, city));
                }
                ClassifiedResponse::TransportFailure(err) => {
                    error!(%err, "transport failure, not retrying");
                    settled = self.emit(id, report::unavailable(id, city));
                }
            }
        }

        let outcome = TargetOutcome {
            target: id,
            settled,
            attempts: controller.state().attempt_count(),
            calls,
        };
        info!(settled = ?outcome.settled, attempts = outcome.attempts, calls = outcome.calls, "target settled");
        outcome
    }

    /// Sleep for `wait`, then issue the GET. Cancellation at either point
    /// yields [`TransportError::Interrupted`].
    async fn call(&self, target: &ApiTarget, wait: std::time::Duration) -> ClassifiedResponse {
        debug!(wait_ms = wait.as_millis() as u64, "waiting before call");

        let result = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(TransportError::Interrupted),
            result = async {
                tokio::time::sleep(wait).await;
                self.transport.get(target.url()).await
            } => result,
        };

        ClassifiedResponse::from_result(result)
    }

    fn emit(&self, id: TargetId, report: Report) -> Settled {
        self.console.print(&format!("{}\n{}\n", report::header(id), report.text()));
        if report.is_data() { Settled::Reported } else { Settled::Unavailable }
    }
}
