//! Per-target exponential backoff.
//!
//! A [`BackoffController`] owns one [`RetryState`] and answers two questions for
//! the orchestrator: "should I call now, and after how long?" ([`BackoffController::next_wait`])
//! and "what does this response mean for future calls?" ([`BackoffController::observe`]).

use std::time::Duration;

use crate::classify::{ClassifiedResponse, classify};

/// Wait before the first call, doubled after every server error.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);
/// A computed wait at or above this gives up on the target.
pub const DEFAULT_THRESHOLD: Duration = Duration::from_secs(16);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    pub base_delay: Duration,
    pub threshold: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self { base_delay: DEFAULT_BASE_DELAY, threshold: DEFAULT_THRESHOLD }
    }
}

impl BackoffPolicy {
    /// `2^attempt * base_delay`, saturating instead of overflowing.
    pub fn wait_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Will attempt a call on the next cycle.
    Active,
    /// Backoff reached the threshold; no further calls.
    Exhausted,
    /// Got a definitive answer (success, client error or transport failure).
    Satisfied,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Phase::Active)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryState {
    attempt_count: u32,
    phase: Phase,
    threshold: Duration,
}

impl RetryState {
    pub fn new(threshold: Duration) -> Self {
        Self { attempt_count: 0, phase: Phase::Active, threshold }
    }

    pub fn attempt_count(&self) -> u32 {
        self.attempt_count
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether further calls are permitted. Once false, stays false.
    pub fn is_active(&self) -> bool {
        self.phase == Phase::Active
    }

    pub fn threshold(&self) -> Duration {
        self.threshold
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextStep {
    /// Sleep for the given duration, then issue the call.
    WaitThenCall(Duration),
    /// No further calls for this target.
    Stop,
}

#[derive(Debug, Clone)]
pub struct BackoffController {
    policy: BackoffPolicy,
    state: RetryState,
}

impl BackoffController {
    pub fn new(policy: BackoffPolicy) -> Self {
        Self { policy, state: RetryState::new(policy.threshold) }
    }

    pub fn state(&self) -> &RetryState {
        &self.state
    }

    /// Decide the next step. Moves to [`Phase::Exhausted`] when the wait would
    /// reach the threshold; an exact hit counts as reached.
    pub fn next_wait(&mut self) -> NextStep {
        if !self.state.is_active() {
            return NextStep::Stop;
        }

        let wait = self.policy.wait_for(self.state.attempt_count);
        if wait >= self.state.threshold {
            self.state.phase = Phase::Exhausted;
            return NextStep::Stop;
        }

        NextStep::WaitThenCall(wait)
    }

    /// Feed back the outcome of the last call. Ignored once terminal.
    pub fn observe(&mut self, response: &ClassifiedResponse) {
        if !self.state.is_active() {
            return;
        }

        // Transport failures carry no status and are never retried.
        match response.status().map(classify) {
            Some(class) if class.is_retryable() => self.state.attempt_count += 1,
            _ => self.state.phase = Phase::Satisfied,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::TransportError;

    fn server_error() -> ClassifiedResponse {
        ClassifiedResponse::ServerError { status: 503 }
    }

    #[test]
    fn wait_doubles_until_threshold_then_exhausts() {
        let mut ctl = BackoffController::new(BackoffPolicy::default());
        let mut waits = Vec::new();

        while let NextStep::WaitThenCall(wait) = ctl.next_wait() {
            waits.push(wait.as_millis());
            ctl.observe(&server_error());
        }

        assert_eq!(waits, vec![1000, 2000, 4000, 8000]);
        assert_eq!(ctl.state().phase(), Phase::Exhausted);
        assert_eq!(ctl.state().attempt_count(), 4);
        assert_eq!(ctl.state().threshold(), DEFAULT_THRESHOLD);
        assert!(!ctl.state().is_active());
        assert!(ctl.state().phase().is_terminal());
    }

    #[test]
    fn wait_equal_to_threshold_is_not_attempted() {
        let policy = BackoffPolicy {
            base_delay: Duration::from_secs(2),
            threshold: Duration::from_secs(2),
        };
        let mut ctl = BackoffController::new(policy);

        assert_eq!(ctl.next_wait(), NextStep::Stop);
        assert_eq!(ctl.state().phase(), Phase::Exhausted);
    }

    #[test]
    fn success_settles_and_freezes_attempts() {
        let mut ctl = BackoffController::new(BackoffPolicy::default());
        assert!(matches!(ctl.next_wait(), NextStep::WaitThenCall(_)));
        ctl.observe(&server_error());
        assert!(matches!(ctl.next_wait(), NextStep::WaitThenCall(_)));
        ctl.observe(&ClassifiedResponse::Success { status: 200, body: String::new() });

        assert_eq!(ctl.state().phase(), Phase::Satisfied);
        assert_eq!(ctl.state().attempt_count(), 1);

        // Terminal states absorb further observations.
        ctl.observe(&server_error());
        assert_eq!(ctl.state().attempt_count(), 1);
        assert_eq!(ctl.next_wait(), NextStep::Stop);
        assert_eq!(ctl.state().phase(), Phase::Satisfied);
    }

    #[test]
    fn client_error_and_transport_failure_are_not_retried() {
        let mut ctl = BackoffController::new(BackoffPolicy::default());
        ctl.observe(&ClassifiedResponse::ClientError { status: 404, body: String::new() });
        assert_eq!(ctl.state().phase(), Phase::Satisfied);
        assert_eq!(ctl.state().attempt_count(), 0);

        let mut ctl = BackoffController::new(BackoffPolicy::default());
        ctl.observe(&server_error());
        ctl.observe(&ClassifiedResponse::TransportFailure(TransportError::Timeout));
        assert_eq!(ctl.state().phase(), Phase::Satisfied);
        assert_eq!(ctl.state().attempt_count(), 1);
    }

    #[test]
    fn only_the_server_error_band_counts_as_an_attempt() {
        use crate::transport::HttpReply;

        for (status, retried) in [(200, false), (302, false), (404, false), (500, true), (599, true)] {
            let mut ctl = BackoffController::new(BackoffPolicy::default());
            let reply = HttpReply { status, body: String::new() };
            ctl.observe(&ClassifiedResponse::from_result(Ok(reply)));

            assert_eq!(ctl.state().is_active(), retried, "status {status}");
            assert_eq!(ctl.state().attempt_count(), u32::from(retried), "status {status}");
        }
    }

    #[test]
    fn exhausted_never_becomes_active_again() {
        let policy = BackoffPolicy { base_delay: Duration::from_secs(20), ..Default::default() };
        let mut ctl = BackoffController::new(policy);

        assert_eq!(ctl.next_wait(), NextStep::Stop);
        ctl.observe(&ClassifiedResponse::Success { status: 200, body: String::new() });
        assert_eq!(ctl.state().phase(), Phase::Exhausted);
        assert_eq!(ctl.next_wait(), NextStep::Stop);
    }

    #[test]
    fn huge_attempt_counts_saturate() {
        let policy = BackoffPolicy::default();
        assert_eq!(policy.wait_for(0), Duration::from_secs(1));
        assert_eq!(policy.wait_for(4), Duration::from_secs(16));
        assert_eq!(policy.wait_for(200), Duration::from_secs(u64::from(u32::MAX)));

        let policy = BackoffPolicy { base_delay: Duration::MAX / 2, ..Default::default() };
        assert_eq!(policy.wait_for(3), Duration::MAX);
    }
}
