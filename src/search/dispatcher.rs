//! Concurrent provider dispatch with per-call timeouts

use super::models::{ProviderCall, ProviderOutcome};
use crate::providers::{Capability, ProviderError};
use crate::results::Record;
use futures::future::join_all;
use std::time::Duration;
use tokio::time::{timeout, Instant};
use tracing::{debug, warn};

/// A capability bounded by a deadline
#[derive(Debug, Clone)]
pub struct TimedCapability {
    capability: Capability,
    timeout: Duration,
}

/// Decorate `capability` so every call gives up after `duration`
pub fn with_timeout(capability: Capability, duration: Duration) -> TimedCapability {
    TimedCapability {
        capability,
        timeout: duration,
    }
}

impl TimedCapability {
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run one fetch to a terminal state.
    ///
    /// On expiry the task is aborted; a blocking fetch cannot be interrupted,
    /// so it runs to completion and its result is dropped. Panics come back
    /// as `ProviderError::Task`.
    pub async fn call(&self, query: &str, limit: usize) -> Result<Vec<Record>, ProviderError> {
        let mut handle = self.capability.invoke(query.to_string(), limit);

        match timeout(self.timeout, &mut handle).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(ProviderError::Task(join_error.to_string())),
            Err(_) => {
                handle.abort();
                Err(ProviderError::Timeout {
                    after: self.timeout,
                })
            }
        }
    }
}

/// Run a single provider call and log how it ended
pub async fn execute(call: ProviderCall, query: &str, limit: usize) -> ProviderOutcome {
    let start = Instant::now();
    let result = with_timeout(call.capability, call.timeout)
        .call(query, limit)
        .await;
    let elapsed = start.elapsed();

    match &result {
        Ok(records) => debug!(
            "Provider {} returned {} records in {:?}",
            call.provider,
            records.len(),
            elapsed
        ),
        Err(ProviderError::Timeout { after }) => warn!(
            "Timeout for provider {} after {:?} (limit {:?})",
            call.provider, elapsed, after
        ),
        Err(e) => warn!(
            "Provider {} failed after {:?}: {}",
            call.provider, elapsed, e
        ),
    }

    ProviderOutcome {
        provider: call.provider,
        profile: call.profile,
        result,
        elapsed,
    }
}

/// Fan out `calls` concurrently and wait for every one of them.
///
/// Outcomes come back in submission order. Total latency is bounded by the
/// largest individual timeout.
pub async fn dispatch(calls: Vec<ProviderCall>, query: &str, limit: usize) -> Vec<ProviderOutcome> {
    let futures: Vec<_> = calls
        .into_iter()
        .map(|call| execute(call, query, limit))
        .collect();

    debug!("Dispatching '{}' to {} providers", query, futures.len());

    join_all(futures).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::mock::{names, MockProvider};

    fn call(mock: &MockProvider, timeout_ms: u64) -> ProviderCall {
        ProviderCall::new(
            mock.key(),
            mock.capability(),
            Duration::from_millis(timeout_ms),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_outcomes_follow_submission_order() {
        let slow = MockProvider::new("slow").returns(2).delay(Duration::from_millis(300));
        let fast = MockProvider::new("fast").returns(1).delay(Duration::from_millis(10));

        let outcomes = dispatch(vec![call(&slow, 1000), call(&fast, 1000)], "cal", 5).await;

        let keys: Vec<_> = outcomes.iter().map(|o| o.provider.as_str()).collect();
        assert_eq!(keys, vec!["slow", "fast"]);
        assert_eq!(outcomes[0].result_count(), 2);
        assert_eq!(outcomes[1].result_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_isolated() {
        let hung = MockProvider::new("hung").returns(3).delay(Duration::from_secs(2));
        let ok = MockProvider::new("ok").returns(2).delay(Duration::from_millis(100));

        let outcomes = dispatch(vec![call(&hung, 1000), call(&ok, 1000)], "arena", 5).await;

        assert!(matches!(
            outcomes[0].result,
            Err(ProviderError::Timeout { after }) if after == Duration::from_secs(1)
        ));
        let records = outcomes[1].result.as_ref().unwrap();
        assert_eq!(names(records), vec!["ok-0", "ok-1"]);
    }

    #[tokio::test]
    async fn test_error_and_panic_are_isolated() {
        let broken = MockProvider::new("broken").fails();
        let panicky = MockProvider::new("panicky").panics();
        let ok = MockProvider::new("ok").returns(1);

        let outcomes = dispatch(
            vec![call(&broken, 1000), call(&panicky, 1000), call(&ok, 1000)],
            "hierro",
            5,
        )
        .await;

        assert!(matches!(outcomes[0].result, Err(ProviderError::Status(503))));
        assert!(matches!(outcomes[1].result, Err(ProviderError::Task(_))));
        assert!(outcomes[2].is_success());
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_bounded_by_largest_timeout() {
        let a = MockProvider::new("a").returns(1).delay(Duration::from_secs(5));
        let b = MockProvider::new("b").returns(1).delay(Duration::from_secs(8));
        let c = MockProvider::new("c").returns(1).delay(Duration::from_secs(3));

        let start = tokio::time::Instant::now();
        let outcomes = dispatch(
            vec![call(&a, 5_500), call(&b, 8_500), call(&c, 3_500)],
            "ladrillo",
            5,
        )
        .await;
        let elapsed = start.elapsed();

        assert!(outcomes.iter().all(ProviderOutcome::is_success));
        assert!(elapsed >= Duration::from_secs(8));
        assert!(elapsed < Duration::from_secs(9));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_blocking_provider_runs_off_scheduler() {
        let blocking = MockProvider::new("blocking")
            .returns(2)
            .delay(Duration::from_millis(50));
        let fast = MockProvider::new("fast").returns(1);

        let calls = vec![
            ProviderCall::new("blocking", blocking.blocking(), Duration::from_secs(5)),
            call(&fast, 5_000),
        ];
        let outcomes = dispatch(calls, "cal", 5).await;

        assert_eq!(outcomes[0].result_count(), 2);
        assert_eq!(outcomes[1].result_count(), 1);
        assert_eq!(blocking.calls(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_blocking_timeout_abandons_result() {
        let stuck = MockProvider::new("stuck")
            .returns(1)
            .delay(Duration::from_millis(500));

        let timed = with_timeout(stuck.blocking(), Duration::from_millis(50));
        let result = timed.call("cal", 5).await;

        assert!(matches!(result, Err(ProviderError::Timeout { .. })));
    }

    #[tokio::test]
    async fn test_limit_is_forwarded() {
        let mock = MockProvider::new("m").returns(10);
        let outcomes = dispatch(vec![call(&mock, 1000)], "cal", 7).await;

        assert_eq!(mock.last_limit(), 7);
        assert_eq!(outcomes[0].result_count(), 7);
    }
}
