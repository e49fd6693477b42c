//! Concurrent trial harness
//!
//! A trial fires `n` simultaneous sale attempts at one item and reports how
//! the per-item lock serialized them. It is a diagnostic, not a production
//! path: it exists to show that exactly `min(initial, n)` attempts succeed
//! no matter how the scheduler interleaves them.
//!
//! All workers rendezvous on a barrier before dispatching, so every attempt
//! is genuinely contending for the lock. Each successful attempt then holds
//! the lock for the configured hold time before committing; a broken lock
//! would let a second attempt pass its stock check inside that window.
//!
//! Queued attempts may wait behind every hold, so a trial bounds each lock
//! wait by the store's lock timeout plus `hold * min(n, initial)` rather
//! than by the lock timeout alone.

use crate::reservation::{ReservationEngine, SaleObserver};
use parking_lot::Mutex;
use serde::Serialize;
use std::cell::Cell;
use std::sync::Barrier;
use std::thread;
use std::time::{Duration, Instant};
use stockguard_core::{
    validate_item_id, Error, ItemId, ItemRecord, PreventionReason, Result,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Message attached to attempts that ended in a fault.
pub const FAULT_MESSAGE: &str = "Sale failed";

/// One attempt's result, as reported
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialAttempt {
    /// 1-based dispatch number
    pub request: usize,
    /// Whether the attempt sold a unit
    pub success: bool,
    /// Milliseconds from dispatch to lock acquisition, two decimals
    #[serde(rename = "waitTime")]
    pub wait_time_ms: f64,
    /// Outcome message
    pub message: String,
    /// Why the attempt was prevented
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<PreventionReason>,
    /// Fault text, if the attempt failed with a system error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fault: Option<String>,
}

impl TrialAttempt {
    /// Whether the attempt ended in a fault rather than an outcome
    pub fn is_fault(&self) -> bool {
        self.fault.is_some()
    }
}

/// Aggregate result of one trial
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialReport {
    /// Unique id of this trial
    pub trial_id: Uuid,
    /// Item under test
    pub item: ItemId,
    /// `count` before any attempt started
    pub initial_count: u64,
    /// `count` after every attempt finished
    pub final_count: u64,
    /// `reserved` after every attempt finished
    pub final_reserved: u64,
    /// Attempts dispatched
    pub total_requests: usize,
    /// Attempts that sold a unit
    pub successful: usize,
    /// Attempts cleanly prevented
    pub prevented: usize,
    /// Attempts that ended in a fault
    pub failed: usize,
    /// Configured in-lock hold
    pub hold_ms: u64,
    /// Wall time of the whole trial
    pub elapsed_ms: f64,
    /// Every attempt, ordered by wait time
    pub results: Vec<TrialAttempt>,
}

impl TrialReport {
    /// Whether the counts are consistent with strict serialization
    ///
    /// Holds when nothing else touched the item during the trial.
    pub fn upholds_guarantee(&self) -> bool {
        let accounted = self.successful + self.prevented + self.failed == self.total_requests;
        let bounded = self.successful as u64 <= self.initial_count;
        let conserved = self.final_count == self.initial_count.saturating_sub(self.successful as u64);
        accounted && bounded && conserved
    }
}

/// Instruments one attempt from inside the locked section
struct AttemptTimer {
    dispatched: Instant,
    acquired: Cell<Option<Instant>>,
    hold: Duration,
}

impl SaleObserver for AttemptTimer {
    fn on_lock_acquired(&self) {
        self.acquired.set(Some(Instant::now()));
    }

    fn before_commit(&self, _post: &ItemRecord) {
        if !self.hold.is_zero() {
            thread::sleep(self.hold);
        }
    }
}

impl AttemptTimer {
    fn wait_ms(&self) -> f64 {
        let until = self.acquired.get().unwrap_or_else(Instant::now);
        round2(until.duration_since(self.dispatched).as_secs_f64() * 1000.0)
    }
}

fn round2(ms: f64) -> f64 {
    (ms * 100.0).round() / 100.0
}

/// Runs trials against a reservation engine
#[derive(Debug, Clone)]
pub struct TrialHarness {
    engine: ReservationEngine,
    hold: Duration,
    max_requests: usize,
}

impl TrialHarness {
    /// Create a harness
    ///
    /// `hold` is how long a successful attempt keeps the lock before
    /// committing; `max_requests` caps the trial size.
    pub fn new(engine: ReservationEngine, hold: Duration, max_requests: usize) -> Self {
        Self {
            engine,
            hold,
            max_requests,
        }
    }

    /// Fire `num_requests` concurrent sales at `id`
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidInput`] for a bad id or a size outside `1..=max`
    /// - [`Error::NotFound`] if the item does not exist
    ///
    /// Faults in individual attempts do not fail the trial; they are
    /// reported per attempt and counted in `failed`.
    pub fn run_trial(&self, id: &ItemId, num_requests: usize) -> Result<TrialReport> {
        validate_item_id(id)?;
        if num_requests == 0 || num_requests > self.max_requests {
            return Err(Error::InvalidInput(format!(
                "numRequests must be in 1..={}, got {}",
                self.max_requests, num_requests
            )));
        }

        let store = self.engine.store();
        let initial = store
            .get_item(id)
            .ok_or_else(|| Error::NotFound(format!("item {}", id)))?;

        let lock_wait = self.lock_wait(store.lock_timeout(), num_requests, initial.count);
        debug!(item = %id, requests = num_requests, lock_wait_ms = lock_wait.as_millis() as u64, "trial starting");

        let started = Instant::now();
        let barrier = Barrier::new(num_requests);
        let collected: Mutex<Vec<TrialAttempt>> = Mutex::new(Vec::with_capacity(num_requests));

        thread::scope(|scope| {
            for request in 1..=num_requests {
                let barrier = &barrier;
                let collected = &collected;
                scope.spawn(move || {
                    barrier.wait();
                    let attempt = self.attempt(id, request, lock_wait);
                    collected.lock().push(attempt);
                });
            }
        });

        let mut results = collected.into_inner();
        results.sort_by(|a, b| {
            a.wait_time_ms
                .total_cmp(&b.wait_time_ms)
                .then(a.request.cmp(&b.request))
        });

        let final_state = store
            .get_item(id)
            .ok_or_else(|| Error::Internal(format!("item {} disappeared during trial", id)))?;

        let successful = results.iter().filter(|r| r.success).count();
        let failed = results.iter().filter(|r| r.is_fault()).count();
        let report = TrialReport {
            trial_id: Uuid::new_v4(),
            item: id.clone(),
            initial_count: initial.count,
            final_count: final_state.count,
            final_reserved: final_state.reserved,
            total_requests: num_requests,
            successful,
            prevented: num_requests - successful - failed,
            failed,
            hold_ms: self.hold.as_millis() as u64,
            elapsed_ms: round2(started.elapsed().as_secs_f64() * 1000.0),
            results,
        };

        info!(
            trial = %report.trial_id,
            item = %id,
            requests = num_requests,
            initial = report.initial_count,
            successful = report.successful,
            prevented = report.prevented,
            failed = report.failed,
            final_count = report.final_count,
            "trial finished"
        );
        Ok(report)
    }

    /// Longest any attempt may wait for the lock
    ///
    /// At most `min(n, initial)` attempts hold the lock for `hold`; the
    /// store's timeout covers the short holds of prevented attempts.
    fn lock_wait(&self, base: Duration, num_requests: usize, initial_count: u64) -> Duration {
        let holders = (num_requests as u64).min(initial_count);
        let holders = u32::try_from(holders).unwrap_or(u32::MAX);
        base.saturating_add(self.hold.saturating_mul(holders))
    }

    fn attempt(&self, id: &ItemId, request: usize, lock_wait: Duration) -> TrialAttempt {
        let timer = AttemptTimer {
            dispatched: Instant::now(),
            acquired: Cell::new(None),
            hold: self.hold,
        };

        match self.engine.attempt_sale_within(id, lock_wait, &timer) {
            Ok(outcome) => TrialAttempt {
                request,
                success: outcome.is_sold(),
                wait_time_ms: timer.wait_ms(),
                message: outcome.message().to_string(),
                reason: outcome.reason(),
                fault: None,
            },
            Err(e) => {
                warn!(item = %id, request, error = %e, "trial attempt faulted");
                TrialAttempt {
                    request,
                    success: false,
                    wait_time_ms: timer.wait_ms(),
                    message: FAULT_MESSAGE.to_string(),
                    reason: None,
                    fault: Some(e.to_string()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use stockguard_storage::LedgerStore;

    fn harness(count: u64, hold_ms: u64) -> (TrialHarness, ItemId) {
        let store = Arc::new(LedgerStore::ephemeral());
        let id = ItemId::from("X");
        store.seed_item(&id, "Widget", count).unwrap();
        let engine = ReservationEngine::new(store);
        (
            TrialHarness::new(engine, Duration::from_millis(hold_ms), 100),
            id,
        )
    }

    #[test]
    fn test_sample_scenario() {
        let (harness, id) = harness(3, 5);
        let report = harness.run_trial(&id, 5).unwrap();

        assert_eq!(report.initial_count, 3);
        assert_eq!(report.successful, 3);
        assert_eq!(report.prevented, 2);
        assert_eq!(report.failed, 0);
        assert_eq!(report.final_count, 0);
        assert_eq!(report.final_reserved, 3);
        assert_eq!(report.results.len(), 5);
        assert!(report.upholds_guarantee());
    }

    #[test]
    fn test_results_sorted_by_wait() {
        let (harness, id) = harness(4, 2);
        let report = harness.run_trial(&id, 8).unwrap();
        assert!(report
            .results
            .windows(2)
            .all(|w| w[0].wait_time_ms <= w[1].wait_time_ms));

        let mut requests: Vec<usize> = report.results.iter().map(|r| r.request).collect();
        requests.sort_unstable();
        assert_eq!(requests, (1..=8).collect::<Vec<_>>());
    }

    #[test]
    fn test_hold_makes_later_attempts_wait() {
        let (harness, id) = harness(3, 20);
        let report = harness.run_trial(&id, 3).unwrap();
        assert_eq!(report.successful, 3);
        // The last holder queued behind two 20ms holds.
        let slowest = report.results.last().unwrap().wait_time_ms;
        assert!(slowest >= 35.0, "slowest wait was {}ms", slowest);
    }

    #[test]
    fn test_long_queue_outlasts_store_timeout() {
        // 60 holds of 5ms queue far longer than the 150ms store bound.
        let store = Arc::new(LedgerStore::in_memory(Duration::from_millis(150)));
        let id = ItemId::from("X");
        store.seed_item(&id, "Widget", 60).unwrap();
        let harness = TrialHarness::new(
            ReservationEngine::new(Arc::clone(&store)),
            Duration::from_millis(5),
            100,
        );

        let report = harness.run_trial(&id, 60).unwrap();
        assert_eq!(report.successful, 60);
        assert_eq!(report.failed, 0);
        assert_eq!(report.successful + report.prevented, report.total_requests);
        assert_eq!(report.final_count, 0);
        assert!(report.upholds_guarantee());
        assert_eq!(store.stats().lock_timeouts, 0);
    }

    #[test]
    fn test_lock_wait_scales_with_sellers() {
        let (harness, _) = harness(1, 10);
        let base = Duration::from_millis(50);
        assert_eq!(harness.lock_wait(base, 5, 3), Duration::from_millis(80));
        assert_eq!(harness.lock_wait(base, 2, 3), Duration::from_millis(70));
        assert_eq!(harness.lock_wait(base, 5, 0), base);
        assert_eq!(harness.lock_wait(Duration::MAX, 5, 3), Duration::MAX);
    }

    #[test]
    fn test_unknown_item_is_not_found() {
        let (harness, _) = harness(1, 0);
        let err = harness.run_trial(&ItemId::from("missing"), 3).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_size_bounds() {
        let (harness, id) = harness(1, 0);
        assert!(harness.run_trial(&id, 0).unwrap_err().is_validation());
        assert!(harness.run_trial(&id, 101).unwrap_err().is_validation());
        assert!(harness.run_trial(&id, 100).is_ok());
    }

    #[test]
    fn test_report_wire_names() {
        let (harness, id) = harness(1, 0);
        let report = harness.run_trial(&id, 2).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        for key in [
            "initialCount",
            "finalCount",
            "finalReserved",
            "totalRequests",
            "successful",
            "prevented",
            "results",
        ] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
        assert!(json["results"][0].get("waitTime").is_some());
    }
}
