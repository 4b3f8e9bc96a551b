// In-process counters for automation observability. Failures in this
// subsystem are never surfaced to end users, so logs plus these counters
// are the operator's only window into it.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters covering the life of an event: fired, matched, executed.
#[derive(Debug, Default)]
pub struct AutomationMetrics {
    events_fired: AtomicU64,
    lookup_failures: AtomicU64,
    workflows_matched: AtomicU64,
    actions_completed: AtomicU64,
    actions_failed: AtomicU64,
    actions_skipped: AtomicU64,
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub events_fired: u64,
    pub lookup_failures: u64,
    pub workflows_matched: u64,
    pub actions_completed: u64,
    pub actions_failed: u64,
    pub actions_skipped: u64,
}

impl AutomationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn event_fired(&self) {
        self.events_fired.fetch_add(1, Ordering::Relaxed);
    }

    pub fn lookup_failed(&self) {
        self.lookup_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn workflows_matched(&self, count: u64) {
        self.workflows_matched.fetch_add(count, Ordering::Relaxed);
    }

    pub fn action_completed(&self) {
        self.actions_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn action_failed(&self) {
        self.actions_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn action_skipped(&self) {
        self.actions_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            events_fired: self.events_fired.load(Ordering::Relaxed),
            lookup_failures: self.lookup_failures.load(Ordering::Relaxed),
            workflows_matched: self.workflows_matched.load(Ordering::Relaxed),
            actions_completed: self.actions_completed.load(Ordering::Relaxed),
            actions_failed: self.actions_failed.load(Ordering::Relaxed),
            actions_skipped: self.actions_skipped.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let metrics = AutomationMetrics::new();
        metrics.event_fired();
        metrics.workflows_matched(3);
        metrics.action_completed();
        metrics.action_failed();
        metrics.action_skipped();
        metrics.action_skipped();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.events_fired, 1);
        assert_eq!(snapshot.workflows_matched, 3);
        assert_eq!(snapshot.actions_completed, 1);
        assert_eq!(snapshot.actions_failed, 1);
        assert_eq!(snapshot.actions_skipped, 2);
        assert_eq!(snapshot.lookup_failures, 0);
    }
}
