//! Runtime metrics for planning requests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Kind of request being tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    /// Curriculum planned and persisted
    Planned,
    /// Plan request where the learner already met every target
    UpToDate,
    /// Pairwise gap or scaffold query
    TreeQuery,
    /// Curriculum generated from a skill tree
    Generated,
    /// Request that returned an error
    Failed,
}

const KINDS: usize = 5;

/// Request counters shared by every clone.
#[derive(Clone, Debug, Default)]
pub struct RuntimeMetrics {
    inner: Arc<MetricsInner>,
}

#[derive(Debug, Default)]
struct MetricsInner {
    counts: [AtomicU64; KINDS],
    total_time_ns: AtomicU64,
}

impl RuntimeMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, kind: MetricKind) {
        self.inner.counts[kind as usize].fetch_add(1, Ordering::Relaxed);
    }

    /// Records a request and the time it took.
    pub fn record_timing(&self, kind: MetricKind, duration: Duration) {
        self.record(kind);
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        // Saturates instead of wrapping on overflow.
        let _ = self
            .inner
            .total_time_ns
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |total| {
                Some(total.saturating_add(nanos))
            });
    }

    pub fn count(&self, kind: MetricKind) -> u64 {
        self.inner.counts[kind as usize].load(Ordering::Relaxed)
    }

    pub fn total_time(&self) -> Duration {
        Duration::from_nanos(self.inner.total_time_ns.load(Ordering::Relaxed))
    }

    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            planned: self.count(MetricKind::Planned),
            up_to_date: self.count(MetricKind::UpToDate),
            tree_queries: self.count(MetricKind::TreeQuery),
            generated: self.count(MetricKind::Generated),
            failed: self.count(MetricKind::Failed),
            total_time: self.total_time(),
        }
    }

    pub fn reset(&self) {
        for count in &self.inner.counts {
            count.store(0, Ordering::Relaxed);
        }
        self.inner.total_time_ns.store(0, Ordering::Relaxed);
    }
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSummary {
    pub planned: u64,
    pub up_to_date: u64,
    pub tree_queries: u64,
    pub generated: u64,
    pub failed: u64,
    /// Total time spent in tracked requests
    pub total_time: Duration,
}
