/*!
 * Statistics Sink Contract
 *
 * The aggregation engine that consumes latency samples lives outside this
 * crate; the lock layer only needs to hand it one sample at a time and ask
 * how much detail it wants. Both are captured by the `StatsSink` trait.
 */

use crate::atomic::RelaxedCell;
use parking_lot::Mutex;

/// How much detail a statistics sink is configured to collect.
///
/// Totally ordered: each level includes everything below it. Mutex wait
/// timing is only recorded when the sink reports a level strictly above
/// [`StatsLevel::ExceptTimeForMutex`], so low-detail configurations never
/// pay the clock-read overhead on the lock path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StatsLevel {
    /// Counters only.
    ExceptHistogramOrTimers,
    /// Histograms, but no timers.
    ExceptTimers,
    /// Timers, except the expensive fine-grained ones.
    ExceptDetailedTimers,
    /// Everything except mutex wait timing.
    ExceptTimeForMutex,
    /// Everything, including mutex wait timing.
    All,
}

/// Histogram buckets this layer records into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Histogram {
    /// Nanoseconds spent blocked acquiring an instrumented mutex.
    MutexLockWaitNanos,
    /// Nanoseconds spent blocked in a condition-variable wait.
    CondWaitNanos,
}

impl Histogram {
    /// Stable metric name for external reporting.
    pub fn name(self) -> &'static str {
        match self {
            Histogram::MutexLockWaitNanos => "mutex.lock_wait_nanos",
            Histogram::CondWaitNanos => "condvar.wait_nanos",
        }
    }
}

/// Receiver for individual latency samples.
///
/// Externally owned and read-shared: implementations must be safe to call
/// from any thread and must outlive every lock referencing them (enforced
/// by `Arc` at the construction sites).
pub trait StatsSink: Send + Sync {
    /// Record one latency sample into the given histogram.
    fn record_latency_nanos(&self, histogram: Histogram, nanos: u64);

    /// The sink's configured detail level.
    fn stats_level(&self) -> StatsLevel;
}

/// In-memory sink that keeps every sample it receives.
///
/// Test and diagnostics support; the production sink lives in the
/// statistics engine, not here.
pub struct RecordingSink {
    level: StatsLevel,
    mutex_samples: RelaxedCell<u64>,
    cond_samples: RelaxedCell<u64>,
    samples: Mutex<Vec<(Histogram, u64)>>,
}

impl RecordingSink {
    pub fn new(level: StatsLevel) -> Self {
        Self {
            level,
            mutex_samples: RelaxedCell::default(),
            cond_samples: RelaxedCell::default(),
            samples: Mutex::new(Vec::new()),
        }
    }

    /// Number of samples recorded under [`Histogram::MutexLockWaitNanos`].
    pub fn mutex_sample_count(&self) -> u64 {
        self.mutex_samples.load()
    }

    /// Number of samples recorded under [`Histogram::CondWaitNanos`].
    pub fn cond_sample_count(&self) -> u64 {
        self.cond_samples.load()
    }

    /// Snapshot of every sample received so far, in arrival order.
    pub fn samples(&self) -> Vec<(Histogram, u64)> {
        self.samples.lock().clone()
    }
}

impl StatsSink for RecordingSink {
    fn record_latency_nanos(&self, histogram: Histogram, nanos: u64) {
        match histogram {
            Histogram::MutexLockWaitNanos => self.mutex_samples.fetch_add(1),
            Histogram::CondWaitNanos => self.cond_samples.fetch_add(1),
        };
        self.samples.lock().push((histogram, nanos));
    }

    fn stats_level(&self) -> StatsLevel {
        self.level
    }
}
