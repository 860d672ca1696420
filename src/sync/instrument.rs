/*!
 * Lock Instrumentation
 *
 * The optional collaborators an instrumented lock carries (statistics sink,
 * clock, chaos signal target) plus the one predicate that decides whether a
 * given acquisition gets timed, and the RAII timer that records the sample.
 */

use crate::stats::{Histogram, StatsLevel, StatsSink};
use crate::sync::condvar::InstrumentedCondvar;
use crate::time::{Clock, SystemClock};
use std::sync::Arc;

/// Which logical wait a lock represents.
///
/// Decides whether acquisitions are timed and which histogram bucket
/// receives the samples. Chaos perturbation is likewise gated on
/// `BackgroundWork`: the perturbation deliberately targets the engine's
/// known-hot wait-for-background-work contention point rather than applying
/// to every lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitTag {
    /// The engine's wait-for-background-work lock; instrumented.
    BackgroundWork,
    /// Any other lock; never timed.
    General,
}

/// Optional, externally-owned collaborators of an instrumented lock.
///
/// Fixed at construction; the sink, clock, and signal target are read-shared
/// and must outlive the lock (they are held by `Arc`, so they do).
#[derive(Clone)]
pub struct Instrumentation {
    stats: Option<Arc<dyn StatsSink>>,
    clock: Option<Arc<dyn Clock>>,
    tag: WaitTag,
    bg_signal: Option<Arc<InstrumentedCondvar>>,
}

impl Instrumentation {
    /// Instrumentation that never times and never perturbs.
    pub fn disabled(tag: WaitTag) -> Self {
        Self {
            stats: None,
            clock: None,
            tag,
            bg_signal: None,
        }
    }

    pub fn new(
        stats: Option<Arc<dyn StatsSink>>,
        clock: Option<Arc<dyn Clock>>,
        tag: WaitTag,
    ) -> Self {
        Self {
            stats,
            clock,
            tag,
            bg_signal: None,
        }
    }

    /// Attach the condvar the chaos perturbation signals before yielding or
    /// sleeping. Only ever signaled by this layer, never locked.
    pub fn with_background_signal(mut self, signal: Arc<InstrumentedCondvar>) -> Self {
        self.bg_signal = Some(signal);
        self
    }

    pub fn tag(&self) -> WaitTag {
        self.tag
    }

    #[cfg(feature = "chaos")]
    pub(crate) fn bg_signal(&self) -> Option<&Arc<InstrumentedCondvar>> {
        self.bg_signal.as_ref()
    }

    /// The clock to use for deadline math: the configured one, or the
    /// process-wide default.
    pub(crate) fn clock_or_default(&self) -> Arc<dyn Clock> {
        match &self.clock {
            Some(clock) => Arc::clone(clock),
            None => SystemClock::default_instance().clone() as Arc<dyn Clock>,
        }
    }

    /// Should this acquisition be timed?
    ///
    /// Single predicate centralizing the nullable-collaborator checks: the
    /// lock must be the background-work wait, both sink and clock must be
    /// present, and the sink must be configured above the level that
    /// excludes mutex timing.
    fn timing_target(&self) -> Option<(Arc<dyn StatsSink>, Arc<dyn Clock>)> {
        if self.tag != WaitTag::BackgroundWork {
            return None;
        }
        match (&self.stats, &self.clock) {
            (Some(stats), Some(clock)) if stats.stats_level() > StatsLevel::ExceptTimeForMutex => {
                Some((Arc::clone(stats), Arc::clone(clock)))
            }
            _ => None,
        }
    }

    /// Start a latency measurement scoped to the caller, or `None` when
    /// this acquisition is not instrumented. The returned timer records the
    /// elapsed time on drop, so it finalizes on every exit path.
    pub(crate) fn start_timer(&self, histogram: Histogram) -> Option<LatencyTimer> {
        self.timing_target().map(|(stats, clock)| {
            let start_nanos = clock.now_nanos();
            LatencyTimer {
                stats,
                clock,
                histogram,
                start_nanos,
            }
        })
    }
}

/// Scoped latency measurement; drop records the elapsed nanoseconds.
pub(crate) struct LatencyTimer {
    stats: Arc<dyn StatsSink>,
    clock: Arc<dyn Clock>,
    histogram: Histogram,
    start_nanos: u64,
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        let elapsed = self.clock.now_nanos().saturating_sub(self.start_nanos);
        self.stats.record_latency_nanos(self.histogram, elapsed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::RecordingSink;

    fn instr(level: StatsLevel, tag: WaitTag) -> (Arc<RecordingSink>, Instrumentation) {
        let sink = Arc::new(RecordingSink::new(level));
        let instr = Instrumentation::new(
            Some(sink.clone()),
            Some(SystemClock::default_instance().clone() as Arc<dyn Clock>),
            tag,
        );
        (sink, instr)
    }

    #[test]
    fn test_timer_records_one_sample_on_drop() {
        let (sink, instr) = instr(StatsLevel::All, WaitTag::BackgroundWork);
        {
            let timer = instr.start_timer(Histogram::MutexLockWaitNanos);
            assert!(timer.is_some());
        }
        assert_eq!(sink.mutex_sample_count(), 1);
    }

    #[test]
    fn test_no_timer_at_or_below_exclusion_level() {
        let (sink, instr) = instr(StatsLevel::ExceptTimeForMutex, WaitTag::BackgroundWork);
        assert!(instr.start_timer(Histogram::MutexLockWaitNanos).is_none());
        assert_eq!(sink.mutex_sample_count(), 0);
    }

    #[test]
    fn test_no_timer_for_general_tag() {
        let (sink, instr) = instr(StatsLevel::All, WaitTag::General);
        assert!(instr.start_timer(Histogram::MutexLockWaitNanos).is_none());
        assert_eq!(sink.mutex_sample_count(), 0);
    }

    #[test]
    fn test_no_timer_without_sink_or_clock() {
        let instr = Instrumentation::disabled(WaitTag::BackgroundWork);
        assert!(instr.start_timer(Histogram::MutexLockWaitNanos).is_none());

        let sink = Arc::new(RecordingSink::new(StatsLevel::All));
        let no_clock = Instrumentation::new(Some(sink), None, WaitTag::BackgroundWork);
        assert!(no_clock.start_timer(Histogram::MutexLockWaitNanos).is_none());
    }
}
