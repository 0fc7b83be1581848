//! Shared atomics for distributing search counters across solver workers.
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Hands out counters in `[start, end)`, each at most once.
#[derive(Debug)]
pub struct CounterSource {
    next: AtomicU64,
    end: u64,
}

impl CounterSource {
    pub const fn new(start: u64, end: u64) -> Self {
        Self {
            next: AtomicU64::new(start),
            end,
        }
    }

    /// Reserve the next counter, or `None` once the range is used up.
    #[inline]
    pub fn fetch(&self) -> Option<u64> {
        // `next` never moves past `end`, so the increment cannot wrap.
        self.next
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| {
                (n < self.end).then(|| n + 1)
            })
            .ok()
    }

    /// Whether every counter in the range has been handed out.
    pub fn is_exhausted(&self) -> bool {
        self.next.load(Ordering::Relaxed) >= self.end
    }
}

#[derive(Debug)]
pub struct StopFlag {
    stop: AtomicBool,
}

impl StopFlag {
    pub const fn new() -> Self {
        Self {
            stop: AtomicBool::new(false),
        }
    }

    #[inline]
    pub fn should_stop(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    pub fn force_stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }
}

impl Default for StopFlag {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_source_increments_until_end() {
        let source = CounterSource::new(5, 7);
        assert_eq!(source.fetch(), Some(5));
        assert_eq!(source.fetch(), Some(6));
        assert_eq!(source.fetch(), None);
        assert_eq!(source.fetch(), None);
        assert!(source.is_exhausted());
    }

    #[test]
    fn counter_source_does_not_wrap_at_max() {
        let source = CounterSource::new(u64::MAX, u64::MAX);
        assert!(source.is_exhausted());
        assert_eq!(source.fetch(), None);
        assert_eq!(source.fetch(), None);

        let source = CounterSource::new(u64::MAX - 1, u64::MAX);
        assert!(!source.is_exhausted());
        assert_eq!(source.fetch(), Some(u64::MAX - 1));
        assert_eq!(source.fetch(), None);
        assert_eq!(source.fetch(), None);
    }

    #[test]
    fn stop_flag_latches() {
        let flag = StopFlag::default();
        assert!(!flag.should_stop());
        flag.force_stop();
        assert!(flag.should_stop());
    }
}
