//! Values captured from chain state together with when they were seen.

use std::time::{SystemTime, UNIX_EPOCH};

use tracing::trace;

/// A value stamped with the wall-clock time (ms) and slot of its capture.
///
/// A zero timestamp or zero slot marks a value that was never populated;
/// such a value is never fresh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FreshValue<T> {
    value: T,
    timestamp_ms: u64,
    slot: u64,
}

impl<T> FreshValue<T> {
    pub fn new(value: T, timestamp_ms: u64, slot: u64) -> Self {
        Self {
            value,
            timestamp_ms,
            slot,
        }
    }

    pub fn unpopulated(value: T) -> Self {
        Self::new(value, 0, 0)
    }

    pub fn is_populated(&self) -> bool {
        self.timestamp_ms != 0 && self.slot != 0
    }

    /// The value if it was captured within `tolerance_ms` of `now_ms`.
    ///
    /// A capture stamped after `now_ms` counts as age zero.
    pub fn get_fresh_value(&self, tolerance_ms: u64, now_ms: u64) -> Option<&T> {
        if !self.is_populated() {
            return None;
        }
        let age = now_ms.saturating_sub(self.timestamp_ms);
        if age > tolerance_ms {
            trace!(age_ms = age, tolerance_ms, slot = self.slot, "stale value");
            return None;
        }
        Some(&self.value)
    }

    /// [`get_fresh_value`](Self::get_fresh_value) against the system clock.
    pub fn get_fresh_value_now(&self, tolerance_ms: u64) -> Option<&T> {
        self.get_fresh_value(tolerance_ms, now_ms())
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub fn timestamp_ms(&self) -> u64 {
        self.timestamp_ms
    }

    pub fn slot(&self) -> u64 {
        self.slot
    }

    /// Transforms the value, keeping the capture stamp.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FreshValue<U> {
        FreshValue {
            value: f(self.value),
            timestamp_ms: self.timestamp_ms,
            slot: self.slot,
        }
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn freshness_boundary_is_inclusive() {
        let v = FreshValue::new(7u64, 1_000, 42);
        assert_eq!(v.get_fresh_value(100, 1_100), Some(&7));
        assert_eq!(v.get_fresh_value(100, 1_101), None);
        assert_eq!(v.get_fresh_value(0, 1_000), Some(&7));
    }

    #[test]
    fn zero_sentinels_are_never_fresh() {
        assert_eq!(FreshValue::new(1u8, 0, 42).get_fresh_value(u64::MAX, 0), None);
        assert_eq!(FreshValue::new(1u8, 1_000, 0).get_fresh_value(u64::MAX, 1_000), None);
        assert!(!FreshValue::unpopulated(1u8).is_populated());
    }

    #[test]
    fn future_capture_is_fresh() {
        let v = FreshValue::new("px", 5_000, 1);
        assert_eq!(v.get_fresh_value(10, 4_000), Some(&"px"));
    }

    #[test]
    fn map_keeps_stamp() {
        let v = FreshValue::new(3u32, 9, 10).map(|x| x * 2);
        assert_eq!((*v.value(), v.timestamp_ms(), v.slot()), (6, 9, 10));
    }

    #[test]
    fn system_clock_freshness() {
        let v = FreshValue::new((), now_ms(), 1);
        assert!(v.get_fresh_value_now(60_000).is_some());
        let old = FreshValue::new((), 1, 1);
        assert!(old.get_fresh_value_now(1_000).is_none());
    }
}
