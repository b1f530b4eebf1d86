/// Tracks transferred bytes and turns them into percentages that are
/// monotonically non-decreasing and bounded in [0, 100]. When the total is
/// unknown no percentage is ever produced.
#[derive(Debug)]
pub struct ProgressCounter {
    total_bytes: Option<u64>,
    transferred: u64,
    last_percent: Option<u8>,
}

impl ProgressCounter {
    pub fn new(total_bytes: Option<u64>) -> Self {
        ProgressCounter {
            total_bytes,
            transferred: 0,
            last_percent: None,
        }
    }

    /// Returns the new percentage when recording these bytes moved it
    /// forward, `None` otherwise.
    pub fn record(&mut self, bytes: u64) -> Option<u8> {
        self.transferred = self.transferred.saturating_add(bytes);
        let total = self.total_bytes?;
        let percent = if total == 0 {
            100
        } else {
            (self.transferred.min(total) * 100 / total) as u8
        };
        match self.last_percent {
            Some(last) if percent <= last => None,
            _ => {
                self.last_percent = Some(percent);
                Some(percent)
            }
        }
    }

    /// Marks the transfer complete. Returns 100 unless it was already
    /// reported (or the total was unknown).
    pub fn finish(&mut self) -> Option<u8> {
        self.total_bytes?;
        match self.last_percent {
            Some(100) => None,
            _ => {
                self.last_percent = Some(100);
                Some(100)
            }
        }
    }
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use super::ProgressCounter;

    #[test]
    fn reports_progress_in_order() {
        let mut counter = ProgressCounter::new(Some(200));
        assert_eq!(counter.record(100), Some(50));
        assert_eq!(counter.record(0), None);
        assert_eq!(counter.record(100), Some(100));
        assert_eq!(counter.finish(), None);
    }

    #[test]
    fn unknown_total_reports_nothing() {
        let mut counter = ProgressCounter::new(None);
        assert_eq!(counter.record(1024), None);
        assert_eq!(counter.finish(), None);
    }

    #[test]
    fn overshoot_is_capped_at_100() {
        let mut counter = ProgressCounter::new(Some(10));
        assert_eq!(counter.record(25), Some(100));
        assert_eq!(counter.record(25), None);
    }

    #[test]
    fn empty_file_finishes_immediately() {
        let mut counter = ProgressCounter::new(Some(0));
        assert_eq!(counter.record(0), Some(100));
    }

    proptest! {
        #[test]
        fn reported_values_are_increasing_and_bounded(
            total in 1u64..1_000_000,
            chunks in prop::collection::vec(0u64..100_000, 0..50),
        ) {
            let mut counter = ProgressCounter::new(Some(total));
            let mut reported = Vec::new();
            for chunk in chunks {
                if let Some(percent) = counter.record(chunk) {
                    reported.push(percent);
                }
            }
            if let Some(percent) = counter.finish() {
                reported.push(percent);
            }
            prop_assert!(reported.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(reported.iter().all(|p| *p <= 100));
            prop_assert_eq!(reported.last().copied(), Some(100));
        }
    }
}
