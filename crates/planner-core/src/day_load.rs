//! Per-day session counts for one scheduling run.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::scheduler::ScheduleError;

/// Counts sessions placed per calendar day during a run.
///
/// Each run owns a fresh tracker; it is never shared or persisted.
#[derive(Debug, Clone, Default)]
pub struct DayLoadTracker {
    loads: HashMap<NaiveDate, u32>,
}

impl DayLoadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sessions already placed on `day`.
    pub fn load(&self, day: NaiveDate) -> u32 {
        self.loads.get(&day).copied().unwrap_or(0)
    }

    /// The candidate with the fewest sessions; ties go to the earliest date.
    pub fn least_loaded_day(&self, candidates: &[NaiveDate]) -> Result<NaiveDate, ScheduleError> {
        candidates
            .iter()
            .copied()
            .min_by_key(|day| (self.load(*day), *day))
            .ok_or(ScheduleError::NoCandidateDays)
    }

    /// Records a committed session on `day`.
    pub fn increment(&mut self, day: NaiveDate) {
        *self.loads.entry(day).or_insert(0) += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[test]
    fn empty_candidates_fail() {
        let tracker = DayLoadTracker::new();
        assert_eq!(
            tracker.least_loaded_day(&[]),
            Err(ScheduleError::NoCandidateDays)
        );
    }

    #[test]
    fn ties_go_to_earliest_date() {
        let tracker = DayLoadTracker::new();
        assert_eq!(tracker.least_loaded_day(&[day(5), day(3), day(4)]), Ok(day(3)));
    }

    #[test]
    fn prefers_least_loaded() {
        let mut tracker = DayLoadTracker::new();
        tracker.increment(day(3));
        tracker.increment(day(3));
        tracker.increment(day(4));

        assert_eq!(tracker.load(day(3)), 2);
        assert_eq!(tracker.load(day(4)), 1);
        assert_eq!(tracker.load(day(5)), 0);
        assert_eq!(tracker.least_loaded_day(&[day(3), day(4), day(5)]), Ok(day(5)));
        assert_eq!(tracker.least_loaded_day(&[day(3), day(4)]), Ok(day(4)));
    }
}
