use crate::format::{format_log_entry, format_optional};
use crate::util::{mean, minimum};

/// Best and average over every completed solve.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Stats {
    pub best: Option<f64>,
    pub average: Option<f64>,
}

impl Stats {
    pub fn best_text(&self) -> String {
        format_optional(self.best)
    }

    pub fn average_text(&self) -> String {
        format_optional(self.average)
    }
}

/// Append-only record of completed solves in chronological order.
///
/// Nothing hands out mutable access to the stored durations, so entries are
/// never edited, removed or reordered once recorded.
#[derive(Debug, Clone, Default)]
pub struct History {
    durations: Vec<f64>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_completed_duration(&mut self, elapsed: f64) -> Stats {
        self.durations.push(elapsed);
        self.stats()
    }

    pub fn best(&self) -> Option<f64> {
        minimum(&self.durations)
    }

    pub fn average(&self) -> Option<f64> {
        mean(&self.durations)
    }

    pub fn stats(&self) -> Stats {
        Stats {
            best: self.best(),
            average: self.average(),
        }
    }

    pub fn durations(&self) -> &[f64] {
        &self.durations
    }

    pub fn last(&self) -> Option<f64> {
        self.durations.last().copied()
    }

    pub fn len(&self) -> usize {
        self.durations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }

    /// Log lines, most recent solve first.
    pub fn log_entries(&self) -> Vec<String> {
        self.durations
            .iter()
            .enumerate()
            .rev()
            .map(|(idx, &ms)| format_log_entry(idx + 1, ms))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::PLACEHOLDER;

    #[test]
    fn test_empty_history_has_no_stats() {
        let history = History::new();

        assert!(history.is_empty());
        assert_eq!(history.best(), None);
        assert_eq!(history.average(), None);
        assert_eq!(history.stats().best_text(), PLACEHOLDER);
        assert_eq!(history.stats().average_text(), PLACEHOLDER);
        assert!(history.log_entries().is_empty());
    }

    #[test]
    fn test_record_returns_updated_stats() {
        let mut history = History::new();

        let stats = history.record_completed_duration(12345.0);
        assert_eq!(stats.best, Some(12345.0));
        assert_eq!(stats.average, Some(12345.0));

        let stats = history.record_completed_duration(10000.0);
        assert_eq!(stats.best, Some(10000.0));
        assert_eq!(stats.average, Some(11172.5));
    }

    #[test]
    fn test_scenario_summary_and_log() {
        let mut history = History::new();
        for ms in [12345.0, 10000.0, 15500.0] {
            history.record_completed_duration(ms);
        }

        let stats = history.stats();
        assert_eq!(stats.best_text(), "0:10.00");
        assert_eq!(stats.average_text(), "0:12.61");
        assert_eq!(
            history.log_entries(),
            vec!["3. 0:15.50", "2. 0:10.00", "1. 0:12.34"]
        );
    }

    #[test]
    fn test_zero_duration_is_still_data() {
        let mut history = History::new();
        history.record_completed_duration(0.0);

        assert_eq!(history.best(), Some(0.0));
        assert_eq!(history.stats().best_text(), "0:00.00");
    }

    #[test]
    fn test_order_is_preserved() {
        let mut history = History::new();
        for ms in [3.0, 1.0, 2.0] {
            history.record_completed_duration(ms);
        }

        assert_eq!(history.durations(), &[3.0, 1.0, 2.0]);
        assert_eq!(history.last(), Some(2.0));
        assert_eq!(history.len(), 3);
    }
}
