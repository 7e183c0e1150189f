//! Time-range filter: windowing the retained dataset by recency

use crate::errors::VisualizationError;
use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use stockchart::StockRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeRange {
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
    #[default]
    All,
}

impl TimeRange {
    pub const ALL_RANGES: [TimeRange; 5] = [
        TimeRange::OneMonth,
        TimeRange::ThreeMonths,
        TimeRange::SixMonths,
        TimeRange::OneYear,
        TimeRange::All,
    ];

    /// Window length in calendar months; `None` for `All`
    pub fn months(self) -> Option<u32> {
        match self {
            TimeRange::OneMonth => Some(1),
            TimeRange::ThreeMonths => Some(3),
            TimeRange::SixMonths => Some(6),
            TimeRange::OneYear => Some(12),
            TimeRange::All => None,
        }
    }

    /// Earliest date kept when the window ends at `today`
    pub fn cutoff(self, today: NaiveDate) -> Option<NaiveDate> {
        let months = self.months()?;
        Some(
            today
                .checked_sub_months(Months::new(months))
                .unwrap_or(NaiveDate::MIN),
        )
    }

    /// Index of the first record inside the window.
    ///
    /// `records` must be sorted ascending by date, so the window is always the
    /// suffix `records[start..]`.
    pub fn window_start(self, records: &[StockRecord], today: NaiveDate) -> usize {
        match self.cutoff(today) {
            Some(cutoff) => records.partition_point(|r| r.date < cutoff),
            None => 0,
        }
    }

    /// The records inside the window
    pub fn apply(self, records: &[StockRecord], today: NaiveDate) -> &[StockRecord] {
        &records[self.window_start(records, today)..]
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeRange::OneMonth => "1M",
            TimeRange::ThreeMonths => "3M",
            TimeRange::SixMonths => "6M",
            TimeRange::OneYear => "1Y",
            TimeRange::All => "ALL",
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimeRange {
    type Err = VisualizationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        TimeRange::ALL_RANGES
            .into_iter()
            .find(|range| range.label() == wanted)
            .ok_or_else(|| VisualizationError::ConfigError {
                message: format!("unknown time range {s:?}, expected one of 1M, 3M, 6M, 1Y, ALL"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    fn daily(start: NaiveDate, days: u64) -> Vec<StockRecord> {
        (0..days)
            .map(|i| StockRecord {
                date: start.checked_add_days(Days::new(i)).unwrap(),
                open: 100.0,
                high: 101.0,
                low: 99.0,
                close: 100.0,
                volume: 10,
            })
            .collect()
    }

    #[test]
    fn test_one_month_on_two_years() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let records = daily(NaiveDate::from_ymd_opt(2022, 6, 16).unwrap(), 731);
        assert_eq!(records.last().unwrap().date, today);

        let cutoff = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
        let visible = TimeRange::OneMonth.apply(&records, today);
        assert!(visible.iter().all(|r| r.date >= cutoff));
        assert_eq!(visible.first().unwrap().date, cutoff);
        assert_eq!(visible.len(), 32);
    }

    #[test]
    fn test_all_keeps_everything() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let records = daily(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(), 100);
        assert_eq!(TimeRange::All.apply(&records, today).len(), 100);
    }

    #[test]
    fn test_stale_dataset_filters_to_empty() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let records = daily(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(), 100);
        assert!(TimeRange::OneYear.apply(&records, today).is_empty());
    }

    #[test]
    fn test_month_end_cutoff_clamps() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        assert_eq!(
            TimeRange::OneMonth.cutoff(today),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
    }

    #[test]
    fn test_parse_labels() {
        for range in TimeRange::ALL_RANGES {
            assert_eq!(range.label().parse::<TimeRange>().unwrap(), range);
        }
        assert_eq!("1y".parse::<TimeRange>().unwrap(), TimeRange::OneYear);
        assert!("2W".parse::<TimeRange>().is_err());
    }
}
