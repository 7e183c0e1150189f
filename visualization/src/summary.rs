//! Summary panel: latest price, change, volume and day range

use crate::format;
use serde::Serialize;
use stockchart::StockRecord;

/// Sign of the latest change, used to pick the display color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Sign {
    Positive,
    Negative,
}

/// Figures shown next to the chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub latest_close: f64,
    /// Latest close minus the prior close
    pub change: f64,
    /// `change` as a percentage of the prior close
    pub percent_change: f64,
    pub sign: Sign,
    pub volume: u64,
    pub day_low: f64,
    pub day_high: f64,
    /// Latest day's high minus low
    pub day_spread: f64,
}

impl Summary {
    /// `None` with fewer than two records. Records must be sorted by date.
    pub fn from_records(records: &[StockRecord]) -> Option<Self> {
        let [.., previous, latest] = records else {
            return None;
        };

        let change = latest.close - previous.close;
        Some(Self {
            latest_close: latest.close,
            change,
            percent_change: change / previous.close * 100.0,
            sign: if change >= 0.0 { Sign::Positive } else { Sign::Negative },
            volume: latest.volume,
            day_low: latest.low,
            day_high: latest.high,
            day_spread: latest.day_range(),
        })
    }

    /// `$1,234.56`
    pub fn price_text(&self) -> String {
        format::currency(self.latest_close)
    }

    /// `+$5.00 (+5.00%)`
    pub fn change_text(&self) -> String {
        format!(
            "{} ({})",
            format::signed_currency(self.change),
            self.percent_text()
        )
    }

    /// `+5.00%`
    pub fn percent_text(&self) -> String {
        format::signed_percent(self.percent_change)
    }

    /// `104,654,200`
    pub fn volume_text(&self) -> String {
        format::thousands(self.volume)
    }

    /// `$95.00 - $110.00`
    pub fn range_text(&self) -> String {
        format!(
            "{} - {}",
            format::currency(self.day_low),
            format::currency(self.day_high)
        )
    }

    /// Label/value rows in display order
    pub fn rows(&self) -> [(&'static str, String); 4] {
        [
            ("Current Price", self.price_text()),
            ("Change", self.change_text()),
            ("Volume", self.volume_text()),
            ("Day Range", self.range_text()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(day: u32, close: f64) -> StockRecord {
        StockRecord {
            date: NaiveDate::from_ymd_opt(2024, 2, day).unwrap(),
            open: close,
            high: close + 5.0,
            low: close - 5.0,
            close,
            volume: 1_234_567,
        }
    }

    #[test]
    fn test_five_percent_rise() {
        let summary = Summary::from_records(&[record(1, 100.0), record(2, 105.0)]).unwrap();
        assert_eq!(summary.percent_text(), "+5.00%");
        assert_eq!(summary.sign, Sign::Positive);
        assert_eq!(summary.change_text(), "+$5.00 (+5.00%)");
        assert_eq!(summary.price_text(), "$105.00");
        assert_eq!(summary.volume_text(), "1,234,567");
        assert_eq!(summary.range_text(), "$100.00 - $110.00");
        assert_eq!(summary.day_spread, 10.0);
    }

    #[test]
    fn test_fall_is_negative() {
        let summary = Summary::from_records(&[record(1, 100.0), record(2, 90.0)]).unwrap();
        assert_eq!(summary.sign, Sign::Negative);
        assert_eq!(summary.percent_text(), "-10.00%");
    }

    #[test]
    fn test_uses_last_two_records() {
        let summary =
            Summary::from_records(&[record(1, 50.0), record(2, 200.0), record(3, 210.0)]).unwrap();
        assert_eq!(summary.change, 10.0);
        assert_eq!(summary.percent_text(), "+5.00%");
    }

    #[test]
    fn test_undefined_below_two_records() {
        assert!(Summary::from_records(&[]).is_none());
        assert!(Summary::from_records(&[record(1, 100.0)]).is_none());
    }
}
