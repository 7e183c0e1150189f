//! Core data model: one OHLCV observation per trading day

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day's open/high/low/close/volume observation.
///
/// Serialized as `{"date": "YYYY-MM-DD", "open": .., "high": .., "low": ..,
/// "close": .., "volume": ..}`, the wire format of `GET /api/stock-data`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "api", derive(utoipa::ToSchema))]
pub struct StockRecord {
    /// Trading day
    pub date: NaiveDate,
    /// Opening price
    pub open: f64,
    /// Highest price of the day
    pub high: f64,
    /// Lowest price of the day
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Shares traded
    pub volume: u64,
}

/// Whether a record closed up or down relative to a reference price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
}

impl StockRecord {
    /// Direction of this record's close versus the previous record's close.
    ///
    /// With no previous record the close is compared to this record's own open.
    /// An unchanged close counts as `Up`.
    pub fn direction_from(&self, previous: Option<&StockRecord>) -> Direction {
        let reference = previous.map_or(self.open, |p| p.close);
        if self.close >= reference {
            Direction::Up
        } else {
            Direction::Down
        }
    }

    /// High minus low
    pub fn day_range(&self) -> f64 {
        self.high - self.low
    }
}

/// Sort records ascending by date.
///
/// The sort is stable, so duplicate dates keep their relative order.
pub fn sort_by_date(records: &mut [StockRecord]) {
    records.sort_by_key(|r| r.date);
}
