//! Retained chart dataset

use std::sync::Arc;
use stockchart::{types::sort_by_date, Direction, StockRecord};

/// Records held for the lifetime of a chart, sorted ascending by date.
///
/// Replaced wholesale on every fetch and never mutated in place; clones share
/// the same allocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartData {
    records: Arc<[StockRecord]>,
}

impl ChartData {
    /// Sort `records` by date and freeze them
    pub fn from_records(mut records: Vec<StockRecord>) -> Self {
        sort_by_date(&mut records);
        Self {
            records: records.into(),
        }
    }

    pub fn records(&self) -> &[StockRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records from `start` to the end
    pub fn window(&self, start: usize) -> &[StockRecord] {
        self.records.get(start..).unwrap_or(&[])
    }

    /// Close direction of record `index` versus the record before it
    pub fn direction_at(&self, index: usize) -> Direction {
        let previous = index.checked_sub(1).and_then(|i| self.records.get(i));
        self.records
            .get(index)
            .map_or(Direction::Up, |r| r.direction_from(previous))
    }
}
