//! Scales mapping data values onto panel pixel coordinates

use chrono::{Datelike, Days, Months, NaiveDate};
use stockchart::StockRecord;

/// Fractional padding applied below the lowest low and above the highest high
pub const PRICE_PADDING: f64 = 0.05;

/// Continuous linear mapping from a domain onto a pixel range.
///
/// A degenerate domain (both ends equal) maps every input to the middle of the
/// range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Same domain over a new pixel range
    pub fn with_range(&self, range: (f64, f64)) -> Self {
        Self { range, ..*self }
    }

    pub fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let t = if d1 != d0 { (value - d0) / (d1 - d0) } else { 0.5 };
        lerp(self.range, t)
    }

    pub fn invert(&self, pixel: f64) -> f64 {
        let (r0, r1) = self.range;
        let t = if r1 != r0 { (pixel - r0) / (r1 - r0) } else { 0.5 };
        lerp(self.domain, t)
    }

    /// Round-valued ticks covering the domain, roughly `count` of them
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (d0, d1) = self.domain;
        if d0 == d1 {
            return vec![d0];
        }
        let (lo, hi) = (d0.min(d1), d0.max(d1));
        let step = tick_step(lo, hi, count);
        if !step.is_finite() || step <= 0.0 {
            return Vec::new();
        }

        let first = (lo / step).ceil() as i64;
        let last = (hi / step).floor() as i64;
        if step < 1.0 {
            // Divide by the inverse to keep values like 0.3 exact
            let inverse = (1.0 / step).round();
            (first..=last).map(|i| i as f64 / inverse).collect()
        } else {
            (first..=last).map(|i| i as f64 * step).collect()
        }
    }
}

fn lerp((a, b): (f64, f64), t: f64) -> f64 {
    a * (1.0 - t) + b * t
}

/// Tick spacing of 1, 2 or 5 times a power of ten giving about `count` ticks
pub fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    let raw = (stop - start).abs() / count.max(1) as f64;
    let mut step = 10f64.powf(raw.log10().floor());
    let error = raw / step;
    if error >= 50f64.sqrt() {
        step *= 10.0;
    } else if error >= 10f64.sqrt() {
        step *= 5.0;
    } else if error >= 2f64.sqrt() {
        step *= 2.0;
    }
    step
}

/// Linear scale over calendar days
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    inner: LinearScale,
}

fn day_number(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

impl TimeScale {
    pub fn new(domain: (NaiveDate, NaiveDate), range: (f64, f64)) -> Self {
        Self {
            inner: LinearScale::new((day_number(domain.0), day_number(domain.1)), range),
        }
    }

    pub fn range(&self) -> (f64, f64) {
        self.inner.range()
    }

    pub fn with_range(&self, range: (f64, f64)) -> Self {
        Self {
            inner: self.inner.with_range(range),
        }
    }

    /// Domain bounds as fractional day numbers (days from CE)
    pub fn day_domain(&self) -> (f64, f64) {
        self.inner.domain()
    }

    pub fn apply(&self, date: NaiveDate) -> f64 {
        self.inner.apply(day_number(date))
    }

    /// Fractional day number under `pixel`
    pub fn invert(&self, pixel: f64) -> f64 {
        self.inner.invert(pixel)
    }

    /// Scale whose domain is the inverse image of the range under `(k, tx)`.
    ///
    /// Used for zoom: the rescaled domain is what the current viewport shows.
    pub fn rescaled(&self, k: f64, tx: f64) -> Self {
        let (r0, r1) = self.range();
        let d0 = self.invert((r0 - tx) / k);
        let d1 = self.invert((r1 - tx) / k);
        Self {
            inner: LinearScale::new((d0, d1), (r0, r1)),
        }
    }

    /// Calendar-aligned ticks with labels, roughly `count` of them
    pub fn ticks(&self, count: usize) -> Vec<(NaiveDate, String)> {
        let (d0, d1) = self.day_domain();
        let (lo, hi) = (d0.min(d1), d0.max(d1));
        let (Some(start), Some(end)) = (from_day_number(lo.ceil()), from_day_number(hi.floor()))
        else {
            return Vec::new();
        };
        if start > end {
            return Vec::new();
        }
        if start == end {
            return vec![(start, start.format("%b %d").to_string())];
        }

        let target = (hi - lo) / count.max(1) as f64;
        let interval = TickInterval::for_span(target);
        interval
            .dates(start, end)
            .into_iter()
            .map(|date| (date, interval.label(date)))
            .collect()
    }
}

fn from_day_number(day: f64) -> Option<NaiveDate> {
    if !day.is_finite() || day.abs() > i32::MAX as f64 {
        return None;
    }
    NaiveDate::from_num_days_from_ce_opt(day as i32)
}

/// Calendar interval between time-axis ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TickInterval {
    Days(u64),
    Weeks(u64),
    Months(u32),
    Years(i32),
}

impl TickInterval {
    const LADDER: [(f64, TickInterval); 11] = [
        (1.0, TickInterval::Days(1)),
        (2.0, TickInterval::Days(2)),
        (7.0, TickInterval::Weeks(1)),
        (14.0, TickInterval::Weeks(2)),
        (30.0, TickInterval::Months(1)),
        (91.0, TickInterval::Months(3)),
        (182.0, TickInterval::Months(6)),
        (365.0, TickInterval::Years(1)),
        (730.0, TickInterval::Years(2)),
        (1826.0, TickInterval::Years(5)),
        (3652.0, TickInterval::Years(10)),
    ];

    fn for_span(days_per_tick: f64) -> Self {
        Self::LADDER
            .iter()
            .find(|(days, _)| *days >= days_per_tick)
            .map_or(TickInterval::Years(10), |(_, interval)| *interval)
    }

    fn dates(self, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        let mut out = Vec::new();
        let mut next = match self {
            TickInterval::Days(_) => Some(start),
            // Weeks start on Sunday
            TickInterval::Weeks(_) => match start.weekday().num_days_from_sunday() {
                0 => Some(start),
                offset => start.checked_add_days(Days::new(7 - offset as u64)),
            },
            TickInterval::Months(n) => {
                let mut first = NaiveDate::from_ymd_opt(start.year(), start.month(), 1);
                while let Some(date) = first {
                    if date >= start && date.month0() % n == 0 {
                        break;
                    }
                    first = date.checked_add_months(Months::new(1));
                }
                first
            }
            TickInterval::Years(n) => {
                let mut year = start.year();
                if NaiveDate::from_ymd_opt(year, 1, 1).is_some_and(|d| d < start) {
                    year += 1;
                }
                while year.rem_euclid(n) != 0 {
                    year += 1;
                }
                NaiveDate::from_ymd_opt(year, 1, 1)
            }
        };

        while let Some(date) = next {
            if date > end {
                break;
            }
            out.push(date);
            next = match self {
                TickInterval::Days(n) => date.checked_add_days(Days::new(n)),
                TickInterval::Weeks(n) => date.checked_add_days(Days::new(7 * n)),
                TickInterval::Months(n) => date.checked_add_months(Months::new(n)),
                TickInterval::Years(n) => NaiveDate::from_ymd_opt(date.year() + n, 1, 1),
            };
        }
        out
    }

    fn label(self, date: NaiveDate) -> String {
        match self {
            TickInterval::Days(_) | TickInterval::Weeks(_) => date.format("%b %d").to_string(),
            TickInterval::Months(_) if date.month() == 1 => date.format("%Y").to_string(),
            TickInterval::Months(_) => date.format("%b").to_string(),
            TickInterval::Years(_) => date.format("%Y").to_string(),
        }
    }
}

/// Input ranges of the three axes, derived from the visible records
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domains {
    pub time: (NaiveDate, NaiveDate),
    /// `[min(low) * 0.95, max(high) * 1.05]`
    pub price: (f64, f64),
    /// `[0, max(volume)]`, or `[0, 1]` when every volume is zero
    pub volume: (f64, f64),
}

impl Domains {
    /// `None` for an empty slice. Records must be sorted by date.
    pub fn from_records(records: &[StockRecord]) -> Option<Self> {
        let first = records.first()?;
        let last = records.last()?;

        let low = records.iter().map(|r| r.low).fold(f64::INFINITY, f64::min);
        let high = records.iter().map(|r| r.high).fold(f64::NEG_INFINITY, f64::max);
        let max_volume = records.iter().map(|r| r.volume).max().unwrap_or(0);

        Some(Self {
            time: (first.date, last.date),
            price: (low * (1.0 - PRICE_PADDING), high * (1.0 + PRICE_PADDING)),
            volume: (0.0, if max_volume == 0 { 1.0 } else { max_volume as f64 }),
        })
    }
}
