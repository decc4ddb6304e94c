//! Time-bucketed trend series over the campaign-launch day key.
//!
//! All four metric series (campaign count, order count, revenue, profit)
//! share the campaign's launch day as their time key. Long ranges are
//! downsampled into fixed-size day buckets; the representative date of a
//! bucket is the last calendar day observed in it, which is how the chart
//! x-axis is expected to read.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::accounting::round_money;
use crate::errors::DomainError;

/// Inclusive calendar-day range. An absent window always means "all time",
/// never an implicit default range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DomainError> {
        if start > end {
            return Err(DomainError::InvalidDateWindow { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub value: Decimal,
}

/// A downsampled point. For raw daily series each day is its own bucket,
/// so `bucket_start == bucket_end == date`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketPoint {
    pub date: NaiveDate,
    pub value: Decimal,
    pub bucket_start: NaiveDate,
    pub bucket_end: NaiveDate,
}

/// The four launch-day-keyed value maps produced by the accumulator.
#[derive(Clone, Debug, Default)]
pub struct TrendSources {
    pub campaigns: BTreeMap<NaiveDate, Decimal>,
    pub orders: BTreeMap<NaiveDate, Decimal>,
    pub revenue: BTreeMap<NaiveDate, Decimal>,
    pub profit: BTreeMap<NaiveDate, Decimal>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MetricTrend {
    /// Daily-resolution series per the selection rule: raw daily when the
    /// caller gave an explicit window, downsampled buckets on all-time
    /// queries to bound response size.
    pub series: Vec<BucketPoint>,
    /// Running sum, always derived from the downsampled series.
    pub cumulative: Vec<TrendPoint>,
    /// Calendar-month roll-up of the un-bucketed daily series, zero-filled
    /// between the earliest and latest observed month, keyed by the first
    /// day of each month.
    pub monthly: Vec<TrendPoint>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TrendReport {
    /// Effective window: the explicit one, or the inferred [min, max] day
    /// across all four sources. None when there was no data and no window.
    pub window: Option<DateWindow>,
    pub bucket_days: u32,
    pub campaigns: MetricTrend,
    pub orders: MetricTrend,
    pub revenue: MetricTrend,
    pub profit: MetricTrend,
}

/// Bucket size in days for a window of `span_days` calendar days.
pub fn bucket_days_for_span(span_days: i64) -> u32 {
    match span_days {
        i64::MIN..=90 => 1,
        91..=180 => 3,
        181..=365 => 7,
        366..=730 => 14,
        _ => 30,
    }
}

pub fn build_trend(sources: &TrendSources, window: Option<DateWindow>) -> TrendReport {
    let explicit = window.is_some();
    let effective = window.or_else(|| infer_window(sources));

    let Some(effective) = effective else {
        return TrendReport {
            window: None,
            bucket_days: 1,
            campaigns: MetricTrend::empty(),
            orders: MetricTrend::empty(),
            revenue: MetricTrend::empty(),
            profit: MetricTrend::empty(),
        };
    };

    let bucket_days = bucket_days_for_span(effective.span_days());
    let build = |map: &BTreeMap<NaiveDate, Decimal>| {
        let daily = fill_daily(map, effective);
        let bucketed = bucket_series(&daily, bucket_days);
        let cumulative = cumulative_series(&bucketed);
        let monthly = monthly_rollup(&daily);
        let series = if explicit { bucket_series(&daily, 1) } else { bucketed };
        MetricTrend { series, cumulative, monthly }
    };

    TrendReport {
        window: Some(effective),
        bucket_days,
        campaigns: build(&sources.campaigns),
        orders: build(&sources.orders),
        revenue: build(&sources.revenue),
        profit: build(&sources.profit),
    }
}

impl MetricTrend {
    fn empty() -> Self {
        Self { series: Vec::new(), cumulative: Vec::new(), monthly: Vec::new() }
    }
}

fn infer_window(sources: &TrendSources) -> Option<DateWindow> {
    let maps =
        [&sources.campaigns, &sources.orders, &sources.revenue, &sources.profit];

    let start = maps.iter().filter_map(|map| map.keys().next()).min().copied()?;
    let end = maps.iter().filter_map(|map| map.keys().next_back()).max().copied()?;
    Some(DateWindow { start, end })
}

/// One point per calendar day across the whole window, zero where no data
/// exists, spanning exactly the requested range.
fn fill_daily(map: &BTreeMap<NaiveDate, Decimal>, window: DateWindow) -> Vec<TrendPoint> {
    window
        .start
        .iter_days()
        .take_while(|day| *day <= window.end)
        .map(|date| TrendPoint { date, value: map.get(&date).copied().unwrap_or_default() })
        .collect()
}

/// Downsamples an ascending daily series into `bucket_days`-wide windows.
/// Bucket index is days-since-first-point / bucket_days; values are summed
/// and the representative date is the last day observed in the bucket.
fn bucket_series(daily: &[TrendPoint], bucket_days: u32) -> Vec<BucketPoint> {
    if bucket_days <= 1 || daily.is_empty() {
        return daily
            .iter()
            .map(|point| BucketPoint {
                date: point.date,
                value: point.value,
                bucket_start: point.date,
                bucket_end: point.date,
            })
            .collect();
    }

    let first = daily[0].date;
    let width = i64::from(bucket_days);
    let mut buckets: Vec<BucketPoint> = Vec::new();

    for point in daily {
        let index = (point.date - first).num_days() / width;
        let bucket_start = first + chrono::Days::new((index * width) as u64);

        match buckets.last_mut() {
            Some(open) if open.bucket_start == bucket_start => {
                open.value = round_money(open.value + point.value);
                open.date = point.date;
                open.bucket_end = point.date;
            }
            _ => buckets.push(BucketPoint {
                date: point.date,
                value: point.value,
                bucket_start,
                bucket_end: point.date,
            }),
        }
    }

    buckets
}

fn cumulative_series(buckets: &[BucketPoint]) -> Vec<TrendPoint> {
    let mut running = Decimal::ZERO;
    buckets
        .iter()
        .map(|bucket| {
            running = round_money(running + bucket.value);
            TrendPoint { date: bucket.date, value: running }
        })
        .collect()
}

fn monthly_rollup(daily: &[TrendPoint]) -> Vec<TrendPoint> {
    let mut by_month: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for point in daily {
        let month = month_start(point.date);
        let entry = by_month.entry(month).or_default();
        *entry = round_money(*entry + point.value);
    }

    let (Some(first), Some(last)) =
        (by_month.keys().next().copied(), by_month.keys().next_back().copied())
    else {
        return Vec::new();
    };

    let mut months = Vec::new();
    let mut cursor = first;
    while cursor <= last {
        months.push(TrendPoint {
            date: cursor,
            value: by_month.get(&cursor).copied().unwrap_or_default(),
        });
        cursor = next_month(cursor);
    }
    months
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn next_month(date: NaiveDate) -> NaiveDate {
    let (year, month) =
        if date.month() == 12 { (date.year() + 1, 1) } else { (date.year(), date.month() + 1) };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(date)
}
