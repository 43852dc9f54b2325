//! Grouped period deltas over monotonic readings such as odometers.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDateTime};
use serde::Serialize;

use super::Diagnostics;

/// Time bucket for deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    /// Calendar month.
    Month,
    /// Calendar year.
    Year,
}

/// A usable reading: group key, timestamp and value.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    /// Grouping key, e.g. a vehicle name.
    pub group: String,
    /// When the reading was taken.
    pub at: NaiveDateTime,
    /// Reading value.
    pub value: f64,
}

impl Reading {
    /// A reading, or `None` when the timestamp or value is missing.
    #[must_use]
    pub fn new(group: impl Into<String>, at: Option<NaiveDateTime>, value: Option<f64>) -> Option<Self> {
        Some(Self {
            group: group.into(),
            at: at?,
            value: value?,
        })
    }
}

/// Delta for one group in one period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodDelta {
    /// Grouping key.
    pub group: String,
    /// Calendar year.
    pub year: i32,
    /// Month (1-12) for monthly rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    /// Earliest reading.
    pub first: f64,
    /// Latest reading.
    pub last: f64,
    /// `last - first`, clamped at zero.
    pub distance: f64,
    /// `distance * rate`.
    pub cost: f64,
    /// The latest reading was below the earliest one.
    pub regressed: bool,
    /// Readings in the bucket.
    pub readings: usize,
}

/// Deltas plus diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeltaReport {
    /// One row per group and period, ordered by group then period.
    pub rows: Vec<PeriodDelta>,
    /// Usage counts.
    pub diagnostics: Diagnostics,
}

/// Partition readings by group and period, sort each bucket by timestamp
/// and report `last - first` priced at `rate` per unit.
///
/// `None` entries are counted as skipped. A bucket whose last value is
/// below its first reports zero distance and sets `regressed`.
#[must_use]
pub fn period_deltas(
    readings: impl IntoIterator<Item = Option<Reading>>,
    period: Period,
    rate: f64,
) -> DeltaReport {
    let mut diagnostics = Diagnostics::default();
    let mut buckets: BTreeMap<(String, i32, Option<u32>), Vec<(NaiveDateTime, f64)>> =
        BTreeMap::new();
    for reading in readings {
        diagnostics.record(reading.is_some());
        let Some(Reading { group, at, value }) = reading else {
            continue;
        };
        let month = match period {
            Period::Month => Some(at.month()),
            Period::Year => None,
        };
        buckets
            .entry((group, at.year(), month))
            .or_default()
            .push((at, value));
    }

    let rows = buckets
        .into_iter()
        .filter_map(|((group, year, month), mut bucket)| {
            bucket.sort_by_key(|(at, _)| *at);
            let (_, first) = *bucket.first()?;
            let (_, last) = *bucket.last()?;
            let delta = last - first;
            let distance = delta.max(0.0);
            Some(PeriodDelta {
                group,
                year,
                month,
                first,
                last,
                distance,
                cost: distance * rate,
                regressed: delta < 0.0,
                readings: bucket.len(),
            })
        })
        .collect();

    DeltaReport { rows, diagnostics }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::parse_timestamp;
    use rstest::rstest;

    fn reading(group: &str, at: &str, value: f64) -> Option<Reading> {
        Reading::new(group, parse_timestamp(at), Some(value))
    }

    #[rstest]
    fn monthly_delta_prices_the_distance() {
        let report = period_deltas(
            [reading("A", "2024-01-01", 100.0), reading("A", "2024-01-15", 150.0)],
            Period::Month,
            5.0,
        );
        assert_eq!(report.rows.len(), 1);
        let row = &report.rows[0];
        assert_eq!((row.year, row.month), (2024, Some(1)));
        assert!((row.distance - 50.0).abs() < f64::EPSILON);
        assert!((row.cost - 250.0).abs() < f64::EPSILON);
        assert!(!row.regressed);
    }

    #[rstest]
    fn readings_are_sorted_before_taking_the_delta() {
        let report = period_deltas(
            [
                reading("A", "2024-03-20T10:00", 180.0),
                reading("A", "2024-03-02T08:00", 100.0),
                reading("A", "2024-03-10T08:00", 90.0),
            ],
            Period::Month,
            1.0,
        );
        let row = &report.rows[0];
        assert!((row.first - 100.0).abs() < f64::EPSILON);
        assert!((row.distance - 80.0).abs() < f64::EPSILON);
        assert_eq!(row.readings, 3);
    }

    #[rstest]
    fn decreasing_buckets_clamp_and_flag() {
        let report = period_deltas(
            [reading("A", "2024-01-01", 300.0), reading("A", "2024-01-09", 120.0)],
            Period::Month,
            0.05,
        );
        let row = &report.rows[0];
        assert!(row.distance.abs() < f64::EPSILON);
        assert!(row.cost.abs() < f64::EPSILON);
        assert!(row.regressed);
    }

    #[rstest]
    fn groups_and_years_are_kept_apart() {
        let report = period_deltas(
            [
                reading("B", "2024-02-01", 10.0),
                reading("A", "2023-12-31", 5.0),
                reading("A", "2024-01-02", 7.0),
                reading("A", "2024-06-02", 17.0),
            ],
            Period::Year,
            1.0,
        );
        let keys: Vec<_> = report
            .rows
            .iter()
            .map(|row| (row.group.as_str(), row.year, row.month))
            .collect();
        assert_eq!(keys, [("A", 2023, None), ("A", 2024, None), ("B", 2024, None)]);
        assert!((report.rows[1].distance - 10.0).abs() < f64::EPSILON);
    }

    #[rstest]
    fn unusable_readings_are_counted_not_zeroed() {
        let report = period_deltas(
            [
                reading("A", "2024-01-01", 100.0),
                Reading::new("A", parse_timestamp("2024-01-05"), None),
                Reading::new("A", None, Some(5.0)),
                reading("A", "2024-01-15", 150.0),
            ],
            Period::Month,
            1.0,
        );
        assert_eq!(report.diagnostics.considered, 2);
        assert_eq!(report.diagnostics.skipped, 2);
        assert!((report.rows[0].distance - 50.0).abs() < f64::EPSILON);
    }
}
