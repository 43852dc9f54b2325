//! Per-day totals of a weekly output sheet.

use serde::Serialize;

use super::Diagnostics;
use crate::domain::records::{DailyWeek, Inspection, WEEK_DAYS, day_value};

/// Totals for one day column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayTotal {
    /// Day name, lower case.
    pub day: &'static str,
    /// Pieces over every inspected row.
    pub output: f64,
    /// Pieces over rows that passed.
    pub delivered: f64,
}

/// Totals of one week.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekTotals {
    /// Week label.
    pub week_range: String,
    /// Customer project.
    pub project_name: String,
    /// One entry per day in sheet order.
    pub days: Vec<DayTotal>,
    /// Rows used; rows without a known status are skipped.
    pub diagnostics: Diagnostics,
}

/// Sum each day over rows with a known status, and separately over rows
/// marked good. Blank cells count as nothing produced.
#[must_use]
pub fn week_totals(week: &DailyWeek) -> WeekTotals {
    let mut diagnostics = Diagnostics::default();
    let mut days: Vec<DayTotal> = WEEK_DAYS
        .into_iter()
        .map(|day| DayTotal {
            day,
            output: 0.0,
            delivered: 0.0,
        })
        .collect();
    for row in week.rows.iter().filter(|row| !row.is_total_row()) {
        let inspection = row.inspection();
        diagnostics.record(inspection.is_some());
        let Some(inspection) = inspection else {
            continue;
        };
        for (total, cell) in days.iter_mut().zip(row.days()) {
            let pieces = day_value(cell).unwrap_or_default();
            total.output += pieces;
            if inspection == Inspection::Good {
                total.delivered += pieces;
            }
        }
    }
    WeekTotals {
        week_range: week.week_range.clone(),
        project_name: week.project_name.clone(),
        days,
        diagnostics,
    }
}
