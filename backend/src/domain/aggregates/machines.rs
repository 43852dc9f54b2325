//! Machine usage and operator rankings over both quota shifts.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use super::Diagnostics;
use crate::domain::parse_date;
use crate::domain::records::{QuotaEntry, QuotaSheet};

/// Date filter over quota rows; unset parts match everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DateFilter {
    /// Calendar year.
    pub year: Option<i32>,
    /// Month, 1-12.
    pub month: Option<u32>,
    /// Day of the month.
    pub day: Option<u32>,
}

impl DateFilter {
    /// Whether `raw` falls inside the filter. Unreadable dates only pass an
    /// empty filter.
    #[must_use]
    pub fn matches(&self, raw: &str) -> bool {
        if self.year.is_none() && self.month.is_none() && self.day.is_none() {
            return true;
        }
        let Some(date) = parse_date(raw) else {
            return false;
        };
        self.year.is_none_or(|year| date.year() == year)
            && self.month.is_none_or(|month| date.month() == month)
            && self.day.is_none_or(|day| date.day() == day)
    }
}

/// How often a machine ran and what it produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineUsage {
    /// Machine label.
    pub machine: String,
    /// Rows naming the machine.
    pub times_used: usize,
    /// Sum of the readable row totals.
    pub total: f64,
}

/// One row of the operator ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorOutput {
    /// Operator name.
    pub operator: String,
    /// Machine label.
    pub machine: String,
    /// Part produced.
    pub item_name: String,
    /// `YYYY-MM` of the row date, blank when unreadable.
    pub month: String,
    /// Pieces produced.
    pub total: f64,
}

/// Machine usage with the operator ranking.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineReport {
    /// Machines sorted by label.
    pub machines: Vec<MachineUsage>,
    /// Rows sorted by total, highest first.
    pub top_operators: Vec<OperatorOutput>,
    /// Rows whose total could not be read are counted towards usage but
    /// skipped from the sums and the ranking.
    pub diagnostics: Diagnostics,
}

/// Usage counts and totals per machine plus the operator ranking, over the
/// rows of both shifts passing `filter`. Rows without a machine label are
/// skipped.
#[must_use]
pub fn machine_report(sheet: &QuotaSheet, filter: &DateFilter) -> MachineReport {
    let mut report = MachineReport::default();
    let rows = sheet
        .entries()
        .map(|(_, entry)| entry)
        .filter(|entry| filter.matches(&entry.date));
    for entry in rows {
        let machine = entry.machine.trim();
        let total = entry.total.value();
        report
            .diagnostics
            .record(!machine.is_empty() && total.is_some());
        if machine.is_empty() {
            continue;
        }
        let index = report
            .machines
            .iter()
            .position(|usage| usage.machine == machine)
            .unwrap_or_else(|| {
                report.machines.push(MachineUsage {
                    machine: machine.to_owned(),
                    times_used: 0,
                    total: 0.0,
                });
                report.machines.len() - 1
            });
        let Some(usage) = report.machines.get_mut(index) else {
            continue;
        };
        usage.times_used += 1;
        if let Some(total) = total {
            usage.total += total;
            report.top_operators.push(ranked(entry, machine, total));
        }
    }
    report
        .machines
        .sort_by(|left, right| left.machine.cmp(&right.machine));
    report
        .top_operators
        .sort_by(|left, right| right.total.total_cmp(&left.total));
    report
}

fn ranked(entry: &QuotaEntry, machine: &str, total: f64) -> OperatorOutput {
    OperatorOutput {
        operator: entry.operator.trim().to_owned(),
        machine: machine.to_owned(),
        item_name: entry.item_name.clone(),
        month: parse_date(&entry.date)
            .map(|date| date.format("%Y-%m").to_string())
            .unwrap_or_default(),
        total,
    }
}
