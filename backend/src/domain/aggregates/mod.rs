//! Pure summary views computed from a collection.
//!
//! Aggregates are recomputed from scratch on every call and never persisted.
//! Records whose inputs are missing or non-numeric are left out of a
//! computation and counted in [`Diagnostics::skipped`]; they are never read
//! as zero.

mod buckets;
mod daily;
mod delta;
mod inventory;
mod machines;
mod quota;
mod warehouse;

use serde::Serialize;

use crate::domain::LooseNumber;

pub use buckets::{BucketCount, CategoryRule, CategoryRules, MonthCount, count_by_month};
pub use daily::{DayTotal, WeekTotals, week_totals};
pub use delta::{DeltaReport, Period, PeriodDelta, Reading, period_deltas};
pub use inventory::{InventoryReport, inventory_key, reconcile};
pub use machines::{DateFilter, MachineReport, MachineUsage, OperatorOutput, machine_report};
pub use quota::{Callout, CalloutReport, callouts, hourly_shortfalls, shift_total, under_quota};
pub use warehouse::{DepartmentTotals, WarehouseFilter, department_totals};

/// How many records fed a computation and how many were left out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    /// Records that contributed.
    pub considered: usize,
    /// Records excluded for missing or invalid fields.
    pub skipped: usize,
}

impl Diagnostics {
    /// Count one record as used or skipped.
    pub fn record(&mut self, used: bool) {
        if used {
            self.considered += 1;
        } else {
            self.skipped += 1;
        }
    }

    /// Add another computation's counts.
    pub fn merge(&mut self, other: Self) {
        self.considered += other.considered;
        self.skipped += other.skipped;
    }
}

/// A sum with its diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Total {
    /// Sum of the usable values.
    pub amount: f64,
    /// Usage counts.
    pub diagnostics: Diagnostics,
}

/// Sum numeric cells, skipping blank or non-numeric ones.
///
/// # Examples
/// ```
/// use recordkeeper::domain::LooseNumber;
/// use recordkeeper::domain::aggregates::sum_values;
///
/// let cells = [LooseNumber::from(2), LooseNumber::text("x"), LooseNumber::text("1.5")];
/// let total = sum_values(&cells);
/// assert_eq!(total.amount, 3.5);
/// assert_eq!(total.diagnostics.skipped, 1);
/// ```
#[must_use]
pub fn sum_values<'a>(cells: impl IntoIterator<Item = &'a LooseNumber>) -> Total {
    cells.into_iter().fold(Total::default(), |mut total, cell| {
        let value = cell.value();
        total.diagnostics.record(value.is_some());
        total.amount += value.unwrap_or_default();
        total
    })
}
