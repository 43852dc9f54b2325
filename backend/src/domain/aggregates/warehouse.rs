//! Filtered movement totals for the per-department warehouse view.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::Diagnostics;
use super::machines::DateFilter;
use crate::domain::records::{StockMovement, WarehouseLog};

/// Warehouse table filter. Text criteria match exactly; unset or blank
/// criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WarehouseFilter {
    /// Item name.
    pub item: Option<String>,
    /// Calendar year of the movement date.
    pub year: Option<i32>,
    /// Month, 1-12.
    pub month: Option<u32>,
    /// Day of the month.
    pub day: Option<u32>,
    /// Requesting person.
    pub requested_by: Option<String>,
    /// Movement type as written, e.g. `received`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Department.
    pub department: Option<String>,
}

fn text_matches(wanted: Option<&str>, actual: &str) -> bool {
    wanted
        .filter(|wanted| !wanted.is_empty())
        .is_none_or(|wanted| wanted == actual)
}

impl WarehouseFilter {
    /// Whether `movement` passes every set criterion.
    #[must_use]
    pub fn matches(&self, movement: &StockMovement) -> bool {
        text_matches(self.item.as_deref(), &movement.item_name)
            && text_matches(self.requested_by.as_deref(), &movement.requested_by)
            && text_matches(self.kind.as_deref(), &movement.kind)
            && text_matches(self.department.as_deref(), &movement.department)
            && DateFilter {
                year: self.year,
                month: self.month,
                day: self.day,
            }
            .matches(&movement.date)
    }
}

/// Totals over the filtered movements.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentTotals {
    /// Matching movements, in log order.
    pub movements: Vec<StockMovement>,
    /// Sum of `uPrice * quantity`.
    pub amount: f64,
    /// Sum of the quantities.
    pub quantity: f64,
    /// Number of matching movements.
    pub count: usize,
    /// Distinct requesters among them.
    pub requesters: usize,
    /// Movements whose quantity or price could not be read are listed and
    /// counted but left out of the sums.
    pub diagnostics: Diagnostics,
}

/// Movements passing `filter` with their amount, quantity, row count and
/// distinct requester count.
#[must_use]
pub fn department_totals(log: &WarehouseLog, filter: &WarehouseFilter) -> DepartmentTotals {
    let mut totals = DepartmentTotals::default();
    let mut requesters = BTreeSet::new();
    for movement in log.0.iter().filter(|movement| filter.matches(movement)) {
        let quantity = movement.quantity.value();
        let priced = quantity.zip(movement.u_price.value());
        totals.diagnostics.record(priced.is_some());
        if let Some((quantity, price)) = priced {
            totals.amount += quantity * price;
        }
        totals.quantity += quantity.unwrap_or_default();
        requesters.insert(movement.requested_by.as_str());
        totals.movements.push(movement.clone());
    }
    totals.count = totals.movements.len();
    totals.requesters = requesters.len();
    totals
}
