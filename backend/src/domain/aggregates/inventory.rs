//! Stock reconciliation from the warehouse movement log.

use serde::Serialize;

use super::Diagnostics;
use crate::domain::LooseNumber;
use crate::domain::records::{Inventory, InventoryItem, MovementKind, StockMovement, WarehouseLog};

/// Grouping key: trimmed, lower-cased `name|unit|dimension`.
#[must_use]
pub fn inventory_key(name: &str, unit: &str, dimension: &str) -> String {
    [name, unit, dimension]
        .map(|part| part.trim().to_lowercase())
        .join("|")
}

/// Reconciled inventory with diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InventoryReport {
    /// Inventory lines sorted by name, case-insensitively.
    pub items: Vec<InventoryItem>,
    /// Movements used and skipped.
    pub diagnostics: Diagnostics,
}

struct Group<'a> {
    key: String,
    first: &'a StockMovement,
    received: f64,
    released: f64,
}

/// Fold movements into on-hand quantities and merge them into `inventory`.
///
/// Movements are grouped by [`inventory_key`]. Each group's quantity is
/// `max(0, received - released)` and its unit price comes from the group's
/// first movement. Matching inventory lines are updated in place; new
/// groups are appended. Movements with an unknown type or a non-numeric
/// quantity are skipped.
#[must_use]
pub fn reconcile(inventory: &Inventory, movements: &WarehouseLog) -> InventoryReport {
    let mut diagnostics = Diagnostics::default();
    let mut groups: Vec<Group<'_>> = Vec::new();
    for movement in &movements.0 {
        let usable = movement.movement().zip(movement.quantity.value());
        diagnostics.record(usable.is_some());
        let Some((kind, quantity)) = usable else {
            continue;
        };
        let key = inventory_key(&movement.item_name, &movement.unit, &movement.dimension);
        let index = groups
            .iter()
            .position(|group| group.key == key)
            .unwrap_or_else(|| {
                groups.push(Group {
                    key,
                    first: movement,
                    received: 0.0,
                    released: 0.0,
                });
                groups.len() - 1
            });
        if let Some(group) = groups.get_mut(index) {
            match kind {
                MovementKind::Received => group.received += quantity,
                MovementKind::Released => group.released += quantity,
            }
        }
    }

    let mut items = inventory.0.clone();
    for group in &groups {
        let qty = (group.received - group.released).max(0.0);
        let price = group.first.u_price.value().unwrap_or_default();
        let total = LooseNumber::text(format!("{:.2}", qty * price));
        let existing = items
            .iter_mut()
            .find(|item| inventory_key(&item.item_name, &item.unit, &item.dimension) == group.key);
        match existing {
            Some(item) => {
                item.qty = LooseNumber::from_f64(qty);
                item.u_price = LooseNumber::from_f64(price);
                item.total = total;
            }
            None => items.push(InventoryItem {
                item_name: group.first.item_name.trim().to_owned(),
                qty: LooseNumber::from_f64(qty),
                unit: group.first.unit.trim().to_owned(),
                u_price: LooseNumber::from_f64(price),
                total,
                dimension: group.first.dimension.trim().to_owned(),
                department: group.first.department.clone(),
                requested_by: group.first.requested_by.clone(),
                date: group.first.date.clone(),
            }),
        }
    }
    items.sort_by_cached_key(|item| item.item_name.to_lowercase());

    InventoryReport { items, diagnostics }
}
