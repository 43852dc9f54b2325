//! Warehouse stock movements and the derived inventory.

use serde::{Deserialize, Serialize};

use crate::domain::mutation::{remove_row, row_mut};
use crate::domain::{CollectionDocument, EditKind, LooseNumber, Mutation, MutationError};

/// One inventory line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InventoryItem {
    /// Item description.
    pub item_name: String,
    /// Quantity on hand.
    pub qty: LooseNumber,
    /// Unit of measure.
    pub unit: String,
    /// Unit price.
    pub u_price: LooseNumber,
    /// `qty * uPrice`, two decimals.
    pub total: LooseNumber,
    /// Size or dimension.
    pub dimension: String,
    /// Owning department.
    pub department: String,
    /// Requesting person.
    pub requested_by: String,
    /// Date of the first movement.
    pub date: String,
}

/// The `inventory` document: a top-level array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory(pub Vec<InventoryItem>);

impl CollectionDocument for Inventory {
    const NAME: &'static str = "inventory";
    const FILE_NAME: &'static str = "inventory.json";
}

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementKind {
    /// Goods in.
    Received,
    /// Goods out.
    Released,
}

/// One logged stock movement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StockMovement {
    /// `received` or `released`, any case.
    #[serde(rename = "type")]
    pub kind: String,
    /// Item description.
    pub item_name: String,
    /// Quantity moved.
    pub quantity: LooseNumber,
    /// Unit of measure.
    pub unit: String,
    /// Unit price.
    pub u_price: LooseNumber,
    /// `quantity * uPrice`.
    pub total: LooseNumber,
    /// Size or dimension.
    pub dimension: String,
    /// Department.
    pub department: String,
    /// Requesting person.
    pub requested_by: String,
    /// Movement date.
    pub date: String,
}

impl StockMovement {
    /// Parsed direction; `None` for anything else.
    #[must_use]
    pub fn movement(&self) -> Option<MovementKind> {
        match self.kind.trim().to_lowercase().as_str() {
            "received" => Some(MovementKind::Received),
            "released" => Some(MovementKind::Released),
            _ => None,
        }
    }

    fn refresh_total(&mut self) {
        self.total = match (self.quantity.value(), self.u_price.value()) {
            (Some(quantity), Some(price)) => LooseNumber::text(format!("{:.2}", quantity * price)),
            _ => LooseNumber::default(),
        };
    }
}

/// The `warehouse` document: the movement log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WarehouseLog(pub Vec<StockMovement>);

impl CollectionDocument for WarehouseLog {
    const NAME: &'static str = "warehouse";
    const FILE_NAME: &'static str = "warehouse.json";
}

impl WarehouseLog {
    /// Movements logged on `date`; a blank date returns everything.
    #[must_use]
    pub fn on_date<'a>(&'a self, date: &'a str) -> impl Iterator<Item = &'a StockMovement> {
        self.0
            .iter()
            .filter(move |movement| date.is_empty() || movement.date == date)
    }
}

/// Edits to the movement log. Duplicates are allowed.
#[derive(Debug, Clone, PartialEq)]
pub enum WarehouseMutation {
    /// Log a movement.
    Log(StockMovement),
    /// Replace a logged movement.
    Amend {
        /// Row index.
        index: usize,
        /// Corrected movement.
        movement: StockMovement,
    },
    /// Remove a movement.
    Delete {
        /// Row index.
        index: usize,
    },
}

impl Mutation<WarehouseLog> for WarehouseMutation {
    fn kind(&self) -> EditKind {
        EditKind::Structural
    }

    fn apply(self, document: &mut WarehouseLog) -> Result<(), MutationError> {
        match self {
            Self::Log(mut movement) => {
                if movement.movement().is_none() {
                    return Err(MutationError::invalid(format!(
                        "unknown movement type: {}",
                        movement.kind
                    )));
                }
                movement.refresh_total();
                document.0.push(movement);
            }
            Self::Amend {
                index,
                mut movement,
            } => {
                movement.refresh_total();
                *row_mut(&mut document.0, index)? = movement;
            }
            Self::Delete { index } => {
                remove_row(&mut document.0, index)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn movement(kind: &str, quantity: i64, date: &str) -> StockMovement {
        StockMovement {
            kind: kind.to_owned(),
            item_name: "Hex bolt".to_owned(),
            quantity: quantity.into(),
            u_price: LooseNumber::text("2.5"),
            date: date.to_owned(),
            ..StockMovement::default()
        }
    }

    #[rstest]
    #[case("Received", Some(MovementKind::Received))]
    #[case(" released ", Some(MovementKind::Released))]
    #[case("returned", None)]
    fn movement_type_is_case_insensitive(#[case] kind: &str, #[case] expected: Option<MovementKind>) {
        assert_eq!(movement(kind, 1, "").movement(), expected);
    }

    #[rstest]
    fn logging_computes_the_line_total() {
        let mut log = WarehouseLog::default();
        WarehouseMutation::Log(movement("received", 4, "2024-02-01"))
            .apply(&mut log)
            .expect("movement logged");
        assert_eq!(log.0[0].total, LooseNumber::text("10.00"));
    }

    #[rstest]
    fn unknown_types_are_refused() {
        let mut log = WarehouseLog::default();
        let result = WarehouseMutation::Log(movement("lost", 1, "")).apply(&mut log);
        assert!(matches!(result, Err(MutationError::Invalid { .. })));
        assert!(log.0.is_empty());
    }

    #[rstest]
    fn filters_by_day() {
        let log = WarehouseLog(vec![
            movement("received", 1, "2024-02-01"),
            movement("released", 1, "2024-02-02"),
        ]);
        assert_eq!(log.on_date("2024-02-02").count(), 1);
        assert_eq!(log.on_date("").count(), 2);
    }
}
