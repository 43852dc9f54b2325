//! Fleet registry: vehicles and drivers offered by the trip form.

use serde::{Deserialize, Serialize};

use crate::domain::mutation::{remove_row, row_mut};
use crate::domain::{CollectionDocument, EditKind, Mutation, MutationError};

/// A registered vehicle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Vehicle {
    /// Display name used by trips and the service log.
    pub vehicle_name: String,
    /// Licence plate.
    pub plate_number: String,
}

/// A registered driver.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Driver {
    /// Driver name.
    pub driver_name: String,
}

/// The `fleet` document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fleet {
    /// Vehicles.
    pub vehicles: Vec<Vehicle>,
    /// Drivers.
    pub drivers: Vec<Driver>,
}

impl CollectionDocument for Fleet {
    const NAME: &'static str = "fleet";
    const FILE_NAME: &'static str = "vehicle.json";
}

/// Editable vehicle columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleField {
    /// `vehicleName`
    Name,
    /// `plateNumber`
    Plate,
}

/// Edits to the fleet registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FleetMutation {
    /// Register a vehicle; both fields are required.
    AddVehicle(Vehicle),
    /// Overwrite one vehicle cell.
    EditVehicle {
        /// Row index.
        index: usize,
        /// Column.
        field: VehicleField,
        /// New text.
        value: String,
    },
    /// Remove a vehicle.
    RemoveVehicle {
        /// Row index.
        index: usize,
    },
    /// Register a driver; the name is required.
    AddDriver(Driver),
    /// Rename a driver.
    RenameDriver {
        /// Row index.
        index: usize,
        /// New name.
        value: String,
    },
    /// Remove a driver.
    RemoveDriver {
        /// Row index.
        index: usize,
    },
}

impl Mutation<Fleet> for FleetMutation {
    fn kind(&self) -> EditKind {
        match self {
            Self::EditVehicle { .. } | Self::RenameDriver { .. } => EditKind::Field,
            Self::AddVehicle(_)
            | Self::RemoveVehicle { .. }
            | Self::AddDriver(_)
            | Self::RemoveDriver { .. } => EditKind::Structural,
        }
    }

    fn apply(self, document: &mut Fleet) -> Result<(), MutationError> {
        match self {
            Self::AddVehicle(vehicle) => {
                let vehicle = Vehicle {
                    vehicle_name: vehicle.vehicle_name.trim().to_owned(),
                    plate_number: vehicle.plate_number.trim().to_owned(),
                };
                if vehicle.vehicle_name.is_empty() || vehicle.plate_number.is_empty() {
                    return Err(MutationError::invalid(
                        "a vehicle needs a name and a plate number",
                    ));
                }
                document.vehicles.push(vehicle);
            }
            Self::EditVehicle {
                index,
                field,
                value,
            } => {
                let vehicle = row_mut(&mut document.vehicles, index)?;
                match field {
                    VehicleField::Name => vehicle.vehicle_name = value,
                    VehicleField::Plate => vehicle.plate_number = value,
                }
            }
            Self::RemoveVehicle { index } => {
                remove_row(&mut document.vehicles, index)?;
            }
            Self::AddDriver(driver) => {
                let driver_name = driver.driver_name.trim().to_owned();
                if driver_name.is_empty() {
                    return Err(MutationError::invalid("a driver needs a name"));
                }
                document.drivers.push(Driver { driver_name });
            }
            Self::RenameDriver { index, value } => {
                row_mut(&mut document.drivers, index)?.driver_name = value;
            }
            Self::RemoveDriver { index } => {
                remove_row(&mut document.drivers, index)?;
            }
        }
        Ok(())
    }
}
