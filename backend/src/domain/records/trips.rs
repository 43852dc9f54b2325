//! Vehicle trip log.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::mutation::{remove_row, row_mut};
use crate::domain::{
    CollectionDocument, EditKind, LooseNumber, Mutation, MutationError, parse_timestamp,
};

/// One dispatched trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Trip {
    /// Vehicle name from the fleet registry.
    pub vehicle: String,
    /// Driver name.
    pub driver: String,
    /// Free-text destination.
    pub destination: String,
    /// Odometer reading at departure.
    pub odometer: LooseNumber,
    /// Departure, `YYYY-MM-DDTHH:MM`.
    pub start: String,
    /// Return, `YYYY-MM-DDTHH:MM`.
    pub end: String,
}

impl Trip {
    /// Parsed departure time.
    #[must_use]
    pub fn started_at(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.start)
    }
}

/// The `trips` document: a top-level array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TripLog(pub Vec<Trip>);

impl CollectionDocument for TripLog {
    const NAME: &'static str = "trips";
    const FILE_NAME: &'static str = "logistics.json";
}

impl TripLog {
    /// Trips departing on `date`, for the daily schedule.
    #[must_use]
    pub fn departing_on(&self, date: NaiveDate) -> impl Iterator<Item = &Trip> {
        self.0
            .iter()
            .filter(move |trip| trip.started_at().is_some_and(|at| at.date() == date))
    }
}

/// Editable trip columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripField {
    /// `vehicle`
    Vehicle,
    /// `driver`
    Driver,
    /// `destination`
    Destination,
    /// `odometer`
    Odometer,
    /// `start`
    Start,
    /// `end`
    End,
}

/// Edits to the trip log.
#[derive(Debug, Clone, PartialEq)]
pub enum TripMutation {
    /// Append a trip.
    Add(Trip),
    /// Overwrite one cell.
    Edit {
        /// Row index.
        index: usize,
        /// Column.
        field: TripField,
        /// New cell text.
        value: String,
    },
    /// Remove a row.
    Delete {
        /// Row index.
        index: usize,
    },
}

impl Mutation<TripLog> for TripMutation {
    fn kind(&self) -> EditKind {
        match self {
            Self::Edit { .. } => EditKind::Field,
            Self::Add(_) | Self::Delete { .. } => EditKind::Structural,
        }
    }

    fn apply(self, document: &mut TripLog) -> Result<(), MutationError> {
        match self {
            Self::Add(trip) => {
                if trip.vehicle.trim().is_empty() {
                    return Err(MutationError::invalid("a trip needs a vehicle"));
                }
                document.0.push(trip);
            }
            Self::Edit {
                index,
                field,
                value,
            } => {
                let trip = row_mut(&mut document.0, index)?;
                match field {
                    TripField::Vehicle => trip.vehicle = value,
                    TripField::Driver => trip.driver = value,
                    TripField::Destination => trip.destination = value,
                    TripField::Odometer => trip.odometer = LooseNumber::Text(value),
                    TripField::Start => trip.start = value,
                    TripField::End => trip.end = value,
                }
            }
            Self::Delete { index } => {
                remove_row(&mut document.0, index)?;
            }
        }
        Ok(())
    }
}
