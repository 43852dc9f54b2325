//! Vehicle bookings.

use chrono::{Datelike, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::domain::mutation::remove_row;
use crate::domain::{CollectionDocument, EditKind, LooseNumber, Mutation, MutationError, parse_date};

/// One vehicle booking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Booking {
    /// Trip date, `YYYY-MM-DD`.
    pub date: String,
    /// Month of `date`, 1-12.
    pub month: LooseNumber,
    /// Year of `date`.
    pub year: LooseNumber,
    /// Vehicle name.
    pub vehicle: String,
    /// Plate number.
    pub plate: String,
    /// Employee using the vehicle.
    pub employee: String,
    /// Start time, `HH:MM`.
    pub start_time: String,
    /// End time, `HH:MM`.
    pub end_time: String,
    /// Reason for the trip.
    pub purpose: String,
    /// Where the vehicle goes.
    pub destination: String,
}

fn parse_time(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M").ok()
}

impl Booking {
    /// Start and end times when both are readable.
    #[must_use]
    pub fn window(&self) -> Option<(NaiveTime, NaiveTime)> {
        parse_time(&self.start_time).zip(parse_time(&self.end_time))
    }

    /// Whether both bookings hold the same vehicle at overlapping times on
    /// the same day. Touching windows do not overlap.
    #[must_use]
    pub fn clashes_with(&self, other: &Self) -> bool {
        if self.vehicle != other.vehicle || self.date != other.date {
            return false;
        }
        match (self.window(), other.window()) {
            (Some((start, end)), Some((other_start, other_end))) => {
                start < other_end && other_start < end
            }
            _ => false,
        }
    }
}

/// The `schedule` document: a top-level array of bookings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VehicleSchedule(pub Vec<Booking>);

impl CollectionDocument for VehicleSchedule {
    const NAME: &'static str = "schedule";
    const FILE_NAME: &'static str = "schedule.json";
}

/// Edits to the booking list.
#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleMutation {
    /// Add a booking. Every text field is required, the start must precede
    /// the end and the vehicle must be free for the whole window.
    Book(Booking),
    /// Remove a booking.
    Cancel {
        /// Row index.
        index: usize,
    },
}

impl ScheduleMutation {
    fn check(booking: &mut Booking) -> Result<(), MutationError> {
        let required = [
            ("employee", &booking.employee),
            ("vehicle", &booking.vehicle),
            ("purpose", &booking.purpose),
            ("destination", &booking.destination),
        ];
        if let Some((name, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(MutationError::invalid(format!("{name} is required")));
        }
        let date = parse_date(&booking.date).ok_or_else(|| {
            MutationError::invalid(format!("date must be YYYY-MM-DD: {}", booking.date))
        })?;
        let (start, end) = booking
            .window()
            .ok_or_else(|| MutationError::invalid("start and end times must be HH:MM"))?;
        if start >= end {
            return Err(MutationError::invalid("start time must precede end time"));
        }
        booking.month = LooseNumber::from(i64::from(date.month()));
        booking.year = LooseNumber::from(i64::from(date.year()));
        Ok(())
    }
}

impl Mutation<VehicleSchedule> for ScheduleMutation {
    fn kind(&self) -> EditKind {
        EditKind::Structural
    }

    fn apply(self, document: &mut VehicleSchedule) -> Result<(), MutationError> {
        match self {
            Self::Book(mut booking) => {
                Self::check(&mut booking)?;
                if document.0.iter().any(|held| held.clashes_with(&booking)) {
                    return Err(MutationError::Duplicate {
                        what: "booking",
                        key: format!(
                            "{} on {} {}-{}",
                            booking.vehicle, booking.date, booking.start_time, booking.end_time
                        ),
                    });
                }
                document.0.push(booking);
            }
            Self::Cancel { index } => {
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

    fn booking(vehicle: &str, start: &str, end: &str) -> Booking {
        Booking {
            date: "2024-06-03".to_owned(),
            vehicle: vehicle.to_owned(),
            plate: "ABC 123".to_owned(),
            employee: "Ana".to_owned(),
            start_time: start.to_owned(),
            end_time: end.to_owned(),
            purpose: "Delivery".to_owned(),
            destination: "Cebu".to_owned(),
            ..Booking::default()
        }
    }

    fn booked() -> VehicleSchedule {
        let mut schedule = VehicleSchedule::default();
        ScheduleMutation::Book(booking("Van", "08:00", "10:00"))
            .apply(&mut schedule)
            .expect("first booking");
        schedule
    }

    #[rstest]
    fn bookings_record_their_month_and_year() {
        let schedule = booked();
        assert_eq!(schedule.0[0].month, LooseNumber::from(6));
        assert_eq!(schedule.0[0].year, LooseNumber::from(2024));
    }

    #[rstest]
    #[case(booking("Van", "09:00", "11:00"), false)]
    #[case(booking("Van", "10:00", "11:00"), true)]
    #[case(booking("Truck", "09:00", "11:00"), true)]
    fn overlapping_windows_on_one_vehicle_clash(#[case] next: Booking, #[case] accepted: bool) {
        let mut schedule = booked();
        let result = ScheduleMutation::Book(next).apply(&mut schedule);
        assert_eq!(result.is_ok(), accepted);
        if !accepted {
            assert!(matches!(result, Err(MutationError::Duplicate { what: "booking", .. })));
            assert_eq!(schedule.0.len(), 1);
        }
    }

    #[rstest]
    #[case(booking("Van", "10:00", "09:00"))]
    #[case(booking("Van", "nine", "10:00"))]
    #[case(booking("", "08:00", "09:00"))]
    fn incomplete_bookings_are_refused(#[case] bad: Booking) {
        let mut schedule = VehicleSchedule::default();
        let error = ScheduleMutation::Book(bad)
            .apply(&mut schedule)
            .expect_err("booking refused");
        assert!(matches!(error, MutationError::Invalid { .. }));
    }

    #[rstest]
    fn cancelling_frees_the_slot() {
        let mut schedule = booked();
        ScheduleMutation::Cancel { index: 0 }
            .apply(&mut schedule)
            .expect("booking cancelled");
        ScheduleMutation::Book(booking("Van", "09:00", "11:00"))
            .apply(&mut schedule)
            .expect("slot is free");
    }
}
