use serde::Serialize;

use crate::error::{Error, Result};
use crate::text::{FlightId, PersonName, Phone};

/// Who is travelling. Validated at construction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PassengerDetails {
    pub name: PersonName,
    pub age: u32,
    pub gender: char,
    pub phone: Phone,
}

impl PassengerDetails {
    pub fn new(name: PersonName, age: u32, gender: char, phone: Phone) -> Result<Self> {
        // stored as a single byte
        if !gender.is_ascii_graphic() {
            return Err(Error::InvalidText {
                field: "gender",
                reason: format!("{gender:?} is not a single printable ASCII character"),
            });
        }
        Ok(Self {
            name,
            age,
            gender,
            phone,
        })
    }
}

/// A booked seat: the traveller plus the flight and 1-based seat they hold.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Passenger {
    #[serde(flatten)]
    pub details: PassengerDetails,
    pub flight_id: FlightId,
    pub seat_number: u32,
}

impl Passenger {
    pub fn name(&self) -> &PersonName {
        &self.details.name
    }

    pub(crate) fn holds(&self, flight_id: &str, seat_number: u32) -> bool {
        self.flight_id == *flight_id && self.seat_number == seat_number
    }

    pub(crate) fn is(&self, name: &str, flight_id: &str) -> bool {
        self.details.name == *name && self.flight_id == *flight_id
    }
}
