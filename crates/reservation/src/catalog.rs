//! The session's flights and passengers.

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::flight::{seed_flights, Flight, FlightSummary};
use crate::passenger::Passenger;
use crate::roster::Roster;
use crate::text::{City, FlightId};

pub const INITIAL_FLIGHT_SLOTS: usize = 15;
pub const INITIAL_PASSENGER_SLOTS: usize = 10;

/// Owns every flight and passenger of one session.
///
/// Invariants:
/// - flight ids are unique
/// - every passenger references an existing flight and holds an occupied
///   seat on it, and no two passengers hold the same (flight, seat)
#[derive(Clone, Debug)]
pub struct Catalog {
    pub(crate) flights: Roster<Flight>,
    pub(crate) passengers: Roster<Passenger>,
}

/// What loading had to repair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Flight records dropped for invalid fields or an id already taken.
    pub dropped_flights: usize,
    /// Passengers dropped for invalid fields, an unknown flight or an
    /// unusable seat.
    pub dropped_passengers: usize,
    /// Flights whose stored availability disagreed with their bookings.
    pub corrected_flights: usize,
}

impl Reconciliation {
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self {
            flights: Roster::with_slots(INITIAL_FLIGHT_SLOTS),
            passengers: Roster::with_slots(INITIAL_PASSENGER_SLOTS),
        }
    }

    /// A catalog holding the sample flights.
    pub fn seeded() -> Result<Self> {
        let mut catalog = Self::new();
        for flight in seed_flights()? {
            catalog.flights.push(flight);
        }
        Ok(catalog)
    }

    /// Append a flight with every seat free.
    pub fn add_flight(
        &mut self,
        id: FlightId,
        origin: City,
        destination: City,
        capacity: u32,
    ) -> Result<&Flight> {
        if self.flight_index(id.as_str()).is_some() {
            return Err(Error::DuplicateIdentifier(id.to_string()));
        }
        let flight = Flight::new(id, origin, destination, capacity)?;
        info!(flight = %flight.id(), capacity, "flight added");
        self.flights.push(flight);
        Ok(&self.flights[self.flights.len() - 1])
    }

    pub fn find_flight(&self, id: &str) -> Result<&Flight> {
        self.flight_index(id)
            .map(|index| &self.flights[index])
            .ok_or_else(|| Error::FlightNotFound(id.to_string()))
    }

    /// Flight summaries in insertion order.
    pub fn flights(&self) -> impl Iterator<Item = FlightSummary<'_>> + '_ {
        self.flights.iter().map(Flight::summary)
    }

    /// Passengers in booking order.
    pub fn passengers(&self) -> impl Iterator<Item = &Passenger> + '_ {
        self.passengers.iter()
    }

    /// Free seats of a flight in ascending order.
    pub fn free_seats(&self, id: &str) -> Result<impl Iterator<Item = u32> + Clone + '_> {
        Ok(self.find_flight(id)?.free_seats())
    }

    /// The passenger holding `seat_number` on `flight_id`, if any.
    pub fn find_booking(&self, flight_id: &str, seat_number: u32) -> Option<&Passenger> {
        self.passengers
            .iter()
            .find(|p| p.holds(flight_id, seat_number))
    }

    pub fn flight_count(&self) -> usize {
        self.flights.len()
    }

    pub fn passenger_count(&self) -> usize {
        self.passengers.len()
    }

    /// Slot counts of the flight and passenger rosters.
    pub fn slots(&self) -> (usize, usize) {
        (self.flights.slots(), self.passengers.slots())
    }

    /// Overlay loaded state and rebuild seat occupancy from the bookings.
    ///
    /// `None` leaves that side untouched. Occupancy is not stored on disk, so
    /// every flight's seats are re-derived from the passenger list and
    /// `available` is recomputed from them. Bookings that cannot be honoured
    /// are dropped and counted in the returned report.
    pub fn restore(
        &mut self,
        flights: Option<Vec<Flight>>,
        passengers: Option<Vec<Passenger>>,
    ) -> Reconciliation {
        let mut report = Reconciliation::default();

        if let Some(flights) = flights {
            let mut unique: Vec<Flight> = Vec::with_capacity(flights.len());
            for flight in flights {
                if unique.iter().any(|kept| kept.id() == flight.id()) {
                    warn!(flight = %flight.id(), "dropping duplicate flight record");
                    report.dropped_flights += 1;
                    continue;
                }
                unique.push(flight);
            }
            self.flights.replace(unique);
        }
        if let Some(passengers) = passengers {
            self.passengers.replace(passengers);
        }

        let stored: Vec<u32> = self
            .flights
            .iter_mut()
            .map(Flight::reset_occupancy)
            .collect();

        let flights = &mut self.flights;
        self.passengers.retain(|passenger| {
            let Some(flight) = flights
                .iter_mut()
                .find(|flight| flight.id() == &passenger.flight_id)
            else {
                warn!(
                    passenger = %passenger.name(),
                    flight = %passenger.flight_id,
                    "dropping booking on unknown flight"
                );
                report.dropped_passengers += 1;
                return false;
            };
            if !flight.occupy(passenger.seat_number) {
                warn!(
                    passenger = %passenger.name(),
                    flight = %passenger.flight_id,
                    seat = passenger.seat_number,
                    "dropping booking on a missing or already taken seat"
                );
                report.dropped_passengers += 1;
                return false;
            }
            true
        });

        for (flight, stored) in self.flights.iter().zip(stored) {
            if flight.available() != stored {
                warn!(
                    flight = %flight.id(),
                    stored,
                    derived = flight.available(),
                    "stored availability disagrees with bookings"
                );
                report.corrected_flights += 1;
            }
        }

        report
    }

    pub(crate) fn flight_index(&self, id: &str) -> Option<usize> {
        self.flights.position(|flight| flight.id() == id)
    }
}
