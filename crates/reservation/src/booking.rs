//! Seat booking and cancellation.
//!
//! Every operation validates fully before it mutates, so a rejected request
//! leaves the catalog exactly as it was.

use tracing::debug;

use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::flight::Flight;
use crate::passenger::{Passenger, PassengerDetails};

impl Catalog {
    /// Check that `seat` can be booked on `flight_id` without booking it.
    pub fn check_seat(&self, flight_id: &str, seat: u32) -> Result<&Flight> {
        let index = self.bookable(flight_id, seat)?;
        Ok(&self.flights[index])
    }

    /// Book `seat` (1-based) on `flight_id` for `details`.
    pub fn book_seat(
        &mut self,
        flight_id: &str,
        details: PassengerDetails,
        seat: u32,
    ) -> Result<&Passenger> {
        let index = self.bookable(flight_id, seat)?;
        let flight = &mut self.flights[index];
        let occupied = flight.occupy(seat);
        debug_assert!(occupied, "validated seat could not be occupied");

        let passenger = Passenger {
            details,
            flight_id: flight.id().clone(),
            seat_number: seat,
        };
        debug!(
            passenger = %passenger.name(),
            flight = %passenger.flight_id,
            seat,
            available = flight.available(),
            "seat booked"
        );
        self.passengers.push(passenger);
        Ok(&self.passengers[self.passengers.len() - 1])
    }

    /// Cancel the booking of the passenger called `name` on `flight_id`.
    ///
    /// Fails with [`Error::AmbiguousPassenger`] when several passengers of
    /// that name are on the flight; use [`Catalog::cancel_booking`] then.
    pub fn cancel_seat(&mut self, name: &str, flight_id: &str) -> Result<Passenger> {
        let mut matches = self
            .passengers
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is(name, flight_id))
            .map(|(index, _)| index);
        let Some(index) = matches.next() else {
            return Err(Error::PassengerNotFound {
                name: name.to_string(),
                flight: flight_id.to_string(),
            });
        };
        let others = matches.count();
        if others > 0 {
            return Err(Error::AmbiguousPassenger {
                name: name.to_string(),
                flight: flight_id.to_string(),
                count: others + 1,
            });
        }
        self.release(index)
    }

    /// Cancel whichever booking holds `seat` on `flight_id`.
    pub fn cancel_booking(&mut self, flight_id: &str, seat: u32) -> Result<Passenger> {
        self.find_flight(flight_id)?;
        let index = self
            .passengers
            .position(|p| p.holds(flight_id, seat))
            .ok_or_else(|| Error::BookingNotFound {
                flight: flight_id.to_string(),
                seat,
            })?;
        self.release(index)
    }

    fn bookable(&self, flight_id: &str, seat: u32) -> Result<usize> {
        let index = self
            .flight_index(flight_id)
            .ok_or_else(|| Error::FlightNotFound(flight_id.to_string()))?;
        let flight = &self.flights[index];
        if flight.available() == 0 {
            return Err(Error::NoSeatsAvailable(flight_id.to_string()));
        }
        if !flight.is_free(seat) {
            return Err(Error::InvalidSeat {
                flight: flight_id.to_string(),
                seat,
            });
        }
        Ok(index)
    }

    /// Free the seat of passenger `index` and remove the passenger.
    fn release(&mut self, index: usize) -> Result<Passenger> {
        let passenger = &self.passengers[index];
        let seat = passenger.seat_number;
        let flight_index = self
            .flight_index(passenger.flight_id.as_str())
            .ok_or_else(|| Error::FlightNotFound(passenger.flight_id.to_string()))?;

        let flight = &mut self.flights[flight_index];
        let released = flight.release(seat);
        debug_assert!(released, "booked seat was not occupied");
        let available = flight.available();

        let passenger = self.passengers.remove(index);
        debug!(
            passenger = %passenger.name(),
            flight = %passenger.flight_id,
            seat,
            available,
            "booking cancelled"
        );
        Ok(passenger)
    }
}
