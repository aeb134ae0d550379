//! Fixed-width console tables.

use std::fmt;

use crate::catalog::Catalog;

const FLIGHT_RULE: &str = "---------------------------------------------------------";
const PASSENGER_RULE: &str = "--------------------------------------------------------------";

/// All flights, one row each.
pub struct FlightTable<'a>(pub &'a Catalog);

/// All passengers, one row each.
pub struct PassengerTable<'a>(pub &'a Catalog);

impl fmt::Display for FlightTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{FLIGHT_RULE}")?;
        writeln!(
            f,
            "{:<11} {:<12} {:<12} {:<9} {}",
            "Flight No.", "Origin", "Destination", "Capacity", "Available"
        )?;
        writeln!(f, "{FLIGHT_RULE}")?;
        for flight in self.0.flights() {
            writeln!(
                f,
                "{:<11} {:<12} {:<12} {:<9} {}",
                flight.id, flight.origin, flight.destination, flight.capacity, flight.available
            )?;
        }
        write!(f, "{FLIGHT_RULE}")
    }
}

impl fmt::Display for PassengerTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{PASSENGER_RULE}")?;
        writeln!(
            f,
            "{:<15} {:<3} {:<6} {:<15} {:<11} {}",
            "Name", "Age", "Gender", "Phone", "Flight No.", "Seat"
        )?;
        writeln!(f, "{PASSENGER_RULE}")?;
        for p in self.0.passengers() {
            writeln!(
                f,
                "{:<15} {:<3} {:<6} {:<15} {:<11} {}",
                p.details.name,
                p.details.age,
                p.details.gender,
                p.details.phone,
                p.flight_id,
                p.seat_number
            )?;
        }
        write!(f, "{PASSENGER_RULE}")
    }
}

/// Ascending seat numbers collapsed into ranges, e.g. `1-4, 6, 8-150`.
pub struct SeatRanges<I>(pub I);

impl<I> fmt::Display for SeatRanges<I>
where
    I: Iterator<Item = u32> + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut seats = self.0.clone().peekable();
        let mut first = true;
        while let Some(start) = seats.next() {
            let mut end = start;
            while seats.peek() == Some(&(end + 1)) {
                end += 1;
                seats.next();
            }
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            if start == end {
                write!(f, "{start}")?;
            } else {
                write!(f, "{start}-{end}")?;
            }
        }
        if first {
            f.write_str("none")?;
        }
        Ok(())
    }
}
