use serde::Serialize;

use crate::error::{Error, Result};
use crate::text::{City, FlightId};

/// Largest seat count a flight may declare.
pub const MAX_CAPACITY: u32 = 10_000;

/// A scheduled flight with per-seat occupancy.
///
/// `available` always equals the number of free seats in `occupancy`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Flight {
    id: FlightId,
    origin: City,
    destination: City,
    available: u32,
    occupancy: Vec<bool>,
}

/// Listing view of a flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct FlightSummary<'a> {
    pub id: &'a FlightId,
    pub origin: &'a City,
    pub destination: &'a City,
    pub capacity: u32,
    pub available: u32,
}

impl Flight {
    /// A flight with every seat free.
    pub fn new(id: FlightId, origin: City, destination: City, capacity: u32) -> Result<Self> {
        if capacity == 0 || capacity > MAX_CAPACITY {
            return Err(Error::InvalidCapacity(capacity));
        }
        Ok(Self {
            id,
            origin,
            destination,
            available: capacity,
            occupancy: vec![false; capacity as usize],
        })
    }

    pub fn id(&self) -> &FlightId {
        &self.id
    }

    pub fn origin(&self) -> &City {
        &self.origin
    }

    pub fn destination(&self) -> &City {
        &self.destination
    }

    pub fn capacity(&self) -> u32 {
        self.occupancy.len() as u32
    }

    pub fn available(&self) -> u32 {
        self.available
    }

    /// Whether the 1-based `seat` exists and is free.
    pub fn is_free(&self, seat: u32) -> bool {
        seat_index(seat, self.capacity()).is_some_and(|i| !self.occupancy[i])
    }

    /// Free 1-based seat numbers in ascending order.
    pub fn free_seats(&self) -> impl Iterator<Item = u32> + Clone + '_ {
        self.occupancy
            .iter()
            .enumerate()
            .filter(|(_, taken)| !**taken)
            .map(|(i, _)| i as u32 + 1)
    }

    pub fn occupied_seats(&self) -> usize {
        self.occupancy.iter().filter(|taken| **taken).count()
    }

    pub fn summary(&self) -> FlightSummary<'_> {
        FlightSummary {
            id: &self.id,
            origin: &self.origin,
            destination: &self.destination,
            capacity: self.capacity(),
            available: self.available,
        }
    }

    /// Mark `seat` taken. Returns false if it does not exist or is already taken.
    pub(crate) fn occupy(&mut self, seat: u32) -> bool {
        match seat_index(seat, self.capacity()) {
            Some(i) if !self.occupancy[i] => {
                self.occupancy[i] = true;
                self.available -= 1;
                true
            }
            _ => false,
        }
    }

    /// Mark `seat` free. Returns false if it does not exist or is already free.
    pub(crate) fn release(&mut self, seat: u32) -> bool {
        match seat_index(seat, self.capacity()) {
            Some(i) if self.occupancy[i] => {
                self.occupancy[i] = false;
                self.available += 1;
                true
            }
            _ => false,
        }
    }

    /// Rebuild from persisted counts. Occupancy is not persisted, so every
    /// seat starts free and `available` holds the stored value until the
    /// catalog reconciles it against passenger bookings.
    pub(crate) fn restored(
        id: FlightId,
        origin: City,
        destination: City,
        capacity: u32,
        available: u32,
    ) -> Result<Self> {
        let mut flight = Self::new(id, origin, destination, capacity)?;
        flight.available = available;
        Ok(flight)
    }

    /// Clear all seats and return the stored `available` for comparison.
    pub(crate) fn reset_occupancy(&mut self) -> u32 {
        let stored = self.available;
        self.occupancy.iter_mut().for_each(|taken| *taken = false);
        self.available = self.capacity();
        stored
    }
}

fn seat_index(seat: u32, capacity: u32) -> Option<usize> {
    (1..=capacity).contains(&seat).then(|| seat as usize - 1)
}

const SEED_FLIGHTS: [(&str, &str, &str, u32); 10] = [
    ("AI101", "Delhi", "Mumbai", 150),
    ("AI102", "Mumbai", "Delhi", 150),
    ("AI103", "Delhi", "Paris", 200),
    ("AI104", "Bangalore", "Milan", 200),
    ("AI105", "Delhi", "Wellington", 180),
    ("AI106", "Kolkata", "Delhi", 180),
    ("AI107", "Mumbai", "Incheon", 160),
    ("AI108", "Chennai", "Sydney", 160),
    ("AI109", "Delhi", "Hyderabad", 170),
    ("AI110", "Hyderabad", "Delhi", 170),
];

/// The sample flights every fresh catalog starts with.
pub fn seed_flights() -> Result<Vec<Flight>> {
    SEED_FLIGHTS
        .iter()
        .map(|&(id, origin, destination, capacity)| {
            Flight::new(
                FlightId::new("flight number", id)?,
                City::new("origin", origin)?,
                City::new("destination", destination)?,
                capacity,
            )
        })
        .collect()
}
