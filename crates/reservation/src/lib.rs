//! Flight reservation catalog.
//! - Flights with per-seat occupancy and passengers bound to a (flight, seat).
//! - Booking and cancellation that never leave partial state behind.
//! - Persistence as two fixed-layout record dumps (see the `records` crate).

mod booking;
pub mod catalog;
pub mod error;
pub mod flight;
pub mod passenger;
pub mod report;
pub mod roster;
pub mod store;
pub mod text;

pub use catalog::{Catalog, Reconciliation, INITIAL_FLIGHT_SLOTS, INITIAL_PASSENGER_SLOTS};
pub use error::{Error, ErrorKind, Result};
pub use flight::{seed_flights, Flight, FlightSummary, MAX_CAPACITY};
pub use passenger::{Passenger, PassengerDetails};
pub use report::{FlightTable, PassengerTable, SeatRanges};
pub use roster::Roster;
pub use store::{Dump, LoadReport, Loaded, Store, StoreConfig};
pub use text::{BoundedText, City, FlightId, PersonName, Phone};
