//! Flat-file persistence of the catalog.
//!
//! Flights and passengers are written to two independent record dumps. Seat
//! occupancy is not stored; it is rebuilt from the passenger bookings when a
//! catalog is restored.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use records::{decode_dump, encode_dump, FlightRecord, PassengerRecord, Record};
use tracing::{info, warn};

use crate::catalog::{Catalog, Reconciliation};
use crate::error::Result;
use crate::flight::Flight;
use crate::passenger::{Passenger, PassengerDetails};
use crate::text::BoundedText;

pub const DEFAULT_FLIGHTS_FILE: &str = "flights.dat";
pub const DEFAULT_PASSENGERS_FILE: &str = "passengers.dat";

/// Where the two dumps live.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    pub dir: PathBuf,
    pub flights_file: String,
    pub passengers_file: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            flights_file: DEFAULT_FLIGHTS_FILE.to_string(),
            passengers_file: DEFAULT_PASSENGERS_FILE.to_string(),
        }
    }
}

impl StoreConfig {
    pub fn flights_path(&self) -> PathBuf {
        self.dir.join(&self.flights_file)
    }

    pub fn passengers_path(&self) -> PathBuf {
        self.dir.join(&self.passengers_file)
    }
}

/// Outcome of reading one dump.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Loaded {
    /// The file does not exist; nothing was overlaid.
    Missing,
    /// The file held this many records.
    Records(usize),
}

impl Loaded {
    fn from_dump<T>(dump: &Option<Dump<T>>) -> Self {
        match dump {
            Some(dump) => Loaded::Records(dump.entries.len()),
            None => Loaded::Missing,
        }
    }
}

/// Entries read from one dump.
///
/// Records that frame correctly but fail field validation are skipped and
/// counted in `rejected`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dump<T> {
    pub entries: Vec<T>,
    pub rejected: usize,
}

impl<T> Dump<T> {
    fn rejected(dump: &Option<Self>) -> usize {
        dump.as_ref().map_or(0, |dump| dump.rejected)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadReport {
    pub flights: Loaded,
    pub passengers: Loaded,
    pub reconciliation: Reconciliation,
}

#[derive(Clone, Debug)]
pub struct Store {
    config: StoreConfig,
}

impl Store {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Read the flights dump. `Ok(None)` when there is no file yet.
    pub fn load_flights(&self) -> Result<Option<Dump<Flight>>> {
        let path = self.config.flights_path();
        Ok(read_dump::<FlightRecord>(&path)?
            .map(|records| validate(&path, records, flight_from_record)))
    }

    /// Read the passengers dump. `Ok(None)` when there is no file yet.
    pub fn load_passengers(&self) -> Result<Option<Dump<Passenger>>> {
        let path = self.config.passengers_path();
        Ok(read_dump::<PassengerRecord>(&path)?
            .map(|records| validate(&path, records, passenger_from_record)))
    }

    /// Overlay both dumps onto `catalog` and rebuild seat occupancy.
    ///
    /// Nothing is applied unless both dumps frame correctly. Invalid records
    /// inside a dump are dropped and counted in the reconciliation.
    pub fn load_into(&self, catalog: &mut Catalog) -> Result<LoadReport> {
        let flights = self.load_flights()?;
        let passengers = self.load_passengers()?;
        let flights_loaded = Loaded::from_dump(&flights);
        let passengers_loaded = Loaded::from_dump(&passengers);
        let rejected_flights = Dump::rejected(&flights);
        let rejected_passengers = Dump::rejected(&passengers);

        let mut reconciliation = catalog.restore(
            flights.map(|dump| dump.entries),
            passengers.map(|dump| dump.entries),
        );
        reconciliation.dropped_flights += rejected_flights;
        reconciliation.dropped_passengers += rejected_passengers;
        if !reconciliation.is_clean() {
            warn!(?reconciliation, "stored data needed repair");
        }
        Ok(LoadReport {
            flights: flights_loaded,
            passengers: passengers_loaded,
            reconciliation,
        })
    }

    /// Rename the existing dumps to `<file>.bad` so a later save keeps them.
    ///
    /// Returns the backup paths. A dump that does not exist is skipped.
    pub fn set_aside(&self) -> Result<Vec<PathBuf>> {
        let mut moved = Vec::new();
        for path in [self.config.flights_path(), self.config.passengers_path()] {
            let backup = backup_path(&path);
            match fs::rename(&path, &backup) {
                Ok(()) => {
                    warn!(from = %path.display(), to = %backup.display(), "dump set aside");
                    moved.push(backup);
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(moved)
    }

    pub fn save_flights<'a>(&self, flights: impl IntoIterator<Item = &'a Flight>) -> Result<usize> {
        let records = flights
            .into_iter()
            .map(flight_record)
            .collect::<Result<Vec<_>>>()?;
        write_dump(&self.config.flights_path(), &records)
    }

    pub fn save_passengers<'a>(
        &self,
        passengers: impl IntoIterator<Item = &'a Passenger>,
    ) -> Result<usize> {
        let records = passengers
            .into_iter()
            .map(passenger_record)
            .collect::<Result<Vec<_>>>()?;
        write_dump(&self.config.passengers_path(), &records)
    }

    /// Write both dumps, creating the data directory if needed.
    pub fn save(&self, catalog: &Catalog) -> Result<()> {
        fs::create_dir_all(&self.config.dir)?;
        self.save_flights(catalog.flights.iter())?;
        self.save_passengers(catalog.passengers.iter())?;
        Ok(())
    }
}

fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".bad");
    PathBuf::from(name)
}

fn validate<R, T>(path: &Path, records: Vec<R>, convert: impl Fn(R) -> Result<T>) -> Dump<T> {
    let mut dump = Dump {
        entries: Vec::with_capacity(records.len()),
        rejected: 0,
    };
    for (index, record) in records.into_iter().enumerate() {
        match convert(record) {
            Ok(entry) => dump.entries.push(entry),
            Err(error) => {
                warn!(path = %path.display(), index, %error, "skipping invalid record");
                dump.rejected += 1;
            }
        }
    }
    dump
}

fn read_dump<R: Record>(path: &Path) -> Result<Option<Vec<R>>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!(path = %path.display(), "no previous data");
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };
    let records = decode_dump::<R>(&bytes)?;
    info!(path = %path.display(), count = records.len(), "dump loaded");
    Ok(Some(records))
}

fn write_dump<R: Record>(path: &Path, records: &[R]) -> Result<usize> {
    let bytes = encode_dump(records)?;
    fs::write(path, bytes)?;
    info!(path = %path.display(), count = records.len(), "dump saved");
    Ok(records.len())
}

fn flight_record(flight: &Flight) -> Result<FlightRecord> {
    Ok(FlightRecord {
        number: flight.id().to_field()?,
        origin: flight.origin().to_field()?,
        destination: flight.destination().to_field()?,
        capacity: flight.capacity(),
        available: flight.available(),
    })
}

fn flight_from_record(record: FlightRecord) -> Result<Flight> {
    Flight::restored(
        BoundedText::from_field("flight number", &record.number)?,
        BoundedText::from_field("origin", &record.origin)?,
        BoundedText::from_field("destination", &record.destination)?,
        record.capacity,
        record.available,
    )
}

fn passenger_record(passenger: &Passenger) -> Result<PassengerRecord> {
    let details = &passenger.details;
    Ok(PassengerRecord {
        name: details.name.to_field()?,
        age: details.age,
        // ASCII, checked by PassengerDetails::new
        gender: details.gender as u8,
        phone: details.phone.to_field()?,
        flight_number: passenger.flight_id.to_field()?,
        seat_number: passenger.seat_number,
    })
}

fn passenger_from_record(record: PassengerRecord) -> Result<Passenger> {
    let details = PassengerDetails::new(
        BoundedText::from_field("name", &record.name)?,
        record.age,
        char::from(record.gender),
        BoundedText::from_field("phone", &record.phone)?,
    )?;
    Ok(Passenger {
        details,
        flight_id: BoundedText::from_field("flight number", &record.flight_number)?,
        seat_number: record.seat_number,
    })
}
