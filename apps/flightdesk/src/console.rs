//! Interactive menu over any line-oriented input and output.

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use anyhow::Context;
use reservation::{
    Catalog, City, FlightId, FlightTable, LoadReport, Loaded, PassengerDetails, PassengerTable,
    PersonName, Phone, SeatRanges, Store,
};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuChoice {
    AddFlight,
    BookTicket,
    CancelTicket,
    ListFlights,
    ListPassengers,
    Exit,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().parse::<u32>().ok()? {
            1 => Some(Self::AddFlight),
            2 => Some(Self::BookTicket),
            3 => Some(Self::CancelTicket),
            4 => Some(Self::ListFlights),
            5 => Some(Self::ListPassengers),
            6 => Some(Self::Exit),
            _ => None,
        }
    }
}

/// Why a menu action stopped early.
#[derive(Debug, Error)]
enum Abort {
    #[error(transparent)]
    Rejected(#[from] reservation::Error),
    #[error("'{input}' is not a valid {field}")]
    Malformed { field: &'static str, input: String },
    #[error("input closed")]
    Closed,
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    #[cfg(test)]
    fn into_output(self) -> W {
        self.output
    }

    /// Load the stored catalog and tell the user what was found.
    ///
    /// A dump that cannot be read does not end the session. The error is
    /// shown, the dumps are renamed to `.bad` so the next save cannot
    /// overwrite them, and the session goes on with `catalog` unchanged.
    pub fn open(&mut self, catalog: &mut Catalog, store: &Store) -> io::Result<()> {
        let error = match store.load_into(catalog) {
            Ok(report) => {
                info!(?report, "catalog ready");
                return self.announce(&report);
            }
            Err(e) => e,
        };
        warn!(%error, "stored data unreadable");
        writeln!(self.output, "Could not load stored data: {error}")?;
        match store.set_aside() {
            Ok(moved) => {
                for path in moved {
                    writeln!(self.output, "Unreadable data kept as {}.", path.display())?;
                }
            }
            Err(e) => writeln!(self.output, "Could not back up stored data: {e}")?,
        }
        writeln!(self.output, "Continuing without stored data.")
    }

    fn announce(&mut self, report: &LoadReport) -> io::Result<()> {
        match report.flights {
            Loaded::Missing => writeln!(self.output, "No previous flight data available.")?,
            Loaded::Records(n) => writeln!(self.output, "Loaded {n} flights.")?,
        }
        match report.passengers {
            Loaded::Missing => writeln!(self.output, "No previous passenger data available.")?,
            Loaded::Records(n) => writeln!(self.output, "Loaded {n} passengers.")?,
        }
        let repair = &report.reconciliation;
        if repair.dropped_flights > 0 {
            writeln!(
                self.output,
                "Warning: {} stored flight records were invalid or duplicated and have been dropped.",
                repair.dropped_flights
            )?;
        }
        if repair.dropped_passengers > 0 {
            writeln!(
                self.output,
                "Warning: {} stored bookings were inconsistent and have been dropped.",
                repair.dropped_passengers
            )?;
        }
        if repair.corrected_flights > 0 {
            writeln!(
                self.output,
                "Warning: seat availability was corrected on {} flights.",
                repair.corrected_flights
            )?;
        }
        Ok(())
    }

    /// Run the menu until the user exits or input ends. Both save the catalog.
    pub fn run(&mut self, catalog: &mut Catalog, store: &Store) -> anyhow::Result<()> {
        loop {
            self.show_menu()?;
            let Some(line) = self.read_line()? else {
                writeln!(self.output)?;
                info!("input closed, saving before exit");
                store
                    .save(catalog)
                    .context("saving reservation data on end of input")?;
                return self.goodbye();
            };

            let step = match MenuChoice::parse(&line) {
                Some(MenuChoice::AddFlight) => self.add_flight(catalog),
                Some(MenuChoice::BookTicket) => self.book_ticket(catalog),
                Some(MenuChoice::CancelTicket) => self.cancel_ticket(catalog),
                Some(MenuChoice::ListFlights) => self.list_flights(catalog),
                Some(MenuChoice::ListPassengers) => self.list_passengers(catalog),
                Some(MenuChoice::Exit) => match store.save(catalog) {
                    Ok(()) => {
                        writeln!(self.output, "Flight and passenger data saved.")?;
                        return self.goodbye();
                    }
                    Err(e) => {
                        writeln!(self.output, "Could not save data: {e}")?;
                        Ok(())
                    }
                },
                None => {
                    writeln!(self.output, "Invalid selection, please try again.")?;
                    Ok(())
                }
            };

            match step {
                Ok(()) => {}
                // the next menu read sees end of input and exits
                Err(Abort::Closed) => {}
                Err(Abort::Io(e)) => return Err(e.into()),
                Err(e) => {
                    debug!(error = %e, "menu action rejected");
                    writeln!(self.output, "{}", capitalize(&e.to_string()))?;
                }
            }
        }
    }

    fn show_menu(&mut self) -> io::Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "Welcome to the Flight Reservation System")?;
        writeln!(self.output, "1. Add a New Flight")?;
        writeln!(self.output, "2. Book a Ticket")?;
        writeln!(self.output, "3. Cancel a Ticket")?;
        writeln!(self.output, "4. View Flights")?;
        writeln!(self.output, "5. View Passengers")?;
        writeln!(self.output, "6. Save and Exit")?;
        write!(self.output, "Please select an option: ")?;
        self.output.flush()
    }

    fn goodbye(&mut self) -> anyhow::Result<()> {
        writeln!(self.output, "Thank you for using the system. Goodbye!")?;
        self.output.flush()?;
        Ok(())
    }

    fn add_flight(&mut self, catalog: &mut Catalog) -> Result<(), Abort> {
        let id = FlightId::new("flight number", self.prompt("Enter flight number")?)?;
        if catalog.find_flight(id.as_str()).is_ok() {
            return Err(reservation::Error::DuplicateIdentifier(id.to_string()).into());
        }
        let origin = City::new("origin", self.prompt("Enter origin")?)?;
        let destination = City::new("destination", self.prompt("Enter destination")?)?;
        let capacity = self.prompt_number("Enter maximum seating capacity", "capacity")?;

        catalog.add_flight(id, origin, destination, capacity)?;
        writeln!(self.output, "Flight successfully added.")?;
        Ok(())
    }

    fn book_ticket(&mut self, catalog: &mut Catalog) -> Result<(), Abort> {
        let flight_id = self.prompt("Enter the flight number")?;
        let flight = catalog.find_flight(&flight_id)?;
        if flight.available() == 0 {
            return Err(reservation::Error::NoSeatsAvailable(flight_id).into());
        }
        writeln!(self.output, "Available seats: {}", SeatRanges(flight.free_seats()))?;

        let seat = self.prompt_number("Please choose a seat", "seat number")?;
        catalog.check_seat(&flight_id, seat)?;

        let name = PersonName::new("name", self.prompt("Enter passenger name")?)?;
        let age = self.prompt_number("Enter passenger age", "age")?;
        let gender = self.prompt_gender()?;
        let phone = Phone::new("phone", self.prompt("Enter phone number")?)?;
        let details = PassengerDetails::new(name, age, gender, phone)?;

        let passenger = catalog.book_seat(&flight_id, details, seat)?;
        writeln!(
            self.output,
            "Ticket successfully booked! Your seat: {}",
            passenger.seat_number
        )?;
        Ok(())
    }

    fn cancel_ticket(&mut self, catalog: &mut Catalog) -> Result<(), Abort> {
        let name = self.prompt("Enter passenger name")?;
        let flight_id = self.prompt("Enter flight number")?;

        let cancelled = match catalog.cancel_seat(&name, &flight_id) {
            Err(reservation::Error::AmbiguousPassenger { count, .. }) => {
                writeln!(
                    self.output,
                    "{count} passengers named {name} are booked on flight {flight_id}."
                )?;
                let seat = self.prompt_number("Enter the seat number to cancel", "seat number")?;
                let holds_seat = catalog
                    .find_booking(&flight_id, seat)
                    .is_some_and(|p| p.name().as_str() == name);
                if !holds_seat {
                    return Err(reservation::Error::BookingNotFound {
                        flight: flight_id,
                        seat,
                    }
                    .into());
                }
                catalog.cancel_booking(&flight_id, seat)?
            }
            other => other?,
        };
        writeln!(
            self.output,
            "Ticket cancellation successful (seat {} on {}).",
            cancelled.seat_number, cancelled.flight_id
        )?;
        Ok(())
    }

    fn list_flights(&mut self, catalog: &Catalog) -> Result<(), Abort> {
        writeln!(self.output, "\nCurrent Available Flights:")?;
        writeln!(self.output, "{}", FlightTable(catalog))?;
        Ok(())
    }

    fn list_passengers(&mut self, catalog: &Catalog) -> Result<(), Abort> {
        writeln!(self.output, "\nList of Passengers:")?;
        writeln!(self.output, "{}", PassengerTable(catalog))?;
        Ok(())
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn prompt(&mut self, label: &str) -> Result<String, Abort> {
        write!(self.output, "{label}: ")?;
        self.output.flush()?;
        self.read_line()?.ok_or(Abort::Closed)
    }

    fn prompt_number<T: FromStr>(&mut self, label: &str, field: &'static str) -> Result<T, Abort> {
        let input = self.prompt(label)?;
        input
            .parse()
            .map_err(|_| Abort::Malformed { field, input })
    }

    fn prompt_gender(&mut self) -> Result<char, Abort> {
        let input = self.prompt("Enter gender (M/F)")?;
        let mut chars = input.chars();
        match (chars.next(), chars.next()) {
            (Some(gender), None) => Ok(gender),
            _ => Err(Abort::Malformed {
                field: "gender",
                input,
            }),
        }
    }
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reservation::{Reconciliation, StoreConfig};
    use std::fs;
    use std::io::Cursor;

    fn session(script: &str, catalog: &mut Catalog, store: &Store) -> String {
        let mut console = Console::new(Cursor::new(script.as_bytes().to_vec()), Vec::new());
        console.run(catalog, store).unwrap();
        String::from_utf8(console.into_output()).unwrap()
    }

    fn temp_store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(StoreConfig {
            dir: dir.path().to_path_buf(),
            ..StoreConfig::default()
        });
        (dir, store)
    }

    #[test]
    fn menu_choices_parse() {
        assert_eq!(MenuChoice::parse(" 2 "), Some(MenuChoice::BookTicket));
        assert_eq!(MenuChoice::parse("6"), Some(MenuChoice::Exit));
        assert_eq!(MenuChoice::parse("0"), None);
        assert_eq!(MenuChoice::parse("7"), None);
        assert_eq!(MenuChoice::parse("two"), None);
    }

    #[test]
    fn book_list_and_exit_saves() {
        let (_dir, store) = temp_store();
        let mut catalog = Catalog::seeded().unwrap();
        let out = session(
            "2\nAI101\n5\nAsha\n30\nF\n9990000000\n5\n6\n",
            &mut catalog,
            &store,
        );

        assert!(out.contains("Available seats: 1-150"));
        assert!(out.contains("Ticket successfully booked! Your seat: 5"));
        assert!(out.contains("Asha            30  F      9990000000      AI101       5"));
        assert!(out.contains("Flight and passenger data saved."));
        assert!(out.ends_with("Thank you for using the system. Goodbye!\n"));
        assert_eq!(catalog.find_flight("AI101").unwrap().available(), 149);

        let mut reloaded = Catalog::seeded().unwrap();
        store.load_into(&mut reloaded).unwrap();
        assert_eq!(reloaded.passenger_count(), 1);
    }

    #[test]
    fn invalid_choices_redisplay_the_menu() {
        let (_dir, store) = temp_store();
        let mut catalog = Catalog::seeded().unwrap();
        let out = session("9\nabc\n6\n", &mut catalog, &store);
        assert_eq!(out.matches("Invalid selection, please try again.").count(), 2);
        assert_eq!(out.matches("Please select an option: ").count(), 3);
    }

    #[test]
    fn taken_seat_is_reported_and_menu_continues() {
        let (_dir, store) = temp_store();
        let mut catalog = Catalog::seeded().unwrap();
        let out = session(
            "2\nAI101\n5\nAsha\n30\nF\n9990000000\n2\nAI101\n5\n6\n",
            &mut catalog,
            &store,
        );
        assert!(out.contains("Available seats: 1-4, 6-150"));
        assert!(out.contains("Seat 5 is not a free seat on flight AI101"));
        assert_eq!(catalog.passenger_count(), 1);
    }

    #[test]
    fn unknown_flight_and_bad_numbers_abort_the_action() {
        let (_dir, store) = temp_store();
        let mut catalog = Catalog::seeded().unwrap();
        let out = session(
            "2\nXX000\n1\nNEW1\nPune\nGoa\nmany\n6\n",
            &mut catalog,
            &store,
        );
        assert!(out.contains("Flight XX000 not found"));
        assert!(out.contains("'many' is not a valid capacity"));
        assert_eq!(catalog.flight_count(), 10);
    }

    #[test]
    fn add_flight_then_cancel_round_trip() {
        let (_dir, store) = temp_store();
        let mut catalog = Catalog::seeded().unwrap();
        let out = session(
            "1\nSM1\nPune\nGoa\n2\n2\nSM1\n2\nRavi\n41\nM\n555\n3\nRavi\nSM1\n6\n",
            &mut catalog,
            &store,
        );
        assert!(out.contains("Flight successfully added."));
        assert!(out.contains("Ticket cancellation successful (seat 2 on SM1)."));
        let flight = catalog.find_flight("SM1").unwrap();
        assert_eq!((flight.capacity(), flight.available()), (2, 2));
        assert_eq!(catalog.passenger_count(), 0);
    }

    #[test]
    fn duplicate_flight_is_refused_before_more_questions() {
        let (_dir, store) = temp_store();
        let mut catalog = Catalog::seeded().unwrap();
        let out = session("1\nAI101\n6\n", &mut catalog, &store);
        assert!(out.contains("Flight AI101 already exists"));
        assert!(!out.contains("Enter origin"));
    }

    #[test]
    fn ambiguous_cancel_asks_for_the_seat() {
        let (_dir, store) = temp_store();
        let mut catalog = Catalog::seeded().unwrap();
        let out = session(
            "2\nAI102\n1\nAsha\n30\nF\n1\n\
             2\nAI102\n2\nAsha\n52\nF\n2\n\
             3\nAsha\nAI102\n2\n6\n",
            &mut catalog,
            &store,
        );
        assert!(out.contains("2 passengers named Asha are booked on flight AI102."));
        assert!(out.contains("Ticket cancellation successful (seat 2 on AI102)."));
        assert!(catalog.find_booking("AI102", 1).is_some());
        assert!(catalog.find_booking("AI102", 2).is_none());
    }

    #[test]
    fn end_of_input_mid_action_still_saves() {
        let (_dir, store) = temp_store();
        let mut catalog = Catalog::seeded().unwrap();
        let out = session("2\nAI101\n", &mut catalog, &store);
        assert!(out.ends_with("Thank you for using the system. Goodbye!\n"));
        assert_eq!(catalog.passenger_count(), 0);
        assert!(store.config().flights_path().exists());
    }

    #[test]
    fn open_reports_missing_data() {
        let (_dir, store) = temp_store();
        let mut catalog = Catalog::seeded().unwrap();
        let mut console = Console::new(Cursor::new(Vec::new()), Vec::new());
        console.open(&mut catalog, &store).unwrap();
        let out = String::from_utf8(console.into_output()).unwrap();
        assert_eq!(
            out,
            "No previous flight data available.\nNo previous passenger data available.\n"
        );
    }

    #[test]
    fn announce_reports_every_repair() {
        let report = LoadReport {
            flights: Loaded::Records(2),
            passengers: Loaded::Records(3),
            reconciliation: Reconciliation {
                dropped_flights: 1,
                dropped_passengers: 2,
                corrected_flights: 1,
            },
        };
        let mut console = Console::new(Cursor::new(Vec::new()), Vec::new());
        console.announce(&report).unwrap();
        let out = String::from_utf8(console.into_output()).unwrap();
        assert!(out.contains("Loaded 2 flights."));
        assert!(out.contains(
            "Warning: 1 stored flight records were invalid or duplicated and have been dropped."
        ));
        assert!(out.contains("Warning: 2 stored bookings were inconsistent and have been dropped."));
        assert!(out.contains("Warning: seat availability was corrected on 1 flights."));
    }

    #[test]
    fn corrupt_flights_dump_is_kept_and_menu_runs() {
        let (dir, store) = temp_store();
        let corrupt = [9, 0, 0, 0, 1, 2, 3];
        fs::write(store.config().flights_path(), corrupt).unwrap();

        let mut catalog = Catalog::seeded().unwrap();
        let mut console = Console::new(Cursor::new(b"4\n6\n".to_vec()), Vec::new());
        console.open(&mut catalog, &store).unwrap();
        console.run(&mut catalog, &store).unwrap();
        let out = String::from_utf8(console.into_output()).unwrap();

        assert!(out.contains("Could not load stored data: corrupt store"));
        assert!(out.contains("Continuing without stored data."));
        assert!(out.contains("AI101"));
        assert!(out.contains("Flight and passenger data saved."));

        let backup = dir.path().join("flights.dat.bad");
        assert_eq!(fs::read(backup).unwrap(), corrupt);
        let mut reloaded = Catalog::new();
        store.load_into(&mut reloaded).unwrap();
        assert_eq!(reloaded.flight_count(), 10);
    }

    #[test]
    fn failed_save_keeps_menu_open() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-directory");
        fs::write(&blocker, b"x").unwrap();
        let store = Store::new(StoreConfig {
            dir: blocker,
            ..StoreConfig::default()
        });

        let mut catalog = Catalog::seeded().unwrap();
        let mut console = Console::new(Cursor::new(b"6\n".to_vec()), Vec::new());
        // the save on end of input fails as well
        assert!(console.run(&mut catalog, &store).is_err());
        let out = String::from_utf8(console.into_output()).unwrap();
        assert!(out.contains("Could not save data"));
        assert_eq!(out.matches("Please select an option: ").count(), 2);
        assert!(!out.contains("Goodbye"));
    }

    #[test]
    fn capitalize_first_letter() {
        assert_eq!(capitalize("flight X not found"), "Flight X not found");
        assert_eq!(capitalize(""), "");
    }
}
