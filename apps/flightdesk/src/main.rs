use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use reservation::store::{DEFAULT_FLIGHTS_FILE, DEFAULT_PASSENGERS_FILE};
use reservation::{Catalog, FlightTable, PassengerTable, Store, StoreConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod console;

use console::Console;

#[derive(Debug, Parser)]
#[command(name = "flightdesk", about = "Flight reservation desk")]
struct Args {
    /// Directory holding the flight and passenger dumps
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,
    /// File name of the flights dump inside the data directory
    #[arg(long, default_value = DEFAULT_FLIGHTS_FILE)]
    flights_file: String,
    /// File name of the passengers dump inside the data directory
    #[arg(long, default_value = DEFAULT_PASSENGERS_FILE)]
    passengers_file: String,
    /// Start without the sample flights
    #[arg(long)]
    no_seed: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive menu (default)
    Run,
    /// Print the stored flights or passengers and exit
    Show {
        #[arg(value_enum)]
        listing: Listing,
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Listing {
    Flights,
    Passengers,
}

impl Args {
    fn store_config(&self) -> StoreConfig {
        StoreConfig {
            dir: self.data_dir.clone(),
            flights_file: self.flights_file.clone(),
            passengers_file: self.passengers_file.clone(),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let store = Store::new(args.store_config());

    let mut catalog = if args.no_seed {
        Catalog::new()
    } else {
        Catalog::seeded()?
    };
    match args.command.unwrap_or(Command::Run) {
        Command::Run => {
            let mut console = Console::new(io::stdin().lock(), io::stdout().lock());
            console.open(&mut catalog, &store)?;
            console.run(&mut catalog, &store)
        }
        Command::Show { listing, json } => {
            let report = store.load_into(&mut catalog).with_context(|| {
                format!(
                    "loading reservation data from {}",
                    store.config().dir.display()
                )
            })?;
            info!(?report, "catalog ready");
            render(&mut io::stdout().lock(), &catalog, listing, json)
        }
    }
}

fn render(out: &mut impl Write, catalog: &Catalog, listing: Listing, json: bool) -> Result<()> {
    match (listing, json) {
        (Listing::Flights, false) => writeln!(out, "{}", FlightTable(catalog))?,
        (Listing::Passengers, false) => writeln!(out, "{}", PassengerTable(catalog))?,
        (Listing::Flights, true) => {
            let flights: Vec<_> = catalog.flights().collect();
            serde_json::to_writer_pretty(&mut *out, &flights)?;
            writeln!(out)?;
        }
        (Listing::Passengers, true) => {
            let passengers: Vec<_> = catalog.passengers().collect();
            serde_json::to_writer_pretty(&mut *out, &passengers)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reservation::{PassengerDetails, PersonName, Phone};

    fn rendered(catalog: &Catalog, listing: Listing, json: bool) -> String {
        let mut out = Vec::new();
        render(&mut out, catalog, listing, json).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn args_default_to_working_directory_dumps() {
        let args = Args::parse_from(["flightdesk"]);
        assert_eq!(args.store_config(), StoreConfig::default());
        assert!(args.command.is_none());
        assert!(!args.no_seed);
    }

    #[test]
    fn args_accept_show_and_paths() {
        let args = Args::parse_from([
            "flightdesk",
            "--data-dir",
            "/tmp/desk",
            "--flights-file",
            "f.bin",
            "show",
            "passengers",
            "--json",
        ]);
        let config = args.store_config();
        assert_eq!(config.flights_path(), PathBuf::from("/tmp/desk/f.bin"));
        assert!(matches!(
            args.command,
            Some(Command::Show {
                listing: Listing::Passengers,
                json: true
            })
        ));
    }

    #[test]
    fn flights_json_lists_summaries() {
        let catalog = Catalog::seeded().unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&rendered(&catalog, Listing::Flights, true)).unwrap();
        let flights = value.as_array().unwrap();
        assert_eq!(flights.len(), 10);
        assert_eq!(flights[0]["id"], "AI101");
        assert_eq!(flights[0]["capacity"], 150);
        assert_eq!(flights[0]["available"], 150);
    }

    #[test]
    fn passengers_json_flattens_details() {
        let mut catalog = Catalog::seeded().unwrap();
        let details = PassengerDetails::new(
            PersonName::new("name", "Asha").unwrap(),
            30,
            'F',
            Phone::new("phone", "9990000000").unwrap(),
        )
        .unwrap();
        catalog.book_seat("AI101", details, 5).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&rendered(&catalog, Listing::Passengers, true)).unwrap();
        let passenger = &value[0];
        assert_eq!(passenger["name"], "Asha");
        assert_eq!(passenger["gender"], "F");
        assert_eq!(passenger["flight_id"], "AI101");
        assert_eq!(passenger["seat_number"], 5);
    }

    #[test]
    fn table_listing_ends_with_rule() {
        let catalog = Catalog::new();
        let out = rendered(&catalog, Listing::Passengers, false);
        assert!(out.trim_end().ends_with("-----"));
    }
}
