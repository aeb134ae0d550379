use thiserror::Error;

/// Coarse classification of [`Error`], used for reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidInput,
    Capacity,
    Io,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("flight {0} not found")]
    FlightNotFound(String),
    #[error("no passenger {name} booked on flight {flight}")]
    PassengerNotFound { name: String, flight: String },
    #[error("no booking for seat {seat} on flight {flight}")]
    BookingNotFound { flight: String, seat: u32 },
    #[error("flight {0} already exists")]
    DuplicateIdentifier(String),
    #[error("{count} passengers named {name} are booked on flight {flight}")]
    AmbiguousPassenger {
        name: String,
        flight: String,
        count: usize,
    },
    #[error("seat {seat} is not a free seat on flight {flight}")]
    InvalidSeat { flight: String, seat: u32 },
    #[error("{field}: {reason}")]
    InvalidText {
        field: &'static str,
        reason: String,
    },
    #[error("capacity {0} is outside 1..={max}", max = crate::flight::MAX_CAPACITY)]
    InvalidCapacity(u32),
    #[error("no seats available on flight {0}")]
    NoSeatsAvailable(String),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt store: {0}")]
    Codec(#[from] records::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::FlightNotFound(_)
            | Error::PassengerNotFound { .. }
            | Error::BookingNotFound { .. } => ErrorKind::NotFound,
            Error::DuplicateIdentifier(_)
            | Error::AmbiguousPassenger { .. }
            | Error::InvalidSeat { .. }
            | Error::InvalidText { .. }
            | Error::InvalidCapacity(_) => ErrorKind::InvalidInput,
            Error::NoSeatsAvailable(_) => ErrorKind::Capacity,
            Error::Io(_) | Error::Codec(_) => ErrorKind::Io,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
