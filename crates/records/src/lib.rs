//! Fixed-layout binary records for the reservation store.
//!
//! A dump is a little-endian `u32` record count followed by exactly that many
//! fixed-size records. Text fields are NUL-padded byte buffers; integers are
//! little-endian. There is no version tag and no checksum.

use deku::prelude::*;
use thiserror::Error;

pub const FLIGHT_NUMBER_LEN: usize = 10;
pub const CITY_LEN: usize = 50;
pub const NAME_LEN: usize = 50;
pub const PHONE_LEN: usize = 15;

pub const HEADER_SIZE: usize = 4;

#[derive(Debug, Error)]
pub enum Error {
    #[error("buffer too short: {0} bytes")]
    Short(usize),
    #[error("dump truncated: header announces {expected} record bytes, found {actual}")]
    Truncated { expected: usize, actual: usize },
    #[error("{0} trailing bytes after the last record")]
    Trailing(usize),
    #[error("too many records for a dump: {0}")]
    TooMany(usize),
    #[error("text is {len} bytes, field holds {max}")]
    TextTooLong { len: usize, max: usize },
    #[error("text contains a NUL byte")]
    TextNul,
    #[error("text is not valid UTF-8: {0}")]
    TextEncoding(#[from] std::str::Utf8Error),
    #[error("deku error: {0}")]
    Deku(String),
}

impl From<DekuError> for Error {
    fn from(e: DekuError) -> Self {
        Self::Deku(e.to_string())
    }
}

/// Dump header: number of records that follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, DekuRead, DekuWrite)]
#[deku(endian = "little")]
pub struct DumpHeader {
    pub count: u32,
}

/// On-disk flight. The seat occupancy is not part of the record.
///
/// | field       | bytes |
/// |-------------|-------|
/// | number      | 10    |
/// | origin      | 50    |
/// | destination | 50    |
/// | capacity    | 4     |
/// | available   | 4     |
#[derive(Debug, Clone, PartialEq, Eq, DekuRead, DekuWrite)]
#[deku(endian = "little")]
pub struct FlightRecord {
    pub number: [u8; FLIGHT_NUMBER_LEN],
    pub origin: [u8; CITY_LEN],
    pub destination: [u8; CITY_LEN],
    pub capacity: u32,
    pub available: u32,
}

/// On-disk passenger booking.
///
/// | field         | bytes |
/// |---------------|-------|
/// | name          | 50    |
/// | age           | 4     |
/// | gender        | 1     |
/// | phone         | 15    |
/// | flight_number | 10    |
/// | seat_number   | 4     |
#[derive(Debug, Clone, PartialEq, Eq, DekuRead, DekuWrite)]
#[deku(endian = "little")]
pub struct PassengerRecord {
    pub name: [u8; NAME_LEN],
    pub age: u32,
    pub gender: u8,
    pub phone: [u8; PHONE_LEN],
    pub flight_number: [u8; FLIGHT_NUMBER_LEN],
    pub seat_number: u32,
}

/// A record with a fixed encoded size.
pub trait Record: Sized {
    const SIZE: usize;

    fn decode(input: &[u8]) -> Result<Self, Error>;

    fn encode(&self) -> Result<Vec<u8>, Error>;
}

impl Record for FlightRecord {
    const SIZE: usize = FLIGHT_NUMBER_LEN + 2 * CITY_LEN + 4 + 4;

    fn decode(input: &[u8]) -> Result<Self, Error> {
        if input.len() < Self::SIZE {
            return Err(Error::Short(input.len()));
        }
        let (_, record) = FlightRecord::from_bytes((input, 0))?;
        Ok(record)
    }

    fn encode(&self) -> Result<Vec<u8>, Error> {
        Ok(self.to_bytes()?)
    }
}

impl Record for PassengerRecord {
    const SIZE: usize = NAME_LEN + 4 + 1 + PHONE_LEN + FLIGHT_NUMBER_LEN + 4;

    fn decode(input: &[u8]) -> Result<Self, Error> {
        if input.len() < Self::SIZE {
            return Err(Error::Short(input.len()));
        }
        let (_, record) = PassengerRecord::from_bytes((input, 0))?;
        Ok(record)
    }

    fn encode(&self) -> Result<Vec<u8>, Error> {
        Ok(self.to_bytes()?)
    }
}

/// Encode a count header followed by every record, in order.
pub fn encode_dump<R: Record>(records: &[R]) -> Result<Vec<u8>, Error> {
    let count = u32::try_from(records.len()).map_err(|_| Error::TooMany(records.len()))?;
    let mut out = Vec::with_capacity(HEADER_SIZE + records.len() * R::SIZE);
    out.extend(DumpHeader { count }.to_bytes()?);
    for record in records {
        out.extend(record.encode()?);
    }
    Ok(out)
}

/// Decode a dump. The body must hold exactly the announced number of records.
pub fn decode_dump<R: Record>(input: &[u8]) -> Result<Vec<R>, Error> {
    if input.len() < HEADER_SIZE {
        return Err(Error::Short(input.len()));
    }
    let (_, header) = DumpHeader::from_bytes((input, 0))?;
    let body = &input[HEADER_SIZE..];
    let count = header.count as usize;
    let expected = count
        .checked_mul(R::SIZE)
        .ok_or(Error::TooMany(count))?;
    if body.len() < expected {
        return Err(Error::Truncated {
            expected,
            actual: body.len(),
        });
    }
    if body.len() > expected {
        return Err(Error::Trailing(body.len() - expected));
    }

    let mut records = Vec::with_capacity(count);
    for chunk in body.chunks_exact(R::SIZE) {
        records.push(R::decode(chunk)?);
    }
    Ok(records)
}

/// Copy `text` into a NUL-padded buffer of `N` bytes.
pub fn pack_text<const N: usize>(text: &str) -> Result<[u8; N], Error> {
    let bytes = text.as_bytes();
    if bytes.len() > N {
        return Err(Error::TextTooLong {
            len: bytes.len(),
            max: N,
        });
    }
    if bytes.contains(&0) {
        return Err(Error::TextNul);
    }
    let mut field = [0u8; N];
    field[..bytes.len()].copy_from_slice(bytes);
    Ok(field)
}

/// Read a NUL-padded buffer back into text. Everything after the first NUL is padding.
pub fn unpack_text(field: &[u8]) -> Result<String, Error> {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    Ok(std::str::from_utf8(&field[..end])?.to_owned())
}
