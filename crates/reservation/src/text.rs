//! Owned text with a byte-length bound matching its on-disk field.

use std::fmt;

use records::{CITY_LEN, FLIGHT_NUMBER_LEN, NAME_LEN, PHONE_LEN};
use serde::Serialize;

use crate::error::{Error, Result};

/// Non-empty UTF-8 text of at most `MAX` bytes, without NUL.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct BoundedText<const MAX: usize>(String);

pub type FlightId = BoundedText<FLIGHT_NUMBER_LEN>;
pub type City = BoundedText<CITY_LEN>;
pub type PersonName = BoundedText<NAME_LEN>;
pub type Phone = BoundedText<PHONE_LEN>;

impl<const MAX: usize> BoundedText<MAX> {
    /// Validate `value` for the named field.
    pub fn new(field: &'static str, value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        let reason = if value.is_empty() {
            Some("must not be empty".to_string())
        } else if value.len() > MAX {
            Some(format!("{} bytes, at most {MAX} allowed", value.len()))
        } else if value.contains('\0') {
            Some("must not contain NUL".to_string())
        } else {
            None
        };
        match reason {
            Some(reason) => Err(Error::InvalidText { field, reason }),
            None => Ok(Self(value)),
        }
    }

    pub(crate) fn from_field(field: &'static str, bytes: &[u8]) -> Result<Self> {
        Self::new(field, records::unpack_text(bytes)?)
    }

    pub(crate) fn to_field(&self) -> Result<[u8; MAX]> {
        Ok(records::pack_text(&self.0)?)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<const MAX: usize> fmt::Display for BoundedText<MAX> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl<const MAX: usize> AsRef<str> for BoundedText<MAX> {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<const MAX: usize> PartialEq<str> for BoundedText<MAX> {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}
