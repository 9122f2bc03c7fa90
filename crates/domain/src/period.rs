//! Reporting periods: quarters ("trimestres") and years.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A fiscal quarter, 1 through 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Quarter(u8);

impl Quarter {
    /// Every quarter in order.
    pub const ALL: [Self; 4] = [Self(1), Self(2), Self(3), Self(4)];

    /// Validate a raw quarter number.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidQuarter`] outside `1..=4`.
    pub fn new(value: i64) -> Result<Self, ValidationError> {
        match u8::try_from(value) {
            Ok(q @ 1..=4) => Ok(Self(q)),
            _ => Err(ValidationError::InvalidQuarter(value)),
        }
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Quarter {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quarter> for i64 {
    fn from(value: Quarter) -> Self {
        i64::from(value.0)
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{}", self.0)
    }
}

/// A calendar year within the range the organisation plans for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Year(i32);

impl Year {
    pub const MIN: i32 = 2000;
    pub const MAX: i32 = 2100;

    /// Validate a raw year.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidYear`] outside `MIN..=MAX`.
    pub fn new(value: i64) -> Result<Self, ValidationError> {
        i32::try_from(value)
            .ok()
            .filter(|y| (Self::MIN..=Self::MAX).contains(y))
            .map(Self)
            .ok_or(ValidationError::InvalidYear {
                value,
                min: Self::MIN,
                max: Self::MAX,
            })
    }

    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl TryFrom<i64> for Year {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Year> for i64 {
    fn from(value: Year) -> Self {
        i64::from(value.0)
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A quarter of a specific year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    pub quarter: Quarter,
    pub year: Year,
}

impl Period {
    #[must_use]
    pub const fn new(quarter: Quarter, year: Year) -> Self {
        Self { quarter, year }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.year, self.quarter)
    }
}
