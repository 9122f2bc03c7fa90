//! Grades on a 0–100 scale.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A finite score between 0 and 100 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Score(f64);

impl Score {
    pub const MIN: f64 = 0.0;
    pub const MAX: f64 = 100.0;

    /// Validate a raw score.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ScoreOutOfRange`] for NaN, infinities and
    /// values outside `0..=100`.
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        if value.is_finite() && (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ValidationError::ScoreOutOfRange(value))
        }
    }

    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }

    /// Average a set of scores, rounded to two decimals.
    ///
    /// Returns `None` for an empty input.
    #[must_use]
    pub fn average(scores: &[Score]) -> Option<Score> {
        if scores.is_empty() {
            return None;
        }
        let sum: f64 = scores.iter().map(|s| s.0).sum();
        #[allow(clippy::cast_precision_loss)]
        let mean = sum / scores.len() as f64;
        Some(Self::rounded(mean))
    }

    /// Round an already-valid mean (e.g. from SQL `AVG`) to two decimals and clamp.
    #[must_use]
    pub fn rounded(value: f64) -> Score {
        Self(((value * 100.0).round() / 100.0).clamp(Self::MIN, Self::MAX))
    }
}

impl TryFrom<f64> for Score {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Score> for f64 {
    fn from(value: Score) -> Self {
        value.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
