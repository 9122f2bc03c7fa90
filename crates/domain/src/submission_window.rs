//! Submission window ("configuración de envío"): the time range during which
//! evidence for a quarter may be submitted.

use serde::Serialize;

use crate::error::{PlanError, ValidationError};
use crate::id::WindowId;
use crate::period::Period;
use crate::time::Timestamp;

/// A persisted window. At most one per [`Period`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionWindow {
    pub id: WindowId,
    #[serde(flatten)]
    pub period: Period,
    pub opens_at: Timestamp,
    pub closes_at: Timestamp,
    pub created_at: Timestamp,
}

impl SubmissionWindow {
    /// Whether `at` falls inside `[opens_at, closes_at]`.
    #[must_use]
    pub fn is_open_at(&self, at: Timestamp) -> bool {
        self.opens_at <= at && at <= self.closes_at
    }
}

/// A validated window ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubmissionWindow {
    pub period: Period,
    pub opens_at: Timestamp,
    pub closes_at: Timestamp,
}

impl NewSubmissionWindow {
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidWindowRange`] unless `opens_at < closes_at`.
    pub fn new(period: Period, opens_at: Timestamp, closes_at: Timestamp) -> Result<Self, PlanError> {
        if opens_at >= closes_at {
            return Err(ValidationError::InvalidWindowRange.into());
        }
        Ok(Self {
            period,
            opens_at,
            closes_at,
        })
    }
}
