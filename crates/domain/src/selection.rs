//! Quarter selection: a user's opt-in flag for a quarter of a year.

use serde::Serialize;

use crate::id::UserId;
use crate::period::Period;
use crate::time::Timestamp;

/// Keyed on `(user_id, period)`; writes are upserts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuarterSelection {
    pub user_id: UserId,
    #[serde(flatten)]
    pub period: Period,
    pub selected: bool,
    pub updated_at: Timestamp,
}
