//! Quarterly grade ("calificación de trimestre") given by an administrator to
//! a user for their work in an area.

use serde::Serialize;

use crate::id::{AreaId, GradeId, UserId};
use crate::period::Period;
use crate::score::Score;
use crate::time::Timestamp;

/// A persisted grade. Unique per `(user_id, area_id, period)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuarterGrade {
    pub id: GradeId,
    pub user_id: UserId,
    pub area_id: AreaId,
    #[serde(flatten)]
    pub period: Period,
    pub score: Score,
    pub auto_calculated: bool,
    pub graded_by: Option<UserId>,
    pub graded_at: Timestamp,
}

/// A grade to upsert.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeEntry {
    pub user_id: UserId,
    pub area_id: AreaId,
    pub period: Period,
    pub score: Score,
    pub auto_calculated: bool,
    pub graded_by: UserId,
    pub graded_at: Timestamp,
}

/// Which grades to list. Empty filter means "all".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GradeFilter {
    pub user_id: Option<UserId>,
    pub area_id: Option<AreaId>,
    pub quarter: Option<crate::period::Quarter>,
    pub year: Option<crate::period::Year>,
}
