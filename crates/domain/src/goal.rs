//! Goal ("informe"): an objective a user commits to within their area.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PlanError, ValidationError};
use crate::id::{AreaId, AxisId, GoalId, SubAxisId, UserId};
use crate::time::Timestamp;

/// Progress of a goal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GoalStatus {
    #[default]
    #[serde(rename = "pendiente")]
    Pending,
    #[serde(rename = "en_progreso")]
    InProgress,
    #[serde(rename = "completado")]
    Completed,
}

impl GoalStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pendiente",
            Self::InProgress => "en_progreso",
            Self::Completed => "completado",
        }
    }
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GoalStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pendiente" => Ok(Self::Pending),
            "en_progreso" => Ok(Self::InProgress),
            "completado" => Ok(Self::Completed),
            other => Err(ValidationError::InvalidValue {
                field: "goal status",
                value: other.to_string(),
            }),
        }
    }
}

/// A persisted goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,
    pub user_id: UserId,
    pub area_id: AreaId,
    pub axis_id: Option<AxisId>,
    pub sub_axis_id: Option<SubAxisId>,
    pub text: String,
    pub status: GoalStatus,
    pub created_at: Timestamp,
}

impl Goal {
    /// Apply a partial edit.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyField`] when the new text is blank.
    pub fn apply(&mut self, update: GoalUpdate) -> Result<(), ValidationError> {
        if let Some(text) = update.text {
            let text = text.trim();
            if text.is_empty() {
                return Err(ValidationError::EmptyField("text"));
            }
            self.text = text.to_string();
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(axis_id) = update.axis_id {
            self.axis_id = axis_id;
        }
        if let Some(sub_axis_id) = update.sub_axis_id {
            self.sub_axis_id = sub_axis_id;
        }
        Ok(())
    }
}

/// Partial edit of a [`Goal`].
///
/// For the axis fields, `Some(None)` clears the value and `None` leaves it alone.
#[derive(Debug, Clone, Default)]
pub struct GoalUpdate {
    pub text: Option<String>,
    pub status: Option<GoalStatus>,
    pub axis_id: Option<Option<AxisId>>,
    pub sub_axis_id: Option<Option<SubAxisId>>,
}

/// A validated goal ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGoal {
    pub user_id: UserId,
    pub area_id: AreaId,
    pub axis_id: Option<AxisId>,
    pub sub_axis_id: Option<SubAxisId>,
    pub text: String,
    pub status: GoalStatus,
    pub created_at: Timestamp,
}

impl NewGoal {
    /// # Errors
    ///
    /// Returns [`PlanError::Validation`] when `text` is blank.
    pub fn new(
        user_id: UserId,
        area_id: AreaId,
        text: &str,
        axis_id: Option<AxisId>,
        sub_axis_id: Option<SubAxisId>,
    ) -> Result<Self, PlanError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyField("text").into());
        }
        Ok(Self {
            user_id,
            area_id,
            axis_id,
            sub_axis_id,
            text: text.to_string(),
            status: GoalStatus::Pending,
            created_at: crate::time::now(),
        })
    }
}

/// Which goals to list. Empty filter means "all".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GoalFilter {
    pub user_id: Option<UserId>,
    pub area_id: Option<AreaId>,
}
