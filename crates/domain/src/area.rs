//! Area: an organizational department that users and goals belong to.

use serde::{Deserialize, Serialize};

use crate::error::{ConflictError, PlanError, ValidationError};
use crate::id::AreaId;

/// A department such as "Finanzas" or "Talento Humano".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    pub id: AreaId,
    pub name: String,
    pub description: Option<String>,
}

impl Area {
    /// Replace name and description with the values from `draft`.
    pub fn apply(&mut self, draft: NewArea) {
        self.name = draft.name;
        self.description = draft.description;
    }
}

/// Validated fields for creating or editing an [`Area`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArea {
    pub name: String,
    pub description: Option<String>,
}

impl NewArea {
    /// Trim and validate the input. A blank description becomes `None`.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::Validation`] when `name` is empty.
    pub fn new(name: &str, description: Option<&str>) -> Result<Self, PlanError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyField("name").into());
        }
        Ok(Self {
            name: name.to_string(),
            description: description
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
        })
    }
}

/// How many records still point at an area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AreaUsage {
    pub users: i64,
    pub goals: i64,
}

impl AreaUsage {
    /// Fail if anything still references the area.
    ///
    /// # Errors
    ///
    /// Returns [`ConflictError::AreaInUse`] when `users` or `goals` is non-zero.
    pub fn ensure_unused(self) -> Result<(), ConflictError> {
        if self.users > 0 || self.goals > 0 {
            return Err(ConflictError::AreaInUse {
                users: self.users,
                goals: self.goals,
            });
        }
        Ok(())
    }
}
