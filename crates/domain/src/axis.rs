//! Axes ("ejes") and sub-axes: the classification goals are grouped by,
//! plus the per-area, per-quarter tracking flags.

use serde::{Deserialize, Serialize};

use crate::error::{PlanError, ValidationError};
use crate::id::{AreaId, AxisId, SubAxisId};
use crate::period::Quarter;
use crate::time::Timestamp;

/// A strategic axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Axis {
    pub id: AxisId,
    pub name: String,
    pub description: Option<String>,
}

/// A sub-division of an [`Axis`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubAxis {
    pub id: SubAxisId,
    pub axis_id: AxisId,
    pub name: String,
}

/// An axis together with its sub-axes, as listed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AxisWithSubAxes {
    #[serde(flatten)]
    pub axis: Axis,
    pub sub_axes: Vec<SubAxis>,
}

/// Validated fields for creating or editing an [`Axis`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAxis {
    pub name: String,
    pub description: Option<String>,
}

impl NewAxis {
    /// # Errors
    ///
    /// Returns [`PlanError::Validation`] when `name` is empty.
    pub fn new(name: &str, description: Option<&str>) -> Result<Self, PlanError> {
        Ok(Self {
            name: non_empty("name", name)?,
            description: description
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
        })
    }
}

/// Validated fields for creating a [`SubAxis`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubAxis {
    pub axis_id: AxisId,
    pub name: String,
}

impl NewSubAxis {
    /// # Errors
    ///
    /// Returns [`PlanError::Validation`] when `name` is empty.
    pub fn new(axis_id: AxisId, name: &str) -> Result<Self, PlanError> {
        Ok(Self {
            axis_id,
            name: non_empty("name", name)?,
        })
    }
}

/// Whether an area has selected an axis for a quarter ("seguimiento").
///
/// Keyed on `(area_id, axis_id, quarter)`; writes are upserts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisTracking {
    pub area_id: AreaId,
    pub axis_id: AxisId,
    pub quarter: Quarter,
    pub selected: bool,
    pub updated_at: Timestamp,
}

fn non_empty(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(value.to_string())
}
