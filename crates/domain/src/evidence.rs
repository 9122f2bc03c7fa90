//! Evidence ("evidencia"): the file a user submits to prove progress on a
//! goal in a given quarter, and the administrator's review of it.
//!
//! There is at most one evidence record per [`EvidenceKey`]. An administrator
//! may open an empty slot ("buzón") for a key ahead of time; the user's
//! submission then fills that slot. Resubmitting replaces the file and clears
//! any earlier review.

use serde::{Deserialize, Serialize};

use crate::error::{PlanError, ValidationError};
use crate::id::{AreaId, EvidenceId, GoalId, UserId, WindowId};
use crate::period::Period;
use crate::score::Score;
use crate::time::Timestamp;

/// The natural key of an evidence record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EvidenceKey {
    pub goal_id: GoalId,
    pub user_id: UserId,
    #[serde(flatten)]
    pub period: Period,
}

/// Metadata of an uploaded file. The file itself lives in object storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceFile {
    pub url: String,
    pub name: String,
    pub mime_type: String,
    pub size_bytes: i64,
}

impl EvidenceFile {
    /// # Errors
    ///
    /// Returns [`PlanError::Validation`] for blank fields or a negative size.
    pub fn new(
        url: &str,
        name: &str,
        mime_type: &str,
        size_bytes: i64,
    ) -> Result<Self, PlanError> {
        let field = |label: &'static str, value: &str| {
            let value = value.trim();
            if value.is_empty() {
                Err(ValidationError::EmptyField(label))
            } else {
                Ok(value.to_string())
            }
        };
        if size_bytes < 0 {
            return Err(ValidationError::NegativeFileSize.into());
        }
        Ok(Self {
            url: field("file url", url)?,
            name: field("file name", name)?,
            mime_type: field("mime type", mime_type)?,
            size_bytes,
        })
    }
}

/// A persisted evidence record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evidence {
    pub id: EvidenceId,
    #[serde(flatten)]
    pub key: EvidenceKey,
    pub file: Option<EvidenceFile>,
    pub score: Option<Score>,
    pub observation: Option<String>,
    pub window_id: Option<WindowId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Evidence {
    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.file.is_some()
    }

    #[must_use]
    pub fn is_graded(&self) -> bool {
        self.score.is_some()
    }

    /// Check that the record can be reviewed.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EvidenceNotSubmitted`] for an empty slot.
    pub fn ensure_reviewable(&self) -> Result<(), ValidationError> {
        if self.is_submitted() {
            Ok(())
        } else {
            Err(ValidationError::EvidenceNotSubmitted)
        }
    }
}

/// A file submission for a key, ready to be upserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvidenceSubmission {
    pub key: EvidenceKey,
    pub file: EvidenceFile,
    pub window_id: Option<WindowId>,
    pub submitted_at: Timestamp,
}

/// An administrator's grade and comment on a submitted file.
#[derive(Debug, Clone, PartialEq)]
pub struct EvidenceReview {
    pub score: Score,
    pub observation: Option<String>,
}

impl EvidenceReview {
    #[must_use]
    pub fn new(score: Score, observation: Option<&str>) -> Self {
        Self {
            score,
            observation: observation
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string),
        }
    }
}

/// Which evidence to list. Empty filter means "all".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvidenceFilter {
    pub user_id: Option<UserId>,
    pub goal_id: Option<GoalId>,
    pub area_id: Option<AreaId>,
    pub quarter: Option<crate::period::Quarter>,
    pub year: Option<crate::period::Year>,
}

/// Result of opening evidence slots in bulk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SlotSummary {
    pub created: u64,
    pub existing: u64,
}
