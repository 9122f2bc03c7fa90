//! Evidence service: slots ("buzones"), submissions and reviews.

use plan_accion_domain::error::{AuthError, ConflictError, PlanError, ValidationError};
use plan_accion_domain::evidence::{
    Evidence, EvidenceFile, EvidenceFilter, EvidenceKey, EvidenceReview, EvidenceSubmission,
    SlotSummary,
};
use plan_accion_domain::goal::{Goal, GoalFilter};
use plan_accion_domain::id::{AreaId, EvidenceId, GoalId};
use plan_accion_domain::period::Period;
use plan_accion_domain::time;
use plan_accion_domain::user::User;

use super::access::require_owner_or_admin;
use crate::ports::{EvidenceRepository, GoalRepository, SubmissionWindowRepository};

/// Which goals to open evidence slots for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotTarget {
    Goal(GoalId),
    Area(AreaId),
}

/// Application service for evidence records.
pub struct EvidenceService<E, G, W> {
    evidence: E,
    goals: G,
    windows: W,
}

impl<E, G, W> EvidenceService<E, G, W>
where
    E: EvidenceRepository,
    G: GoalRepository,
    W: SubmissionWindowRepository,
{
    pub fn new(evidence: E, goals: G, windows: W) -> Self {
        Self {
            evidence,
            goals,
            windows,
        }
    }

    /// Open an empty slot per goal for `period`, skipping slots that exist.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::NotFound`] when targeting an unknown goal.
    #[tracing::instrument(skip(self))]
    pub async fn open_slots(
        &self,
        target: SlotTarget,
        period: Period,
    ) -> Result<SlotSummary, PlanError> {
        let goals = match target {
            SlotTarget::Goal(id) => vec![self.find_goal(id).await?],
            SlotTarget::Area(area_id) => {
                self.goals
                    .list(GoalFilter {
                        area_id: Some(area_id),
                        ..GoalFilter::default()
                    })
                    .await?
            }
        };

        let at = time::now();
        let mut summary = SlotSummary::default();
        for goal in goals {
            let key = EvidenceKey {
                goal_id: goal.id,
                user_id: goal.user_id,
                period,
            };
            if self.evidence.open_slot(key, at).await? {
                summary.created += 1;
            } else {
                summary.existing += 1;
            }
        }
        tracing::info!(
            created = summary.created,
            existing = summary.existing,
            "evidence slots opened"
        );
        Ok(summary)
    }

    /// Submit or replace the file for a goal in `period`.
    ///
    /// The evidence belongs to the goal's owner even when an administrator
    /// submits it. A resubmission clears any previous review.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Forbidden`] unless the caller owns the goal or is
    /// an administrator, and [`ValidationError::SubmissionWindowClosed`] when
    /// a window is configured for `period` and it is not open now.
    #[tracing::instrument(skip(self, actor, file), fields(actor = %actor.id))]
    pub async fn submit(
        &self,
        actor: &User,
        goal_id: GoalId,
        period: Period,
        file: EvidenceFile,
    ) -> Result<Evidence, PlanError> {
        let goal = self.find_goal(goal_id).await?;
        require_owner_or_admin(actor, goal.user_id)?;

        let submitted_at = time::now();
        let window_id = match self.windows.find_for_period(period).await? {
            Some(window) if !window.is_open_at(submitted_at) => {
                tracing::debug!(window_id = %window.id, "submission outside window");
                return Err(ValidationError::SubmissionWindowClosed.into());
            }
            Some(window) => Some(window.id),
            None => None,
        };

        let evidence = self
            .evidence
            .submit(EvidenceSubmission {
                key: EvidenceKey {
                    goal_id: goal.id,
                    user_id: goal.user_id,
                    period,
                },
                file,
                window_id,
                submitted_at,
            })
            .await?;
        tracing::info!(evidence_id = %evidence.id, "evidence submitted");
        Ok(evidence)
    }

    /// List evidence. Regular users only ever see their own.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list(
        &self,
        actor: &User,
        mut filter: EvidenceFilter,
    ) -> Result<Vec<Evidence>, PlanError> {
        if !actor.is_admin() {
            filter.user_id = Some(actor.id);
        }
        self.evidence.list(filter).await
    }

    /// # Errors
    ///
    /// Returns [`PlanError::NotFound`], or [`AuthError::Forbidden`] for
    /// someone else's evidence.
    pub async fn get(&self, actor: &User, id: EvidenceId) -> Result<Evidence, PlanError> {
        let evidence = self.find(id).await?;
        require_owner_or_admin(actor, evidence.key.user_id)?;
        Ok(evidence)
    }

    /// Grade a submitted file.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EvidenceNotSubmitted`] for an empty slot.
    #[tracing::instrument(skip(self))]
    pub async fn review(&self, id: EvidenceId, review: EvidenceReview) -> Result<Evidence, PlanError> {
        self.find(id).await?.ensure_reviewable()?;
        let evidence = self
            .evidence
            .review(id, review, time::now())
            .await?
            .ok_or_else(|| PlanError::not_found("Evidence", id))?;
        tracing::info!(evidence_id = %id, "evidence reviewed");
        Ok(evidence)
    }

    /// Delete an evidence record.
    ///
    /// Owners may only delete evidence that has not been graded yet.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Forbidden`] for someone else's evidence and
    /// [`ConflictError::EvidenceGraded`] when an owner tries to delete a
    /// graded record.
    #[tracing::instrument(skip(self, actor), fields(actor = %actor.id))]
    pub async fn delete(&self, actor: &User, id: EvidenceId) -> Result<(), PlanError> {
        let evidence = self.find(id).await?;
        if !actor.is_admin() {
            if evidence.key.user_id != actor.id {
                return Err(AuthError::Forbidden.into());
            }
            if evidence.is_graded() {
                return Err(ConflictError::EvidenceGraded.into());
            }
        }
        if !self.evidence.delete(id).await? {
            return Err(PlanError::not_found("Evidence", id));
        }
        Ok(())
    }

    async fn find(&self, id: EvidenceId) -> Result<Evidence, PlanError> {
        self.evidence
            .get_by_id(id)
            .await?
            .ok_or_else(|| PlanError::not_found("Evidence", id))
    }

    async fn find_goal(&self, id: GoalId) -> Result<Goal, PlanError> {
        self.goals
            .get_by_id(id)
            .await?
            .ok_or_else(|| PlanError::not_found("Goal", id))
    }
}
