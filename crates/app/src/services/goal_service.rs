//! Goal service: the "informes" users commit to within their area.

use plan_accion_domain::error::{AuthError, PlanError, ValidationError};
use plan_accion_domain::goal::{Goal, GoalFilter, GoalUpdate, NewGoal};
use plan_accion_domain::id::{AreaId, AxisId, GoalId, SubAxisId, UserId};
use plan_accion_domain::user::User;

use super::access::require_owner_or_admin;
use crate::ports::{AxisRepository, GoalRepository};

/// Input for [`GoalService::create`].
///
/// `user_id` and `area_id` default to the caller and the caller's area.
#[derive(Debug, Clone, Default)]
pub struct GoalDraft {
    pub text: String,
    pub axis_id: Option<AxisId>,
    pub sub_axis_id: Option<SubAxisId>,
    pub user_id: Option<UserId>,
    pub area_id: Option<AreaId>,
}

/// Application service for goals.
pub struct GoalService<G, A> {
    repo: G,
    axes: A,
}

impl<G: GoalRepository, A: AxisRepository> GoalService<G, A> {
    pub fn new(repo: G, axes: A) -> Self {
        Self { repo, axes }
    }

    /// Create a goal on behalf of `actor`.
    ///
    /// Regular users can only create goals for themselves in their own area.
    /// Administrators may create goals for anyone; when they do so for
    /// another user they must name the area.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Forbidden`] when a regular user targets another
    /// user or area, [`ValidationError::MissingArea`] when no area can be
    /// determined, [`ValidationError::EmptyField`] for blank text, or
    /// [`ValidationError::SubAxisMismatch`] when the sub-axis is not part of
    /// the chosen axis.
    #[tracing::instrument(skip(self, actor, draft), fields(actor = %actor.id))]
    pub async fn create(&self, actor: &User, draft: GoalDraft) -> Result<Goal, PlanError> {
        let owner = draft.user_id.unwrap_or(actor.id);
        if !actor.is_admin() {
            if owner != actor.id {
                return Err(AuthError::Forbidden.into());
            }
            if draft.area_id.is_some() && draft.area_id != actor.area_id {
                return Err(AuthError::Forbidden.into());
            }
        }
        let area_id = match draft.area_id {
            Some(area_id) => area_id,
            None if owner == actor.id => actor.area_id.ok_or(ValidationError::MissingArea)?,
            None => return Err(ValidationError::MissingArea.into()),
        };

        let goal = NewGoal::new(
            owner,
            area_id,
            &draft.text,
            draft.axis_id,
            draft.sub_axis_id,
        )?;
        self.check_classification(goal.axis_id, goal.sub_axis_id)
            .await?;
        let goal = self.repo.create(goal).await?;
        tracing::info!(goal_id = %goal.id, "goal created");
        Ok(goal)
    }

    /// List goals. Regular users only ever see their own.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list(&self, actor: &User, mut filter: GoalFilter) -> Result<Vec<Goal>, PlanError> {
        if !actor.is_admin() {
            filter.user_id = Some(actor.id);
        }
        self.repo.list(filter).await
    }

    /// # Errors
    ///
    /// Returns [`PlanError::NotFound`] or [`AuthError::Forbidden`] when the
    /// caller neither owns the goal nor is an administrator.
    pub async fn get(&self, actor: &User, id: GoalId) -> Result<Goal, PlanError> {
        let goal = self.find(id).await?;
        require_owner_or_admin(actor, goal.user_id)?;
        Ok(goal)
    }

    /// # Errors
    ///
    /// Same as [`Self::get`], plus [`ValidationError::EmptyField`] for blank
    /// text and [`ValidationError::SubAxisMismatch`] when the resulting
    /// sub-axis is not part of the resulting axis.
    #[tracing::instrument(skip(self, actor, update), fields(actor = %actor.id))]
    pub async fn update(
        &self,
        actor: &User,
        id: GoalId,
        update: GoalUpdate,
    ) -> Result<Goal, PlanError> {
        let mut goal = self.get(actor, id).await?;
        goal.apply(update)?;
        self.check_classification(goal.axis_id, goal.sub_axis_id)
            .await?;
        self.repo.update(goal).await
    }

    /// Delete a goal together with its evidence.
    ///
    /// # Errors
    ///
    /// Same as [`Self::get`].
    #[tracing::instrument(skip(self, actor), fields(actor = %actor.id))]
    pub async fn delete(&self, actor: &User, id: GoalId) -> Result<(), PlanError> {
        self.get(actor, id).await?;
        if !self.repo.delete(id).await? {
            return Err(PlanError::not_found("Goal", id));
        }
        tracing::info!(goal_id = %id, "goal deleted");
        Ok(())
    }

    /// A sub-axis is only valid together with the axis it belongs to.
    async fn check_classification(
        &self,
        axis_id: Option<AxisId>,
        sub_axis_id: Option<SubAxisId>,
    ) -> Result<(), PlanError> {
        let Some(sub_axis_id) = sub_axis_id else {
            return Ok(());
        };
        let sub_axis = self
            .axes
            .get_sub_axis(sub_axis_id)
            .await?
            .ok_or_else(|| PlanError::not_found("SubAxis", sub_axis_id))?;
        if axis_id != Some(sub_axis.axis_id) {
            return Err(ValidationError::SubAxisMismatch(sub_axis_id.get()).into());
        }
        Ok(())
    }

    async fn find(&self, id: GoalId) -> Result<Goal, PlanError> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| PlanError::not_found("Goal", id))
    }
}
