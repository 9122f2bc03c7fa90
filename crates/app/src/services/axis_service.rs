//! Axis service: strategic axes, their sub-axes and per-area tracking.

use plan_accion_domain::axis::{
    Axis, AxisTracking, AxisWithSubAxes, NewAxis, NewSubAxis, SubAxis,
};
use plan_accion_domain::error::PlanError;
use plan_accion_domain::id::{AreaId, AxisId, SubAxisId};
use plan_accion_domain::period::Quarter;
use plan_accion_domain::user::User;

use super::access::require_area_member_or_admin;
use crate::ports::AxisRepository;

/// Application service for the axis catalogue.
pub struct AxisService<R> {
    repo: R,
}

impl<R: AxisRepository> AxisService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// # Errors
    ///
    /// Returns [`PlanError::Conflict`] if an axis with the same name exists.
    #[tracing::instrument(skip(self))]
    pub async fn create_axis(&self, draft: NewAxis) -> Result<Axis, PlanError> {
        self.repo.create_axis(draft).await
    }

    /// Load one axis with its sub-axes.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::NotFound`] for an unknown id.
    pub async fn get_axis(&self, id: AxisId) -> Result<AxisWithSubAxes, PlanError> {
        let axis = self.find_axis(id).await?;
        let sub_axes = self.repo.list_sub_axes(Some(id)).await?;
        Ok(AxisWithSubAxes { axis, sub_axes })
    }

    /// List every axis, each with its sub-axes.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_axes(&self) -> Result<Vec<AxisWithSubAxes>, PlanError> {
        let axes = self.repo.list_axes().await?;
        let sub_axes = self.repo.list_sub_axes(None).await?;
        Ok(axes
            .into_iter()
            .map(|axis| AxisWithSubAxes {
                sub_axes: sub_axes
                    .iter()
                    .filter(|s| s.axis_id == axis.id)
                    .cloned()
                    .collect(),
                axis,
            })
            .collect())
    }

    /// # Errors
    ///
    /// Returns [`PlanError::NotFound`] for an unknown id.
    #[tracing::instrument(skip(self))]
    pub async fn update_axis(&self, id: AxisId, draft: NewAxis) -> Result<Axis, PlanError> {
        let mut axis = self.find_axis(id).await?;
        axis.name = draft.name;
        axis.description = draft.description;
        self.repo.update_axis(axis).await
    }

    /// Delete an axis and its sub-axes. Goals keep existing without an axis.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::NotFound`] for an unknown id.
    #[tracing::instrument(skip(self))]
    pub async fn delete_axis(&self, id: AxisId) -> Result<(), PlanError> {
        if !self.repo.delete_axis(id).await? {
            return Err(PlanError::not_found("Axis", id));
        }
        Ok(())
    }

    /// Add a sub-axis under an existing axis.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::NotFound`] when the parent axis does not exist.
    #[tracing::instrument(skip(self))]
    pub async fn create_sub_axis(&self, draft: NewSubAxis) -> Result<SubAxis, PlanError> {
        self.find_axis(draft.axis_id).await?;
        self.repo.create_sub_axis(draft).await
    }

    /// # Errors
    ///
    /// Returns [`PlanError::NotFound`] for an unknown id.
    #[tracing::instrument(skip(self))]
    pub async fn delete_sub_axis(&self, id: SubAxisId) -> Result<(), PlanError> {
        if !self.repo.delete_sub_axis(id).await? {
            return Err(PlanError::not_found("SubAxis", id));
        }
        Ok(())
    }

    /// Mark whether `area_id` follows `axis_id` during `quarter`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Forbidden`](plan_accion_domain::error::AuthError::Forbidden)
    /// when a non-admin edits another area, or [`PlanError::NotFound`] for an
    /// unknown axis.
    #[tracing::instrument(skip(self, actor), fields(actor = %actor.id))]
    pub async fn set_tracking(
        &self,
        actor: &User,
        area_id: AreaId,
        axis_id: AxisId,
        quarter: Quarter,
        selected: bool,
    ) -> Result<AxisTracking, PlanError> {
        require_area_member_or_admin(actor, area_id)?;
        self.find_axis(axis_id).await?;
        self.repo
            .upsert_tracking(AxisTracking {
                area_id,
                axis_id,
                quarter,
                selected,
                updated_at: plan_accion_domain::time::now(),
            })
            .await
    }

    /// Tracking flags of an area, optionally for a single quarter.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Forbidden`](plan_accion_domain::error::AuthError::Forbidden)
    /// when a non-admin reads another area.
    pub async fn list_tracking(
        &self,
        actor: &User,
        area_id: AreaId,
        quarter: Option<Quarter>,
    ) -> Result<Vec<AxisTracking>, PlanError> {
        require_area_member_or_admin(actor, area_id)?;
        self.repo.list_tracking(area_id, quarter).await
    }

    async fn find_axis(&self, id: AxisId) -> Result<Axis, PlanError> {
        self.repo
            .get_axis(id)
            .await?
            .ok_or_else(|| PlanError::not_found("Axis", id))
    }
}
