//! Area service: use-cases for managing areas.

use plan_accion_domain::area::{Area, NewArea};
use plan_accion_domain::error::PlanError;
use plan_accion_domain::id::AreaId;

use crate::ports::AreaRepository;

/// Application service for area CRUD operations.
pub struct AreaService<R> {
    repo: R,
}

impl<R: AreaRepository> AreaService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Create a new area.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::Conflict`] if the name is already used, or a
    /// storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn create_area(&self, draft: NewArea) -> Result<Area, PlanError> {
        let area = self.repo.create(draft).await?;
        tracing::info!(area_id = %area.id, "area created");
        Ok(area)
    }

    /// Look up an area by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::NotFound`] when no area with `id` exists,
    /// or a storage error from the repository.
    pub async fn get_area(&self, id: AreaId) -> Result<Area, PlanError> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| PlanError::not_found("Area", id))
    }

    /// List all areas ordered by name.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_areas(&self) -> Result<Vec<Area>, PlanError> {
        self.repo.get_all().await
    }

    /// Replace the name and description of an existing area.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::NotFound`] for an unknown id, or
    /// [`PlanError::Conflict`] if the new name is taken.
    #[tracing::instrument(skip(self))]
    pub async fn update_area(&self, id: AreaId, draft: NewArea) -> Result<Area, PlanError> {
        let mut area = self.get_area(id).await?;
        area.apply(draft);
        self.repo.update(area).await
    }

    /// Delete an area that nothing references any more.
    ///
    /// # Errors
    ///
    /// Returns [`ConflictError::AreaInUse`](plan_accion_domain::error::ConflictError::AreaInUse)
    /// while users or goals point at the area, or [`PlanError::NotFound`].
    #[tracing::instrument(skip(self))]
    pub async fn delete_area(&self, id: AreaId) -> Result<(), PlanError> {
        self.get_area(id).await?;
        self.repo.count_dependents(id).await?.ensure_unused()?;
        if !self.repo.delete(id).await? {
            return Err(PlanError::not_found("Area", id));
        }
        tracing::info!(area_id = %id, "area deleted");
        Ok(())
    }
}
