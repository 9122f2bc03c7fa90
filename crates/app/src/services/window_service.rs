//! Submission window service: when evidence for a quarter may be sent.

use plan_accion_domain::error::{ConflictError, PlanError};
use plan_accion_domain::id::WindowId;
use plan_accion_domain::period::Period;
use plan_accion_domain::submission_window::{NewSubmissionWindow, SubmissionWindow};

use crate::ports::SubmissionWindowRepository;

/// Application service for submission windows ("configuración de envíos").
pub struct SubmissionWindowService<R> {
    repo: R,
}

impl<R: SubmissionWindowRepository> SubmissionWindowService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Create the window for a period.
    ///
    /// # Errors
    ///
    /// Returns [`ConflictError::WindowExists`] if the period already has one.
    #[tracing::instrument(skip(self))]
    pub async fn create(&self, window: NewSubmissionWindow) -> Result<SubmissionWindow, PlanError> {
        if self.repo.find_for_period(window.period).await?.is_some() {
            return Err(ConflictError::WindowExists.into());
        }
        let created = self.repo.create(window).await.map_err(|err| match err {
            PlanError::Conflict(ConflictError::Duplicate) => ConflictError::WindowExists.into(),
            other => other,
        })?;
        tracing::info!(window_id = %created.id, period = %created.period, "submission window created");
        Ok(created)
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list(&self) -> Result<Vec<SubmissionWindow>, PlanError> {
        self.repo.get_all().await
    }

    /// The window configured for `period`.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::NotFound`] when the period has none.
    pub async fn current(&self, period: Period) -> Result<SubmissionWindow, PlanError> {
        self.repo
            .find_for_period(period)
            .await?
            .ok_or_else(|| PlanError::not_found("SubmissionWindow", period))
    }

    /// # Errors
    ///
    /// Returns [`PlanError::NotFound`] for an unknown id.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: WindowId) -> Result<(), PlanError> {
        if !self.repo.delete(id).await? {
            return Err(PlanError::not_found("SubmissionWindow", id));
        }
        Ok(())
    }
}
