//! Selection service: which quarters a user opted into.

use plan_accion_domain::error::PlanError;
use plan_accion_domain::id::UserId;
use plan_accion_domain::period::{Period, Year};
use plan_accion_domain::selection::QuarterSelection;

use crate::ports::SelectionRepository;

pub struct SelectionService<R> {
    repo: R,
}

impl<R: SelectionRepository> SelectionService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn set(
        &self,
        user_id: UserId,
        period: Period,
        selected: bool,
    ) -> Result<QuarterSelection, PlanError> {
        self.repo
            .upsert(QuarterSelection {
                user_id,
                period,
                selected,
                updated_at: plan_accion_domain::time::now(),
            })
            .await
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list(
        &self,
        user_id: UserId,
        year: Option<Year>,
    ) -> Result<Vec<QuarterSelection>, PlanError> {
        self.repo.list_for_user(user_id, year).await
    }
}
