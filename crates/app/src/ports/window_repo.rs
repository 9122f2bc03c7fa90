//! Submission window repository port.

use std::future::Future;

use plan_accion_domain::error::PlanError;
use plan_accion_domain::id::WindowId;
use plan_accion_domain::period::Period;
use plan_accion_domain::submission_window::{NewSubmissionWindow, SubmissionWindow};

/// Repository for [`SubmissionWindow`]s.
pub trait SubmissionWindowRepository {
    /// Insert a window. A second window for the same period is a conflict.
    fn create(
        &self,
        window: NewSubmissionWindow,
    ) -> impl Future<Output = Result<SubmissionWindow, PlanError>> + Send;

    /// All windows, latest period first.
    fn get_all(&self) -> impl Future<Output = Result<Vec<SubmissionWindow>, PlanError>> + Send;

    fn find_for_period(
        &self,
        period: Period,
    ) -> impl Future<Output = Result<Option<SubmissionWindow>, PlanError>> + Send;

    fn delete(&self, id: WindowId) -> impl Future<Output = Result<bool, PlanError>> + Send;
}
