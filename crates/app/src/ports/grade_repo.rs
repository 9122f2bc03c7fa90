//! Grade repository port: quarterly grades.

use std::future::Future;

use plan_accion_domain::error::PlanError;
use plan_accion_domain::grade::{GradeEntry, GradeFilter, QuarterGrade};

/// Repository for [`QuarterGrade`]s.
pub trait GradeRepository {
    /// Insert or overwrite the grade for `(user, area, period)` in one atomic step.
    fn upsert(
        &self,
        entry: GradeEntry,
    ) -> impl Future<Output = Result<QuarterGrade, PlanError>> + Send;

    fn list(
        &self,
        filter: GradeFilter,
    ) -> impl Future<Output = Result<Vec<QuarterGrade>, PlanError>> + Send;
}
