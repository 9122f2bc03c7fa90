//! Selection repository port: per-user quarter opt-in flags.

use std::future::Future;

use plan_accion_domain::error::PlanError;
use plan_accion_domain::id::UserId;
use plan_accion_domain::period::Year;
use plan_accion_domain::selection::QuarterSelection;

pub trait SelectionRepository {
    /// Insert or overwrite the flag for `(user, period)`.
    fn upsert(
        &self,
        selection: QuarterSelection,
    ) -> impl Future<Output = Result<QuarterSelection, PlanError>> + Send;

    fn list_for_user(
        &self,
        user_id: UserId,
        year: Option<Year>,
    ) -> impl Future<Output = Result<Vec<QuarterSelection>, PlanError>> + Send;
}
