//! Area repository port: persistence for departments.

use std::future::Future;

use plan_accion_domain::area::{Area, AreaUsage, NewArea};
use plan_accion_domain::error::PlanError;
use plan_accion_domain::id::AreaId;

/// Repository for persisting and querying [`Area`]s.
pub trait AreaRepository {
    fn create(&self, area: NewArea) -> impl Future<Output = Result<Area, PlanError>> + Send;

    fn get_by_id(&self, id: AreaId)
    -> impl Future<Output = Result<Option<Area>, PlanError>> + Send;

    /// All areas ordered by name.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Area>, PlanError>> + Send;

    fn update(&self, area: Area) -> impl Future<Output = Result<Area, PlanError>> + Send;

    /// Returns `false` if no area had this id.
    fn delete(&self, id: AreaId) -> impl Future<Output = Result<bool, PlanError>> + Send;

    /// How many users and goals still reference the area.
    fn count_dependents(
        &self,
        id: AreaId,
    ) -> impl Future<Output = Result<AreaUsage, PlanError>> + Send;
}
