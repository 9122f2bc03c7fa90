//! Goal repository port: persistence for goals ("informes").

use std::future::Future;

use plan_accion_domain::error::PlanError;
use plan_accion_domain::goal::{Goal, GoalFilter, NewGoal};
use plan_accion_domain::id::GoalId;

/// Repository for persisting and querying [`Goal`]s.
pub trait GoalRepository {
    fn create(&self, goal: NewGoal) -> impl Future<Output = Result<Goal, PlanError>> + Send;

    fn get_by_id(&self, id: GoalId)
    -> impl Future<Output = Result<Option<Goal>, PlanError>> + Send;

    /// Goals matching `filter`, newest first.
    fn list(&self, filter: GoalFilter)
    -> impl Future<Output = Result<Vec<Goal>, PlanError>> + Send;

    fn update(&self, goal: Goal) -> impl Future<Output = Result<Goal, PlanError>> + Send;

    /// Delete a goal and its evidence. Returns `false` if it did not exist.
    fn delete(&self, id: GoalId) -> impl Future<Output = Result<bool, PlanError>> + Send;
}
