//! Axis repository port: axes, sub-axes and per-area axis tracking.

use std::future::Future;

use plan_accion_domain::axis::{Axis, AxisTracking, NewAxis, NewSubAxis, SubAxis};
use plan_accion_domain::error::PlanError;
use plan_accion_domain::id::{AreaId, AxisId, SubAxisId};
use plan_accion_domain::period::Quarter;

/// Repository for the axis classification.
pub trait AxisRepository {
    fn create_axis(&self, axis: NewAxis) -> impl Future<Output = Result<Axis, PlanError>> + Send;

    fn get_axis(&self, id: AxisId) -> impl Future<Output = Result<Option<Axis>, PlanError>> + Send;

    /// All axes ordered by name.
    fn list_axes(&self) -> impl Future<Output = Result<Vec<Axis>, PlanError>> + Send;

    fn update_axis(&self, axis: Axis) -> impl Future<Output = Result<Axis, PlanError>> + Send;

    /// Delete an axis together with its sub-axes and tracking rows.
    fn delete_axis(&self, id: AxisId) -> impl Future<Output = Result<bool, PlanError>> + Send;

    fn create_sub_axis(
        &self,
        sub_axis: NewSubAxis,
    ) -> impl Future<Output = Result<SubAxis, PlanError>> + Send;

    fn get_sub_axis(
        &self,
        id: SubAxisId,
    ) -> impl Future<Output = Result<Option<SubAxis>, PlanError>> + Send;

    /// Sub-axes of one axis, or of every axis when `axis_id` is `None`.
    fn list_sub_axes(
        &self,
        axis_id: Option<AxisId>,
    ) -> impl Future<Output = Result<Vec<SubAxis>, PlanError>> + Send;

    fn delete_sub_axis(
        &self,
        id: SubAxisId,
    ) -> impl Future<Output = Result<bool, PlanError>> + Send;

    /// Insert or overwrite the tracking flag for `(area, axis, quarter)`.
    fn upsert_tracking(
        &self,
        tracking: AxisTracking,
    ) -> impl Future<Output = Result<AxisTracking, PlanError>> + Send;

    fn list_tracking(
        &self,
        area_id: AreaId,
        quarter: Option<Quarter>,
    ) -> impl Future<Output = Result<Vec<AxisTracking>, PlanError>> + Send;
}
