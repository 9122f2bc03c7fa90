//! JSON REST handlers for areas and their axis tracking.

use axum::extract::State;
use serde::Deserialize;

use plan_accion_app::ports::{PasswordHasher, Repositories};
use plan_accion_domain::area::{Area, NewArea};
use plan_accion_domain::axis::AxisTracking;
use plan_accion_domain::id::{AreaId, AxisId};
use plan_accion_domain::period::Quarter;

use crate::envelope::Reply;
use crate::error::ApiError;
use crate::extract::{AdminUser, Body, CurrentUser, Id, Params};
use crate::state::AppState;

/// Request body for creating or editing an area.
#[derive(Deserialize)]
pub struct AreaRequest {
    pub name: String,
    pub description: Option<String>,
}

impl AreaRequest {
    fn validate(&self) -> Result<NewArea, ApiError> {
        Ok(NewArea::new(&self.name, self.description.as_deref())?)
    }
}

/// Query string for `GET /api/areas/{id}/axis-tracking`.
#[derive(Deserialize)]
pub struct TrackingQuery {
    pub quarter: Option<Quarter>,
}

/// Request body for `PUT /api/areas/{id}/axis-tracking`.
#[derive(Deserialize)]
pub struct TrackingRequest {
    pub axis_id: AxisId,
    pub quarter: Quarter,
    pub selected: bool,
}

/// `GET /api/areas`
pub async fn list<R, H>(
    State(state): State<AppState<R, H>>,
    _user: CurrentUser,
) -> Result<Reply<Vec<Area>>, ApiError>
where
    R: Repositories,
    H: PasswordHasher + Send + Sync + 'static,
{
    Ok(Reply::data(state.areas.list_areas().await?))
}

/// `GET /api/areas/{id}`
pub async fn get<R, H>(
    State(state): State<AppState<R, H>>,
    _user: CurrentUser,
    Id(id): Id<AreaId>,
) -> Result<Reply<Area>, ApiError>
where
    R: Repositories,
    H: PasswordHasher + Send + Sync + 'static,
{
    Ok(Reply::data(state.areas.get_area(id).await?))
}

/// `POST /api/areas`
pub async fn create<R, H>(
    State(state): State<AppState<R, H>>,
    _admin: AdminUser,
    Body(req): Body<AreaRequest>,
) -> Result<Reply<Area>, ApiError>
where
    R: Repositories,
    H: PasswordHasher + Send + Sync + 'static,
{
    let area = state.areas.create_area(req.validate()?).await?;
    Ok(Reply::created("area created", area))
}

/// `PUT /api/areas/{id}`
pub async fn update<R, H>(
    State(state): State<AppState<R, H>>,
    _admin: AdminUser,
    Id(id): Id<AreaId>,
    Body(req): Body<AreaRequest>,
) -> Result<Reply<Area>, ApiError>
where
    R: Repositories,
    H: PasswordHasher + Send + Sync + 'static,
{
    let area = state.areas.update_area(id, req.validate()?).await?;
    Ok(Reply::with_message("area updated", area))
}

/// `DELETE /api/areas/{id}`
pub async fn delete<R, H>(
    State(state): State<AppState<R, H>>,
    _admin: AdminUser,
    Id(id): Id<AreaId>,
) -> Result<Reply<()>, ApiError>
where
    R: Repositories,
    H: PasswordHasher + Send + Sync + 'static,
{
    state.areas.delete_area(id).await?;
    Ok(Reply::NoContent)
}

/// `GET /api/areas/{id}/axis-tracking`
pub async fn list_tracking<R, H>(
    State(state): State<AppState<R, H>>,
    CurrentUser(user): CurrentUser,
    Id(id): Id<AreaId>,
    Params(query): Params<TrackingQuery>,
) -> Result<Reply<Vec<AxisTracking>>, ApiError>
where
    R: Repositories,
    H: PasswordHasher + Send + Sync + 'static,
{
    let tracking = state.axes.list_tracking(&user, id, query.quarter).await?;
    Ok(Reply::data(tracking))
}

/// `PUT /api/areas/{id}/axis-tracking`
pub async fn set_tracking<R, H>(
    State(state): State<AppState<R, H>>,
    CurrentUser(user): CurrentUser,
    Id(id): Id<AreaId>,
    Body(req): Body<TrackingRequest>,
) -> Result<Reply<AxisTracking>, ApiError>
where
    R: Repositories,
    H: PasswordHasher + Send + Sync + 'static,
{
    let tracking = state
        .axes
        .set_tracking(&user, id, req.axis_id, req.quarter, req.selected)
        .await?;
    Ok(Reply::with_message("tracking updated", tracking))
}
