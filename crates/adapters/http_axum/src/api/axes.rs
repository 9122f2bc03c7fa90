//! JSON REST handlers for axes ("ejes") and sub-axes.

use axum::extract::State;
use serde::Deserialize;

use plan_accion_app::ports::{PasswordHasher, Repositories};
use plan_accion_domain::axis::{Axis, AxisWithSubAxes, NewAxis, NewSubAxis, SubAxis};
use plan_accion_domain::id::{AxisId, SubAxisId};

use crate::envelope::Reply;
use crate::error::ApiError;
use crate::extract::{AdminUser, Body, CurrentUser, Id};
use crate::state::AppState;

/// Request body for creating or editing an axis.
#[derive(Deserialize)]
pub struct AxisRequest {
    pub name: String,
    pub description: Option<String>,
}

/// Request body for `POST /api/axes/{id}/sub-axes`.
#[derive(Deserialize)]
pub struct SubAxisRequest {
    pub name: String,
}

/// `GET /api/axes`
pub async fn list<R, H>(
    State(state): State<AppState<R, H>>,
    _user: CurrentUser,
) -> Result<Reply<Vec<AxisWithSubAxes>>, ApiError>
where
    R: Repositories,
    H: PasswordHasher + Send + Sync + 'static,
{
    Ok(Reply::data(state.axes.list_axes().await?))
}

/// `GET /api/axes/{id}`
pub async fn get<R, H>(
    State(state): State<AppState<R, H>>,
    _user: CurrentUser,
    Id(id): Id<AxisId>,
) -> Result<Reply<AxisWithSubAxes>, ApiError>
where
    R: Repositories,
    H: PasswordHasher + Send + Sync + 'static,
{
    Ok(Reply::data(state.axes.get_axis(id).await?))
}

/// `POST /api/axes`
pub async fn create<R, H>(
    State(state): State<AppState<R, H>>,
    _admin: AdminUser,
    Body(req): Body<AxisRequest>,
) -> Result<Reply<Axis>, ApiError>
where
    R: Repositories,
    H: PasswordHasher + Send + Sync + 'static,
{
    let draft = NewAxis::new(&req.name, req.description.as_deref())?;
    let axis = state.axes.create_axis(draft).await?;
    Ok(Reply::created("axis created", axis))
}

/// `PUT /api/axes/{id}`
pub async fn update<R, H>(
    State(state): State<AppState<R, H>>,
    _admin: AdminUser,
    Id(id): Id<AxisId>,
    Body(req): Body<AxisRequest>,
) -> Result<Reply<Axis>, ApiError>
where
    R: Repositories,
    H: PasswordHasher + Send + Sync + 'static,
{
    let draft = NewAxis::new(&req.name, req.description.as_deref())?;
    let axis = state.axes.update_axis(id, draft).await?;
    Ok(Reply::with_message("axis updated", axis))
}

/// `DELETE /api/axes/{id}`
pub async fn delete<R, H>(
    State(state): State<AppState<R, H>>,
    _admin: AdminUser,
    Id(id): Id<AxisId>,
) -> Result<Reply<()>, ApiError>
where
    R: Repositories,
    H: PasswordHasher + Send + Sync + 'static,
{
    state.axes.delete_axis(id).await?;
    Ok(Reply::NoContent)
}

/// `POST /api/axes/{id}/sub-axes`
pub async fn create_sub_axis<R, H>(
    State(state): State<AppState<R, H>>,
    _admin: AdminUser,
    Id(axis_id): Id<AxisId>,
    Body(req): Body<SubAxisRequest>,
) -> Result<Reply<SubAxis>, ApiError>
where
    R: Repositories,
    H: PasswordHasher + Send + Sync + 'static,
{
    let draft = NewSubAxis::new(axis_id, &req.name)?;
    let sub_axis = state.axes.create_sub_axis(draft).await?;
    Ok(Reply::created("sub-axis created", sub_axis))
}

/// `DELETE /api/sub-axes/{id}`
pub async fn delete_sub_axis<R, H>(
    State(state): State<AppState<R, H>>,
    _admin: AdminUser,
    Id(id): Id<SubAxisId>,
) -> Result<Reply<()>, ApiError>
where
    R: Repositories,
    H: PasswordHasher + Send + Sync + 'static,
{
    state.axes.delete_sub_axis(id).await?;
    Ok(Reply::NoContent)
}
