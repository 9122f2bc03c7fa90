//! Account administration endpoints.

use axum::extract::State;
use serde::Deserialize;

use plan_accion_app::ports::{PasswordHasher, Repositories};
use plan_accion_domain::id::{AreaId, UserId};
use plan_accion_domain::user::{Role, User, UserStatus};

use crate::envelope::Reply;
use crate::error::ApiError;
use crate::extract::{AdminUser, Body, Id, Params};
use crate::state::AppState;

/// Query string for `GET /api/admin/users`.
#[derive(Deserialize)]
pub struct ListQuery {
    pub status: Option<UserStatus>,
}

/// Request body for `PATCH /api/admin/users/{id}/approve` and `.../area`.
#[derive(Deserialize, Default)]
pub struct AreaRequest {
    pub area_id: Option<AreaId>,
}

/// Request body for `PATCH /api/admin/users/{id}/role`.
#[derive(Deserialize)]
pub struct RoleRequest {
    pub role: Role,
}

/// Request body for `PUT /api/admin/users/{id}/password`.
#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    pub new_password: String,
}

/// `GET /api/admin/users`
pub async fn list<R, H>(
    State(state): State<AppState<R, H>>,
    _admin: AdminUser,
    Params(query): Params<ListQuery>,
) -> Result<Reply<Vec<User>>, ApiError>
where
    R: Repositories,
    H: PasswordHasher + Send + Sync + 'static,
{
    let users = state.users.list(query.status).await?;
    Ok(Reply::data(users))
}

/// `GET /api/admin/users/{id}`
pub async fn get<R, H>(
    State(state): State<AppState<R, H>>,
    _admin: AdminUser,
    Id(id): Id<UserId>,
) -> Result<Reply<User>, ApiError>
where
    R: Repositories,
    H: PasswordHasher + Send + Sync + 'static,
{
    Ok(Reply::data(state.users.get(id).await?))
}

/// `DELETE /api/admin/users/{id}`
pub async fn delete<R, H>(
    State(state): State<AppState<R, H>>,
    _admin: AdminUser,
    Id(id): Id<UserId>,
) -> Result<Reply<()>, ApiError>
where
    R: Repositories,
    H: PasswordHasher + Send + Sync + 'static,
{
    state.users.delete(id).await?;
    Ok(Reply::NoContent)
}

/// `PATCH /api/admin/users/{id}/approve`
pub async fn approve<R, H>(
    State(state): State<AppState<R, H>>,
    _admin: AdminUser,
    Id(id): Id<UserId>,
    Body(req): Body<AreaRequest>,
) -> Result<Reply<User>, ApiError>
where
    R: Repositories,
    H: PasswordHasher + Send + Sync + 'static,
{
    let user = state.users.approve(id, req.area_id).await?;
    Ok(Reply::with_message("user approved", user))
}

/// `PATCH /api/admin/users/{id}/reject`
pub async fn reject<R, H>(
    State(state): State<AppState<R, H>>,
    _admin: AdminUser,
    Id(id): Id<UserId>,
) -> Result<Reply<User>, ApiError>
where
    R: Repositories,
    H: PasswordHasher + Send + Sync + 'static,
{
    let user = state.users.reject(id).await?;
    Ok(Reply::with_message("user rejected", user))
}

/// `PATCH /api/admin/users/{id}/role`
pub async fn change_role<R, H>(
    State(state): State<AppState<R, H>>,
    _admin: AdminUser,
    Id(id): Id<UserId>,
    Body(req): Body<RoleRequest>,
) -> Result<Reply<User>, ApiError>
where
    R: Repositories,
    H: PasswordHasher + Send + Sync + 'static,
{
    let user = state.users.change_role(id, req.role).await?;
    Ok(Reply::with_message("role updated", user))
}

/// `PATCH /api/admin/users/{id}/area`
pub async fn assign_area<R, H>(
    State(state): State<AppState<R, H>>,
    _admin: AdminUser,
    Id(id): Id<UserId>,
    Body(req): Body<AreaRequest>,
) -> Result<Reply<User>, ApiError>
where
    R: Repositories,
    H: PasswordHasher + Send + Sync + 'static,
{
    let user = state.users.assign_area(id, req.area_id).await?;
    Ok(Reply::with_message("area assigned", user))
}

/// `PUT /api/admin/users/{id}/password`
pub async fn reset_password<R, H>(
    State(state): State<AppState<R, H>>,
    _admin: AdminUser,
    Id(id): Id<UserId>,
    Body(req): Body<ResetPasswordRequest>,
) -> Result<Reply<()>, ApiError>
where
    R: Repositories,
    H: PasswordHasher + Send + Sync + 'static,
{
    state.users.reset_password(id, &req.new_password).await?;
    Ok(Reply::message("password reset"))
}
