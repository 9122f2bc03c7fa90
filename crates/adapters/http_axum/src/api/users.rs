//! Self-service profile endpoints.

use axum::extract::State;
use serde::Deserialize;

use plan_accion_app::ports::{PasswordHasher, Repositories};
use plan_accion_domain::user::{ProfileUpdate, User};

use crate::envelope::Reply;
use crate::error::ApiError;
use crate::extract::{Body, CurrentUser};
use crate::state::AppState;

/// Request body for `PUT /api/users/me/password`.
#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// `PUT /api/users/me`
pub async fn update_me<R, H>(
    State(state): State<AppState<R, H>>,
    CurrentUser(user): CurrentUser,
    Body(update): Body<ProfileUpdate>,
) -> Result<Reply<User>, ApiError>
where
    R: Repositories,
    H: PasswordHasher + Send + Sync + 'static,
{
    let user = state.users.update_profile(user.id, update).await?;
    Ok(Reply::with_message("profile updated", user))
}

/// `PUT /api/users/me/password`
pub async fn change_password<R, H>(
    State(state): State<AppState<R, H>>,
    CurrentUser(user): CurrentUser,
    Body(req): Body<ChangePasswordRequest>,
) -> Result<Reply<()>, ApiError>
where
    R: Repositories,
    H: PasswordHasher + Send + Sync + 'static,
{
    state
        .users
        .change_password(user.id, &req.current_password, &req.new_password)
        .await?;
    Ok(Reply::message("password changed"))
}
