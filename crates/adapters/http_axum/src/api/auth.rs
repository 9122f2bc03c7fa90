//! Registration, login and session endpoints.

use axum::extract::State;
use axum_extra::extract::SignedCookieJar;
use serde::Deserialize;

use plan_accion_app::ports::{PasswordHasher, Repositories};
use plan_accion_app::services::auth_service::Registration;
use plan_accion_domain::user::User;

use crate::envelope::Reply;
use crate::error::ApiError;
use crate::extract::{Body, CurrentUser, removal_cookie, session_cookie};
use crate::state::AppState;

/// Request body for `POST /api/auth/register`.
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub requested_area: Option<String>,
}

/// Request body for `POST /api/auth/login`.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `POST /api/auth/register`
pub async fn register<R, H>(
    State(state): State<AppState<R, H>>,
    Body(req): Body<RegisterRequest>,
) -> Result<Reply<User>, ApiError>
where
    R: Repositories,
    H: PasswordHasher + Send + Sync + 'static,
{
    let user = state
        .auth
        .register(Registration {
            email: req.email,
            password: req.password,
            name: req.name,
            requested_area: req.requested_area,
        })
        .await?;
    Ok(Reply::created(
        "registration received, waiting for approval",
        user,
    ))
}

/// `POST /api/auth/login`
pub async fn login<R, H>(
    State(state): State<AppState<R, H>>,
    jar: SignedCookieJar,
    Body(req): Body<LoginRequest>,
) -> Result<(SignedCookieJar, Reply<User>), ApiError>
where
    R: Repositories,
    H: PasswordHasher + Send + Sync + 'static,
{
    let user = state.auth.login(&req.email, &req.password).await?;
    let jar = jar.add(session_cookie(user.id, &state.session));
    Ok((jar, Reply::with_message("logged in", user)))
}

/// `POST /api/auth/logout`
pub async fn logout(jar: SignedCookieJar) -> (SignedCookieJar, Reply<()>) {
    (jar.remove(removal_cookie()), Reply::message("logged out"))
}

/// `GET /api/auth/me`
pub async fn me(CurrentUser(user): CurrentUser) -> Reply<User> {
    Reply::data(user)
}
