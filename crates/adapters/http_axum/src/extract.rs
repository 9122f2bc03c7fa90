//! Request extractors: session resolution plus body, query and path decoding
//! with JSON error responses.

use axum::Json;
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum_extra::extract::SignedCookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use serde::de::DeserializeOwned;

use plan_accion_app::ports::{PasswordHasher, Repositories};
use plan_accion_domain::error::AuthError;
use plan_accion_domain::id::UserId;
use plan_accion_domain::user::User;

use crate::error::ApiError;
use crate::state::{AppState, SessionSettings};

/// Name of the cookie holding the signed user id.
pub const SESSION_COOKIE: &str = "user_id";

pub(crate) fn session_cookie(user_id: UserId, settings: &SessionSettings) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, user_id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(settings.secure)
        .build()
}

pub(crate) fn removal_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, "")).path("/").build()
}

/// The authenticated, active caller.
pub struct CurrentUser(pub User);

impl<R, H> FromRequestParts<AppState<R, H>> for CurrentUser
where
    R: Repositories,
    H: PasswordHasher + Send + Sync + 'static,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<R, H>,
    ) -> Result<Self, Self::Rejection> {
        let jar = SignedCookieJar::from_headers(&parts.headers, state.session.key.clone());
        let user_id = jar
            .get(SESSION_COOKIE)
            .and_then(|cookie| cookie.value().parse::<UserId>().ok())
            .ok_or(AuthError::Unauthenticated)?;
        let user = state.auth.resolve_session(user_id).await?;
        Ok(Self(user))
    }
}

/// An authenticated caller with the `admin` role.
pub struct AdminUser(pub User);

impl<R, H> FromRequestParts<AppState<R, H>> for AdminUser
where
    R: Repositories,
    H: PasswordHasher + Send + Sync + 'static,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<R, H>,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            tracing::debug!(user_id = %user.id, "admin route refused");
            return Err(AuthError::Forbidden.into());
        }
        Ok(Self(user))
    }
}

/// JSON body whose decoding errors answer 400.
pub struct Body<T>(pub T);

impl<S, T> FromRequest<S> for Body<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// Query string whose decoding errors answer 400.
pub struct Params<T>(pub T);

impl<S, T> FromRequestParts<S> for Params<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// Path parameter (typically a numeric id) whose decoding errors answer 400.
pub struct Id<T>(pub T);

impl<S, T> FromRequestParts<S> for Id<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
        Ok(Self(value))
    }
}
