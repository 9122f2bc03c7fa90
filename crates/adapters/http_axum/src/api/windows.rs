//! Submission window ("configuración de envío") endpoints.

use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use plan_accion_app::ports::{PasswordHasher, Repositories};
use plan_accion_domain::id::WindowId;
use plan_accion_domain::period::{Period, Quarter, Year};
use plan_accion_domain::submission_window::{NewSubmissionWindow, SubmissionWindow};

use crate::envelope::Reply;
use crate::error::ApiError;
use crate::extract::{AdminUser, Body, CurrentUser, Id, Params};
use crate::state::AppState;

/// Query string for `GET /api/submission-windows/current`.
#[derive(Deserialize)]
pub struct PeriodQuery {
    pub quarter: Quarter,
    pub year: Year,
}

/// Request body for `POST /api/submission-windows`. Timestamps are RFC 3339.
#[derive(Deserialize)]
pub struct CreateWindowRequest {
    pub quarter: Quarter,
    pub year: Year,
    pub opens_at: DateTime<Utc>,
    pub closes_at: DateTime<Utc>,
}

/// `GET /api/submission-windows`
pub async fn list<R, H>(
    State(state): State<AppState<R, H>>,
    _user: CurrentUser,
) -> Result<Reply<Vec<SubmissionWindow>>, ApiError>
where
    R: Repositories,
    H: PasswordHasher + Send + Sync + 'static,
{
    Ok(Reply::data(state.windows.list().await?))
}

/// `GET /api/submission-windows/current`
pub async fn current<R, H>(
    State(state): State<AppState<R, H>>,
    _user: CurrentUser,
    Params(query): Params<PeriodQuery>,
) -> Result<Reply<SubmissionWindow>, ApiError>
where
    R: Repositories,
    H: PasswordHasher + Send + Sync + 'static,
{
    let window = state
        .windows
        .current(Period::new(query.quarter, query.year))
        .await?;
    Ok(Reply::data(window))
}

/// `POST /api/submission-windows`
pub async fn create<R, H>(
    State(state): State<AppState<R, H>>,
    _admin: AdminUser,
    Body(req): Body<CreateWindowRequest>,
) -> Result<Reply<SubmissionWindow>, ApiError>
where
    R: Repositories,
    H: PasswordHasher + Send + Sync + 'static,
{
    let window = NewSubmissionWindow::new(
        Period::new(req.quarter, req.year),
        req.opens_at,
        req.closes_at,
    )?;
    let window = state.windows.create(window).await?;
    Ok(Reply::created("submission window created", window))
}

/// `DELETE /api/submission-windows/{id}`
pub async fn delete<R, H>(
    State(state): State<AppState<R, H>>,
    _admin: AdminUser,
    Id(id): Id<WindowId>,
) -> Result<Reply<()>, ApiError>
where
    R: Repositories,
    H: PasswordHasher + Send + Sync + 'static,
{
    state.windows.delete(id).await?;
    Ok(Reply::NoContent)
}
