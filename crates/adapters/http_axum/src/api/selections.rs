//! Quarter selection endpoints.

use axum::extract::State;
use serde::Deserialize;

use plan_accion_app::ports::{PasswordHasher, Repositories};
use plan_accion_domain::period::{Period, Quarter, Year};
use plan_accion_domain::selection::QuarterSelection;

use crate::envelope::Reply;
use crate::error::ApiError;
use crate::extract::{Body, CurrentUser, Params};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ListQuery {
    pub year: Option<Year>,
}

#[derive(Deserialize)]
pub struct SelectionRequest {
    pub quarter: Quarter,
    pub year: Year,
    pub selected: bool,
}

/// `GET /api/selections`
pub async fn list<R, H>(
    State(state): State<AppState<R, H>>,
    CurrentUser(user): CurrentUser,
    Params(query): Params<ListQuery>,
) -> Result<Reply<Vec<QuarterSelection>>, ApiError>
where
    R: Repositories,
    H: PasswordHasher + Send + Sync + 'static,
{
    Ok(Reply::data(state.selections.list(user.id, query.year).await?))
}

/// `PUT /api/selections`
pub async fn set<R, H>(
    State(state): State<AppState<R, H>>,
    CurrentUser(user): CurrentUser,
    Body(req): Body<SelectionRequest>,
) -> Result<Reply<QuarterSelection>, ApiError>
where
    R: Repositories,
    H: PasswordHasher + Send + Sync + 'static,
{
    let selection = state
        .selections
        .set(user.id, Period::new(req.quarter, req.year), req.selected)
        .await?;
    Ok(Reply::data(selection))
}
