//! JSON REST handlers for goals ("informes").

use axum::extract::State;
use serde::{Deserialize, Deserializer};

use plan_accion_app::ports::{PasswordHasher, Repositories};
use plan_accion_app::services::goal_service::GoalDraft;
use plan_accion_domain::goal::{Goal, GoalFilter, GoalStatus, GoalUpdate};
use plan_accion_domain::id::{AreaId, AxisId, GoalId, SubAxisId, UserId};

use crate::envelope::Reply;
use crate::error::ApiError;
use crate::extract::{Body, CurrentUser, Id, Params};
use crate::state::AppState;

/// Query string for `GET /api/goals`.
#[derive(Deserialize)]
pub struct ListQuery {
    pub user_id: Option<UserId>,
    pub area_id: Option<AreaId>,
}

/// Request body for `POST /api/goals`.
#[derive(Deserialize)]
pub struct CreateGoalRequest {
    pub text: String,
    pub axis_id: Option<AxisId>,
    pub sub_axis_id: Option<SubAxisId>,
    pub user_id: Option<UserId>,
    pub area_id: Option<AreaId>,
}

/// Request body for `PUT /api/goals/{id}`.
///
/// An explicit `null` axis clears it, an absent one keeps it.
#[derive(Deserialize)]
pub struct UpdateGoalRequest {
    pub text: Option<String>,
    pub status: Option<GoalStatus>,
    #[serde(default, deserialize_with = "present")]
    pub axis_id: Option<Option<AxisId>>,
    #[serde(default, deserialize_with = "present")]
    pub sub_axis_id: Option<Option<SubAxisId>>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// `GET /api/goals`
pub async fn list<R, H>(
    State(state): State<AppState<R, H>>,
    CurrentUser(user): CurrentUser,
    Params(query): Params<ListQuery>,
) -> Result<Reply<Vec<Goal>>, ApiError>
where
    R: Repositories,
    H: PasswordHasher + Send + Sync + 'static,
{
    let filter = GoalFilter {
        user_id: query.user_id,
        area_id: query.area_id,
    };
    Ok(Reply::data(state.goals.list(&user, filter).await?))
}

/// `POST /api/goals`
pub async fn create<R, H>(
    State(state): State<AppState<R, H>>,
    CurrentUser(user): CurrentUser,
    Body(req): Body<CreateGoalRequest>,
) -> Result<Reply<Goal>, ApiError>
where
    R: Repositories,
    H: PasswordHasher + Send + Sync + 'static,
{
    let draft = GoalDraft {
        text: req.text,
        axis_id: req.axis_id,
        sub_axis_id: req.sub_axis_id,
        user_id: req.user_id,
        area_id: req.area_id,
    };
    let goal = state.goals.create(&user, draft).await?;
    Ok(Reply::created("goal created", goal))
}

/// `GET /api/goals/{id}`
pub async fn get<R, H>(
    State(state): State<AppState<R, H>>,
    CurrentUser(user): CurrentUser,
    Id(id): Id<GoalId>,
) -> Result<Reply<Goal>, ApiError>
where
    R: Repositories,
    H: PasswordHasher + Send + Sync + 'static,
{
    Ok(Reply::data(state.goals.get(&user, id).await?))
}

/// `PUT /api/goals/{id}`
pub async fn update<R, H>(
    State(state): State<AppState<R, H>>,
    CurrentUser(user): CurrentUser,
    Id(id): Id<GoalId>,
    Body(req): Body<UpdateGoalRequest>,
) -> Result<Reply<Goal>, ApiError>
where
    R: Repositories,
    H: PasswordHasher + Send + Sync + 'static,
{
    let update = GoalUpdate {
        text: req.text,
        status: req.status,
        axis_id: req.axis_id,
        sub_axis_id: req.sub_axis_id,
    };
    let goal = state.goals.update(&user, id, update).await?;
    Ok(Reply::with_message("goal updated", goal))
}

/// `DELETE /api/goals/{id}`
pub async fn delete<R, H>(
    State(state): State<AppState<R, H>>,
    CurrentUser(user): CurrentUser,
    Id(id): Id<GoalId>,
) -> Result<Reply<()>, ApiError>
where
    R: Repositories,
    H: PasswordHasher + Send + Sync + 'static,
{
    state.goals.delete(&user, id).await?;
    Ok(Reply::NoContent)
}
