//! Quarterly grade endpoints.

use axum::extract::State;
use serde::Deserialize;

use plan_accion_app::ports::{PasswordHasher, Repositories};
use plan_accion_app::services::grade_service::GradeSource;
use plan_accion_domain::grade::{GradeFilter, QuarterGrade};
use plan_accion_domain::id::{AreaId, UserId};
use plan_accion_domain::period::{Period, Quarter, Year};
use plan_accion_domain::score::Score;

use crate::envelope::Reply;
use crate::error::ApiError;
use crate::extract::{AdminUser, Body, CurrentUser, Params};
use crate::state::AppState;

/// Request body for `PUT /api/admin/grades`.
///
/// Either a `score` or `"auto": true` to average the graded evidence.
#[derive(Deserialize)]
pub struct GradeRequest {
    pub user_id: UserId,
    pub area_id: AreaId,
    pub quarter: Quarter,
    pub year: Year,
    pub score: Option<Score>,
    #[serde(default)]
    pub auto: bool,
}

/// Query string for the grade listings.
#[derive(Deserialize)]
pub struct ListQuery {
    pub user_id: Option<UserId>,
    pub area_id: Option<AreaId>,
    pub quarter: Option<Quarter>,
    pub year: Option<Year>,
}

impl ListQuery {
    fn into_filter(self) -> GradeFilter {
        GradeFilter {
            user_id: self.user_id,
            area_id: self.area_id,
            quarter: self.quarter,
            year: self.year,
        }
    }
}

/// `PUT /api/admin/grades`
pub async fn grade_quarter<R, H>(
    State(state): State<AppState<R, H>>,
    AdminUser(admin): AdminUser,
    Body(req): Body<GradeRequest>,
) -> Result<Reply<QuarterGrade>, ApiError>
where
    R: Repositories,
    H: PasswordHasher + Send + Sync + 'static,
{
    let source = GradeSource::from_request(req.score, req.auto)?;
    let grade = state
        .grades
        .grade_quarter(
            &admin,
            req.user_id,
            req.area_id,
            Period::new(req.quarter, req.year),
            source,
        )
        .await?;
    Ok(Reply::with_message("quarter graded", grade))
}

/// `GET /api/admin/grades`
pub async fn list_all<R, H>(
    State(state): State<AppState<R, H>>,
    _admin: AdminUser,
    Params(query): Params<ListQuery>,
) -> Result<Reply<Vec<QuarterGrade>>, ApiError>
where
    R: Repositories,
    H: PasswordHasher + Send + Sync + 'static,
{
    Ok(Reply::data(state.grades.list(query.into_filter()).await?))
}

/// `GET /api/grades`: the caller's own grades.
pub async fn list_own<R, H>(
    State(state): State<AppState<R, H>>,
    CurrentUser(user): CurrentUser,
    Params(query): Params<ListQuery>,
) -> Result<Reply<Vec<QuarterGrade>>, ApiError>
where
    R: Repositories,
    H: PasswordHasher + Send + Sync + 'static,
{
    let filter = GradeFilter {
        user_id: Some(user.id),
        ..query.into_filter()
    };
    Ok(Reply::data(state.grades.list(filter).await?))
}
