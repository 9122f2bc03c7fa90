//! JSON REST handlers for evidence: slots, submissions and reviews.

use axum::extract::State;
use serde::Deserialize;

use plan_accion_app::ports::{PasswordHasher, Repositories};
use plan_accion_app::services::evidence_service::SlotTarget;
use plan_accion_domain::error::ValidationError;
use plan_accion_domain::evidence::{
    Evidence, EvidenceFile, EvidenceFilter, EvidenceReview, SlotSummary,
};
use plan_accion_domain::id::{AreaId, EvidenceId, GoalId, UserId};
use plan_accion_domain::period::{Period, Quarter, Year};
use plan_accion_domain::score::Score;

use crate::envelope::Reply;
use crate::error::ApiError;
use crate::extract::{AdminUser, Body, CurrentUser, Id, Params};
use crate::state::AppState;

/// Request body for `POST /api/admin/evidence/slots`. Exactly one of
/// `goal_id` and `area_id` must be given.
#[derive(Deserialize)]
pub struct OpenSlotsRequest {
    pub goal_id: Option<GoalId>,
    pub area_id: Option<AreaId>,
    pub quarter: Quarter,
    pub year: Year,
}

impl OpenSlotsRequest {
    fn target(&self) -> Result<SlotTarget, ValidationError> {
        match (self.goal_id, self.area_id) {
            (Some(goal_id), None) => Ok(SlotTarget::Goal(goal_id)),
            (None, Some(area_id)) => Ok(SlotTarget::Area(area_id)),
            _ => Err(ValidationError::InvalidValue {
                field: "target",
                value: "expected exactly one of goal_id or area_id".to_string(),
            }),
        }
    }
}

/// Query string for `GET /api/evidence`.
#[derive(Deserialize)]
pub struct ListQuery {
    pub user_id: Option<UserId>,
    pub goal_id: Option<GoalId>,
    pub area_id: Option<AreaId>,
    pub quarter: Option<Quarter>,
    pub year: Option<Year>,
}

/// Request body for `POST /api/evidence`.
#[derive(Deserialize)]
pub struct SubmitRequest {
    pub goal_id: GoalId,
    pub quarter: Quarter,
    pub year: Year,
    pub file_url: String,
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
}

/// Request body for `PATCH /api/admin/evidence/{id}/review`.
#[derive(Deserialize)]
pub struct ReviewRequest {
    pub score: Score,
    pub observation: Option<String>,
}

/// `POST /api/admin/evidence/slots`
pub async fn open_slots<R, H>(
    State(state): State<AppState<R, H>>,
    _admin: AdminUser,
    Body(req): Body<OpenSlotsRequest>,
) -> Result<Reply<SlotSummary>, ApiError>
where
    R: Repositories,
    H: PasswordHasher + Send + Sync + 'static,
{
    let target = req.target()?;
    let summary = state
        .evidence
        .open_slots(target, Period::new(req.quarter, req.year))
        .await?;
    Ok(Reply::created("evidence slots opened", summary))
}

/// `GET /api/evidence`
pub async fn list<R, H>(
    State(state): State<AppState<R, H>>,
    CurrentUser(user): CurrentUser,
    Params(query): Params<ListQuery>,
) -> Result<Reply<Vec<Evidence>>, ApiError>
where
    R: Repositories,
    H: PasswordHasher + Send + Sync + 'static,
{
    let filter = EvidenceFilter {
        user_id: query.user_id,
        goal_id: query.goal_id,
        area_id: query.area_id,
        quarter: query.quarter,
        year: query.year,
    };
    Ok(Reply::data(state.evidence.list(&user, filter).await?))
}

/// `POST /api/evidence`
pub async fn submit<R, H>(
    State(state): State<AppState<R, H>>,
    CurrentUser(user): CurrentUser,
    Body(req): Body<SubmitRequest>,
) -> Result<Reply<Evidence>, ApiError>
where
    R: Repositories,
    H: PasswordHasher + Send + Sync + 'static,
{
    let file = EvidenceFile::new(&req.file_url, &req.file_name, &req.mime_type, req.size_bytes)?;
    let evidence = state
        .evidence
        .submit(&user, req.goal_id, Period::new(req.quarter, req.year), file)
        .await?;
    Ok(Reply::created("evidence submitted", evidence))
}

/// `GET /api/evidence/{id}`
pub async fn get<R, H>(
    State(state): State<AppState<R, H>>,
    CurrentUser(user): CurrentUser,
    Id(id): Id<EvidenceId>,
) -> Result<Reply<Evidence>, ApiError>
where
    R: Repositories,
    H: PasswordHasher + Send + Sync + 'static,
{
    Ok(Reply::data(state.evidence.get(&user, id).await?))
}

/// `DELETE /api/evidence/{id}`
pub async fn delete<R, H>(
    State(state): State<AppState<R, H>>,
    CurrentUser(user): CurrentUser,
    Id(id): Id<EvidenceId>,
) -> Result<Reply<()>, ApiError>
where
    R: Repositories,
    H: PasswordHasher + Send + Sync + 'static,
{
    state.evidence.delete(&user, id).await?;
    Ok(Reply::NoContent)
}

/// `PATCH /api/admin/evidence/{id}/review`
pub async fn review<R, H>(
    State(state): State<AppState<R, H>>,
    _admin: AdminUser,
    Id(id): Id<EvidenceId>,
    Body(req): Body<ReviewRequest>,
) -> Result<Reply<Evidence>, ApiError>
where
    R: Repositories,
    H: PasswordHasher + Send + Sync + 'static,
{
    let review = EvidenceReview::new(req.score, req.observation.as_deref());
    let evidence = state.evidence.review(id, review).await?;
    Ok(Reply::with_message("evidence reviewed", evidence))
}
