//! Evidence repository port: slots, submissions and reviews.

use std::future::Future;

use plan_accion_domain::error::PlanError;
use plan_accion_domain::evidence::{
    Evidence, EvidenceFilter, EvidenceKey, EvidenceReview, EvidenceSubmission,
};
use plan_accion_domain::id::{AreaId, EvidenceId, UserId};
use plan_accion_domain::period::Period;
use plan_accion_domain::score::Score;
use plan_accion_domain::time::Timestamp;

/// Repository for [`Evidence`] records.
///
/// Implementations must guarantee at most one record per [`EvidenceKey`]
/// even under concurrent calls.
pub trait EvidenceRepository {
    /// Insert an empty slot for `key` if none exists.
    ///
    /// Returns `true` when a slot was created and `false` when one was already there.
    fn open_slot(
        &self,
        key: EvidenceKey,
        at: Timestamp,
    ) -> impl Future<Output = Result<bool, PlanError>> + Send;

    /// Insert or replace the file for the submission's key in one atomic step.
    ///
    /// Replacing a file clears the previous score and observation.
    fn submit(
        &self,
        submission: EvidenceSubmission,
    ) -> impl Future<Output = Result<Evidence, PlanError>> + Send;

    fn get_by_id(
        &self,
        id: EvidenceId,
    ) -> impl Future<Output = Result<Option<Evidence>, PlanError>> + Send;

    /// Records matching `filter`, ordered by year, quarter and id.
    fn list(
        &self,
        filter: EvidenceFilter,
    ) -> impl Future<Output = Result<Vec<Evidence>, PlanError>> + Send;

    /// Store a review. Returns `None` if the record no longer exists.
    fn review(
        &self,
        id: EvidenceId,
        review: EvidenceReview,
        at: Timestamp,
    ) -> impl Future<Output = Result<Option<Evidence>, PlanError>> + Send;

    fn delete(&self, id: EvidenceId) -> impl Future<Output = Result<bool, PlanError>> + Send;

    /// Mean score of the user's graded evidence on goals of `area_id` in `period`.
    fn average_score(
        &self,
        user_id: UserId,
        area_id: AreaId,
        period: Period,
    ) -> impl Future<Output = Result<Option<Score>, PlanError>> + Send;
}
