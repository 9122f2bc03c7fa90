//! Grade service: quarterly grades per user and area.

use plan_accion_domain::error::{PlanError, ValidationError};
use plan_accion_domain::grade::{GradeEntry, GradeFilter, QuarterGrade};
use plan_accion_domain::id::{AreaId, UserId};
use plan_accion_domain::period::Period;
use plan_accion_domain::score::Score;
use plan_accion_domain::user::User;

use crate::ports::{EvidenceRepository, GradeRepository};

/// How the grade's score is obtained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GradeSource {
    /// A score typed in by the grader.
    Manual(Score),
    /// The mean of the user's graded evidence for the period.
    Auto,
}

impl GradeSource {
    /// Pick the source from the request fields.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingScore`] when `auto` is false and no
    /// score was given.
    pub fn from_request(score: Option<Score>, auto: bool) -> Result<Self, ValidationError> {
        match (auto, score) {
            (true, _) => Ok(Self::Auto),
            (false, Some(score)) => Ok(Self::Manual(score)),
            (false, None) => Err(ValidationError::MissingScore),
        }
    }
}

/// Application service for quarterly grades.
pub struct GradeService<Q, E> {
    grades: Q,
    evidence: E,
}

impl<Q: GradeRepository, E: EvidenceRepository> GradeService<Q, E> {
    pub fn new(grades: Q, evidence: E) -> Self {
        Self { grades, evidence }
    }

    /// Set the grade of `user_id` in `area_id` for `period`, replacing any
    /// earlier one.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NoGradedEvidence`] for [`GradeSource::Auto`]
    /// when nothing has been graded yet.
    #[tracing::instrument(skip(self, grader), fields(grader = %grader.id))]
    pub async fn grade_quarter(
        &self,
        grader: &User,
        user_id: UserId,
        area_id: AreaId,
        period: Period,
        source: GradeSource,
    ) -> Result<QuarterGrade, PlanError> {
        let (score, auto_calculated) = match source {
            GradeSource::Manual(score) => (score, false),
            GradeSource::Auto => {
                let average = self
                    .evidence
                    .average_score(user_id, area_id, period)
                    .await?
                    .ok_or(ValidationError::NoGradedEvidence)?;
                (average, true)
            }
        };

        let grade = self
            .grades
            .upsert(GradeEntry {
                user_id,
                area_id,
                period,
                score,
                auto_calculated,
                graded_by: grader.id,
                graded_at: plan_accion_domain::time::now(),
            })
            .await?;
        tracing::info!(grade_id = %grade.id, %score, auto_calculated, "quarter graded");
        Ok(grade)
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list(&self, filter: GradeFilter) -> Result<Vec<QuarterGrade>, PlanError> {
        self.grades.list(filter).await
    }
}
