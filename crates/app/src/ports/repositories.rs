//! Bundle of repository implementations.
//!
//! Lets driving adapters name a whole storage backend with a single type
//! parameter instead of one per repository.

use super::{
    AreaRepository, AxisRepository, EvidenceRepository, GoalRepository, GradeRepository,
    SelectionRepository, SubmissionWindowRepository, UserRepository,
};

/// A family of repository types backed by the same store.
///
/// Repositories are cloned into every service that needs them, so they
/// should be cheap handles (a pool, an `Arc`).
pub trait Repositories: Send + Sync + 'static {
    type Users: UserRepository + Clone + Send + Sync + 'static;
    type Areas: AreaRepository + Clone + Send + Sync + 'static;
    type Axes: AxisRepository + Clone + Send + Sync + 'static;
    type Goals: GoalRepository + Clone + Send + Sync + 'static;
    type Evidence: EvidenceRepository + Clone + Send + Sync + 'static;
    type Grades: GradeRepository + Clone + Send + Sync + 'static;
    type Selections: SelectionRepository + Clone + Send + Sync + 'static;
    type Windows: SubmissionWindowRepository + Clone + Send + Sync + 'static;
}

/// One handle per repository of a [`Repositories`] family.
pub struct RepositorySet<R: Repositories> {
    pub users: R::Users,
    pub areas: R::Areas,
    pub axes: R::Axes,
    pub goals: R::Goals,
    pub evidence: R::Evidence,
    pub grades: R::Grades,
    pub selections: R::Selections,
    pub windows: R::Windows,
}
