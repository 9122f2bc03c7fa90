//! # plan-accion-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the repository port traits defined in `plan-accion-app::ports`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//!
//! Uniqueness and referential rules live in the schema. Constraint failures
//! surface as [`plan_accion_domain::error::ConflictError`] so concurrent
//! requests cannot slip past a check-then-write race.
//!
//! ## Dependency rule
//! Depends on `plan-accion-app` (for port traits) and `plan-accion-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod decode;

pub mod area_repo;
pub mod axis_repo;
pub mod error;
pub mod evidence_repo;
pub mod goal_repo;
pub mod grade_repo;
pub mod pool;
pub mod selection_repo;
pub mod user_repo;
pub mod window_repo;

pub use area_repo::SqliteAreaRepository;
pub use axis_repo::SqliteAxisRepository;
pub use error::StorageError;
pub use evidence_repo::SqliteEvidenceRepository;
pub use goal_repo::SqliteGoalRepository;
pub use grade_repo::SqliteGradeRepository;
pub use pool::{Config, Database};
pub use selection_repo::SqliteSelectionRepository;
pub use user_repo::SqliteUserRepository;
pub use window_repo::SqliteSubmissionWindowRepository;

use plan_accion_app::ports::{Repositories, RepositorySet};

/// The `SQLite` repository family, for use as a single type parameter.
pub struct SqliteRepositories;

impl Repositories for SqliteRepositories {
    type Users = SqliteUserRepository;
    type Areas = SqliteAreaRepository;
    type Axes = SqliteAxisRepository;
    type Goals = SqliteGoalRepository;
    type Evidence = SqliteEvidenceRepository;
    type Grades = SqliteGradeRepository;
    type Selections = SqliteSelectionRepository;
    type Windows = SqliteSubmissionWindowRepository;
}

impl SqliteRepositories {
    /// One repository per table family, all sharing the database's pool.
    #[must_use]
    pub fn from_database(db: &Database) -> RepositorySet<Self> {
        let pool = db.pool();
        RepositorySet {
            users: SqliteUserRepository::new(pool.clone()),
            areas: SqliteAreaRepository::new(pool.clone()),
            axes: SqliteAxisRepository::new(pool.clone()),
            goals: SqliteGoalRepository::new(pool.clone()),
            evidence: SqliteEvidenceRepository::new(pool.clone()),
            grades: SqliteGradeRepository::new(pool.clone()),
            selections: SqliteSelectionRepository::new(pool.clone()),
            windows: SqliteSubmissionWindowRepository::new(pool.clone()),
        }
    }
}
