//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod area_repo;
pub mod axis_repo;
pub mod evidence_repo;
pub mod goal_repo;
pub mod grade_repo;
pub mod password;
pub mod repositories;
pub mod selection_repo;
pub mod user_repo;
pub mod window_repo;

pub use area_repo::AreaRepository;
pub use axis_repo::AxisRepository;
pub use evidence_repo::EvidenceRepository;
pub use goal_repo::GoalRepository;
pub use grade_repo::GradeRepository;
pub use password::PasswordHasher;
pub use repositories::{Repositories, RepositorySet};
pub use selection_repo::SelectionRepository;
pub use user_repo::UserRepository;
pub use window_repo::SubmissionWindowRepository;
