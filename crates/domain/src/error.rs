//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`PlanError`]
//! via `From`. Adapters box their source errors into the `Storage` and
//! `Internal` variants so the domain stays free of IO crates.

/// Base error for every use-case in the workspace.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// Input or state transition violates a domain invariant.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A referenced record does not exist.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// The operation collides with existing data.
    #[error("conflict: {0}")]
    Conflict(#[from] ConflictError),

    /// The caller is not authenticated or not allowed to do this.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The persistence layer failed.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Any other infrastructure failure (password hashing, …).
    #[error("internal error")]
    Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Domain invariant violations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("invalid email address")]
    InvalidEmail,

    #[error("password must be at least {min} characters long")]
    PasswordTooShort { min: usize },

    #[error("quarter must be between 1 and 4, got {0}")]
    InvalidQuarter(i64),

    #[error("year must be between {min} and {max}, got {value}")]
    InvalidYear { value: i64, min: i32, max: i32 },

    #[error("score must be a number between 0 and 100, got {0}")]
    ScoreOutOfRange(f64),

    #[error("invalid identifier: {0}")]
    InvalidId(String),

    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },

    #[error("cannot change account status from {from} to {to}")]
    InvalidStatusTransition { from: String, to: String },

    #[error("user has no area assigned")]
    MissingArea,

    #[error("file size must not be negative")]
    NegativeFileSize,

    #[error("evidence has no submitted file")]
    EvidenceNotSubmitted,

    #[error("a score is required unless auto-calculation is requested")]
    MissingScore,

    #[error("no graded evidence to calculate an average from")]
    NoGradedEvidence,

    #[error("window must open before it closes")]
    InvalidWindowRange,

    #[error("submission window for this quarter is closed")]
    SubmissionWindowClosed,

    #[error("current password is incorrect")]
    WrongCurrentPassword,

    #[error("only active accounts can be made administrators")]
    InactiveAdminPromotion,

    #[error("sub-axis {0} does not belong to the selected axis")]
    SubAxisMismatch(i64),
}

/// A lookup by id returned nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// Collisions with data already in the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConflictError {
    #[error("email is already registered")]
    EmailTaken,

    #[error("at least one administrator must remain")]
    LastAdmin,

    #[error("area is still referenced by {users} user(s) and {goals} goal(s)")]
    AreaInUse { users: i64, goals: i64 },

    #[error("a submission window already exists for this quarter")]
    WindowExists,

    #[error("graded evidence can only be deleted by an administrator")]
    EvidenceGraded,

    #[error("record already exists")]
    Duplicate,

    #[error("referenced record is missing or still in use")]
    Reference,
}

/// Authentication and authorization failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("authentication required")]
    Unauthenticated,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("account is pending approval")]
    AccountPending,

    #[error("account was rejected")]
    AccountRejected,

    #[error("insufficient permissions")]
    Forbidden,
}

impl PlanError {
    /// Build a [`NotFoundError`] for the given entity kind and id.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        NotFoundError {
            entity,
            id: id.to_string(),
        }
        .into()
    }
}
