//! # plan-accion-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `UserRepository`, `AreaRepository`, `AxisRepository`, `GoalRepository`
//!   - `EvidenceRepository`, `GradeRepository`, `SelectionRepository`,
//!     `SubmissionWindowRepository`
//!   - `PasswordHasher`: one-way password hashing
//! - Define **driving/inbound ports** as use-case structs:
//!   - `AuthService`: registration, login, session resolution
//!   - `UserService`: account administration and self-service profile edits
//!   - `AreaService`, `AxisService`, `GoalService`
//!   - `EvidenceService`, `GradeService`, `SelectionService`,
//!     `SubmissionWindowService`
//! - Enforce authorization rules that depend on ownership (owner or admin)
//!
//! ## Dependency rule
//! Depends on `plan-accion-domain` only.
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;

#[cfg(test)]
pub(crate) mod testing;
