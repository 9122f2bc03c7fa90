//! # plan-accion-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the **JSON API** under `/api` (auth, users, areas, axes, goals,
//!   evidence, grades, selections, submission windows)
//! - Resolve the caller from a **signed** `user_id` cookie and enforce the
//!   session/admin requirement of each route
//! - Map HTTP requests into application service calls (driving adapter)
//! - Wrap results in `{ "message", "data" }` and map [`PlanError`] into
//!   `{ "error" }` with the matching status code
//!
//! ## Dependency rule
//! Depends on `plan-accion-app` (for port traits and services) and
//! `plan-accion-domain` (for domain types used in request/response mapping).
//! Never leaks axum types into the domain.
//!
//! [`PlanError`]: plan_accion_domain::error::PlanError

pub mod api;
pub mod envelope;
pub mod error;
pub mod extract;
pub mod router;
pub mod state;

pub use state::{AppState, SessionSettings};
