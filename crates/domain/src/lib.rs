//! # plan-accion-domain
//!
//! Pure domain model for the "Plan de Acción" goal-tracking system.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Users** (accounts with a role and an approval status)
//! - Define **Areas** (organizational departments)
//! - Define **Axes** and sub-axes (classification used to group goals)
//! - Define **Goals** ("informes": a user's objective within an area)
//! - Define **Evidence** (per-goal, per-quarter file submissions and their review)
//! - Define **Quarterly grades**, **quarter selections** and **submission windows**
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod period;
pub mod score;
pub mod time;

pub mod area;
pub mod axis;
pub mod evidence;
pub mod goal;
pub mod grade;
pub mod selection;
pub mod submission_window;
pub mod user;
