//! Application services: use-case implementations.
//!
//! Each service struct accepts port trait implementations via generic parameters
//! (constructor injection), keeping this layer decoupled from concrete adapters.

pub mod access;
pub mod area_service;
pub mod auth_service;
pub mod axis_service;
pub mod evidence_service;
pub mod goal_service;
pub mod grade_service;
pub mod selection_service;
pub mod user_service;
pub mod window_service;
