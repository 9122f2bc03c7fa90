//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod admin_users;
#[allow(clippy::missing_errors_doc)]
pub mod areas;
#[allow(clippy::missing_errors_doc)]
pub mod auth;
#[allow(clippy::missing_errors_doc)]
pub mod axes;
#[allow(clippy::missing_errors_doc)]
pub mod evidence;
#[allow(clippy::missing_errors_doc)]
pub mod goals;
#[allow(clippy::missing_errors_doc)]
pub mod grades;
#[allow(clippy::missing_errors_doc)]
pub mod selections;
#[allow(clippy::missing_errors_doc)]
pub mod users;
#[allow(clippy::missing_errors_doc)]
pub mod windows;

use axum::Router;
use axum::routing::{delete, get, patch, post, put};

use plan_accion_app::ports::{PasswordHasher, Repositories};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<R, H>() -> Router<AppState<R, H>>
where
    R: Repositories,
    H: PasswordHasher + Send + Sync + 'static,
{
    Router::new()
        // Session
        .route("/auth/register", post(auth::register::<R, H>))
        .route("/auth/login", post(auth::login::<R, H>))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route("/users/me", put(users::update_me::<R, H>))
        .route("/users/me/password", put(users::change_password::<R, H>))
        // Account administration
        .route("/admin/users", get(admin_users::list::<R, H>))
        .route(
            "/admin/users/{id}",
            get(admin_users::get::<R, H>).delete(admin_users::delete::<R, H>),
        )
        .route(
            "/admin/users/{id}/approve",
            patch(admin_users::approve::<R, H>),
        )
        .route("/admin/users/{id}/reject", patch(admin_users::reject::<R, H>))
        .route(
            "/admin/users/{id}/role",
            patch(admin_users::change_role::<R, H>),
        )
        .route(
            "/admin/users/{id}/area",
            patch(admin_users::assign_area::<R, H>),
        )
        .route(
            "/admin/users/{id}/password",
            put(admin_users::reset_password::<R, H>),
        )
        // Areas
        .route(
            "/areas",
            get(areas::list::<R, H>).post(areas::create::<R, H>),
        )
        .route(
            "/areas/{id}",
            get(areas::get::<R, H>)
                .put(areas::update::<R, H>)
                .delete(areas::delete::<R, H>),
        )
        .route(
            "/areas/{id}/axis-tracking",
            get(areas::list_tracking::<R, H>).put(areas::set_tracking::<R, H>),
        )
        // Axes
        .route("/axes", get(axes::list::<R, H>).post(axes::create::<R, H>))
        .route(
            "/axes/{id}",
            get(axes::get::<R, H>)
                .put(axes::update::<R, H>)
                .delete(axes::delete::<R, H>),
        )
        .route("/axes/{id}/sub-axes", post(axes::create_sub_axis::<R, H>))
        .route("/sub-axes/{id}", delete(axes::delete_sub_axis::<R, H>))
        // Goals
        .route("/goals", get(goals::list::<R, H>).post(goals::create::<R, H>))
        .route(
            "/goals/{id}",
            get(goals::get::<R, H>)
                .put(goals::update::<R, H>)
                .delete(goals::delete::<R, H>),
        )
        // Evidence
        .route(
            "/admin/evidence/slots",
            post(evidence::open_slots::<R, H>),
        )
        .route(
            "/admin/evidence/{id}/review",
            patch(evidence::review::<R, H>),
        )
        .route(
            "/evidence",
            get(evidence::list::<R, H>).post(evidence::submit::<R, H>),
        )
        .route(
            "/evidence/{id}",
            get(evidence::get::<R, H>).delete(evidence::delete::<R, H>),
        )
        // Grades
        .route(
            "/admin/grades",
            get(grades::list_all::<R, H>).put(grades::grade_quarter::<R, H>),
        )
        .route("/grades", get(grades::list_own::<R, H>))
        // Selections
        .route(
            "/selections",
            get(selections::list::<R, H>).put(selections::set::<R, H>),
        )
        // Submission windows
        .route(
            "/submission-windows",
            get(windows::list::<R, H>).post(windows::create::<R, H>),
        )
        .route(
            "/submission-windows/current",
            get(windows::current::<R, H>),
        )
        .route(
            "/submission-windows/{id}",
            delete(windows::delete::<R, H>),
        )
}
