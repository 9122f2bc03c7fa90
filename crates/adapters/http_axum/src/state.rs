//! Shared application state for axum handlers.

use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;

use plan_accion_app::ports::{PasswordHasher, Repositories, RepositorySet};
use plan_accion_app::services::area_service::AreaService;
use plan_accion_app::services::auth_service::AuthService;
use plan_accion_app::services::axis_service::AxisService;
use plan_accion_app::services::evidence_service::EvidenceService;
use plan_accion_app::services::goal_service::GoalService;
use plan_accion_app::services::grade_service::GradeService;
use plan_accion_app::services::selection_service::SelectionService;
use plan_accion_app::services::user_service::UserService;
use plan_accion_app::services::window_service::SubmissionWindowService;

/// How the session cookie is signed and flagged.
#[derive(Clone)]
pub struct SessionSettings {
    /// HMAC key signing the `user_id` cookie.
    pub key: Key,
    /// Add the `Secure` attribute (HTTPS deployments).
    pub secure: bool,
}

impl SessionSettings {
    /// Derive the signing key from a secret of at least 64 bytes.
    ///
    /// # Panics
    ///
    /// Panics if `secret` is shorter than 64 bytes. Callers validate the
    /// length when loading configuration.
    #[must_use]
    pub fn from_secret(secret: &[u8], secure: bool) -> Self {
        Self {
            key: Key::from(secret),
            secure,
        }
    }

    /// A random key, so sessions do not survive a restart.
    #[must_use]
    pub fn ephemeral(secure: bool) -> Self {
        Self {
            key: Key::generate(),
            secure,
        }
    }
}

/// Application state shared across all axum handlers.
///
/// Generic over the repository family and the password hasher to avoid
/// dynamic dispatch. `Clone` is implemented manually so only the `Arc`
/// wrappers are cloned.
pub struct AppState<R: Repositories, H> {
    pub auth: Arc<AuthService<R::Users, H>>,
    pub users: Arc<UserService<R::Users, H>>,
    pub areas: Arc<AreaService<R::Areas>>,
    pub axes: Arc<AxisService<R::Axes>>,
    pub goals: Arc<GoalService<R::Goals, R::Axes>>,
    pub evidence: Arc<EvidenceService<R::Evidence, R::Goals, R::Windows>>,
    pub grades: Arc<GradeService<R::Grades, R::Evidence>>,
    pub selections: Arc<SelectionService<R::Selections>>,
    pub windows: Arc<SubmissionWindowService<R::Windows>>,
    pub session: SessionSettings,
}

impl<R: Repositories, H> Clone for AppState<R, H> {
    fn clone(&self) -> Self {
        Self {
            auth: Arc::clone(&self.auth),
            users: Arc::clone(&self.users),
            areas: Arc::clone(&self.areas),
            axes: Arc::clone(&self.axes),
            goals: Arc::clone(&self.goals),
            evidence: Arc::clone(&self.evidence),
            grades: Arc::clone(&self.grades),
            selections: Arc::clone(&self.selections),
            windows: Arc::clone(&self.windows),
            session: self.session.clone(),
        }
    }
}

impl<R, H> AppState<R, H>
where
    R: Repositories,
    H: PasswordHasher + Clone + Send + Sync + 'static,
{
    /// Wire every service from one set of repositories.
    pub fn new(repos: RepositorySet<R>, hasher: H, session: SessionSettings) -> Self {
        let RepositorySet {
            users,
            areas,
            axes,
            goals,
            evidence,
            grades,
            selections,
            windows,
        } = repos;
        Self {
            auth: Arc::new(AuthService::new(users.clone(), hasher.clone())),
            users: Arc::new(UserService::new(users, hasher)),
            areas: Arc::new(AreaService::new(areas)),
            axes: Arc::new(AxisService::new(axes.clone())),
            goals: Arc::new(GoalService::new(goals.clone(), axes)),
            evidence: Arc::new(EvidenceService::new(
                evidence.clone(),
                goals,
                windows.clone(),
            )),
            grades: Arc::new(GradeService::new(grades, evidence)),
            selections: Arc::new(SelectionService::new(selections)),
            windows: Arc::new(SubmissionWindowService::new(windows)),
            session,
        }
    }
}

impl<R: Repositories, H> FromRef<AppState<R, H>> for Key {
    fn from_ref(state: &AppState<R, H>) -> Self {
        state.session.key.clone()
    }
}
