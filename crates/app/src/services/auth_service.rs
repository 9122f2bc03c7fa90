//! Auth service: registration, login and session resolution.

use plan_accion_domain::error::{AuthError, ConflictError, PlanError};
use plan_accion_domain::id::UserId;
use plan_accion_domain::user::{Email, NewUser, Role, User, UserStatus, validate_password};

use crate::ports::{PasswordHasher, UserRepository};

/// Self-service sign-up form.
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub name: String,
    pub requested_area: Option<String>,
}

/// Application service for account creation and authentication.
pub struct AuthService<U, H> {
    users: U,
    hasher: H,
}

impl<U: UserRepository, H: PasswordHasher> AuthService<U, H> {
    pub fn new(users: U, hasher: H) -> Self {
        Self { users, hasher }
    }

    /// Create a pending `usuario` account.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::Validation`] for a malformed email, short password
    /// or blank name, and [`ConflictError::EmailTaken`] if the email is in use.
    #[tracing::instrument(skip(self, form), fields(email = %form.email))]
    pub async fn register(&self, form: Registration) -> Result<User, PlanError> {
        let email = Email::parse(&form.email)?;
        validate_password(&form.password)?;
        if self.users.get_by_email(&email).await?.is_some() {
            return Err(ConflictError::EmailTaken.into());
        }
        let new_user = NewUser::builder()
            .email(email)
            .password_hash(self.hasher.hash(&form.password)?)
            .name(form.name)
            .requested_area(form.requested_area)
            .build()?;

        let user = self.users.create(new_user).await.map_err(|err| match err {
            PlanError::Conflict(ConflictError::Duplicate) => ConflictError::EmailTaken.into(),
            other => other,
        })?;
        tracing::info!(user_id = %user.id, "account registered");
        Ok(user)
    }

    /// Check credentials and return the account if it may sign in.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for an unknown email or a
    /// wrong password, and [`AuthError::AccountPending`] or
    /// [`AuthError::AccountRejected`] when the account is not active.
    #[tracing::instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<User, PlanError> {
        let Ok(email) = Email::parse(email) else {
            return Err(AuthError::InvalidCredentials.into());
        };
        let Some(user) = self.users.get_by_email(&email).await? else {
            return Err(AuthError::InvalidCredentials.into());
        };
        if !self.hasher.verify(password, &user.password_hash)? {
            tracing::debug!(user_id = %user.id, "wrong password");
            return Err(AuthError::InvalidCredentials.into());
        }
        ensure_active(&user)?;
        tracing::info!(user_id = %user.id, "login");
        Ok(user)
    }

    /// Load the user behind a session id.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Unauthenticated`] when the user no longer exists
    /// and the account-status errors of [`Self::login`].
    pub async fn resolve_session(&self, id: UserId) -> Result<User, PlanError> {
        let user = self
            .users
            .get_by_id(id)
            .await?
            .ok_or(AuthError::Unauthenticated)?;
        ensure_active(&user)?;
        Ok(user)
    }

    /// Make sure at least one administrator exists.
    ///
    /// Does nothing when an admin is already present. Otherwise promotes and
    /// activates the account with `email`, or creates it. Returns the account
    /// that was promoted or created.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::Validation`] for an invalid email, password or
    /// name, or a storage error.
    #[tracing::instrument(skip(self, password))]
    pub async fn ensure_admin(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<Option<User>, PlanError> {
        if self.users.count_admins().await? > 0 {
            tracing::debug!("administrator already present");
            return Ok(None);
        }
        let email = Email::parse(email)?;
        validate_password(password)?;

        let user = if let Some(mut existing) = self.users.get_by_email(&email).await? {
            existing.status = UserStatus::Active;
            let existing = self.users.update(existing).await?;
            self.users
                .set_role_unless_last_admin(existing.id, Role::Admin)
                .await?;
            User {
                role: Role::Admin,
                ..existing
            }
        } else {
            let new_user = NewUser::builder()
                .email(email)
                .password_hash(self.hasher.hash(password)?)
                .name(name)
                .role(Role::Admin)
                .status(UserStatus::Active)
                .build()?;
            self.users.create(new_user).await?
        };
        tracing::info!(user_id = %user.id, email = %user.email, "bootstrap administrator ready");
        Ok(Some(user))
    }
}

fn ensure_active(user: &User) -> Result<(), AuthError> {
    match user.status {
        UserStatus::Active => Ok(()),
        UserStatus::Pending => Err(AuthError::AccountPending),
        UserStatus::Rejected => Err(AuthError::AccountRejected),
    }
}
