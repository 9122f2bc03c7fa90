//! User service: account administration and self-service profile edits.

use plan_accion_domain::error::{ConflictError, PlanError, ValidationError};
use plan_accion_domain::id::{AreaId, UserId};
use plan_accion_domain::user::{ProfileUpdate, Role, User, UserStatus, validate_password};

use crate::ports::{PasswordHasher, UserRepository};

/// Application service for managing user accounts.
pub struct UserService<U, H> {
    users: U,
    hasher: H,
}

impl<U: UserRepository, H: PasswordHasher> UserService<U, H> {
    pub fn new(users: U, hasher: H) -> Self {
        Self { users, hasher }
    }

    /// List users, optionally only those with `status`.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list(&self, status: Option<UserStatus>) -> Result<Vec<User>, PlanError> {
        self.users.list(status).await
    }

    /// # Errors
    ///
    /// Returns [`PlanError::NotFound`] when no user with `id` exists.
    pub async fn get(&self, id: UserId) -> Result<User, PlanError> {
        self.users
            .get_by_id(id)
            .await?
            .ok_or_else(|| PlanError::not_found("User", id))
    }

    /// Activate a pending or rejected account, optionally assigning an area.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidStatusTransition`] when the account
    /// is already active, or [`PlanError::NotFound`].
    #[tracing::instrument(skip(self))]
    pub async fn approve(&self, id: UserId, area_id: Option<AreaId>) -> Result<User, PlanError> {
        let mut user = self.get(id).await?;
        user.transition_to(UserStatus::Active)?;
        if area_id.is_some() {
            user.area_id = area_id;
        }
        let user = self.users.update(user).await?;
        tracing::info!(user_id = %user.id, "account approved");
        Ok(user)
    }

    /// Reject a pending account.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidStatusTransition`] unless the account
    /// is pending, or [`PlanError::NotFound`].
    #[tracing::instrument(skip(self))]
    pub async fn reject(&self, id: UserId) -> Result<User, PlanError> {
        let mut user = self.get(id).await?;
        user.transition_to(UserStatus::Rejected)?;
        let user = self.users.update(user).await?;
        tracing::info!(user_id = %user.id, "account rejected");
        Ok(user)
    }

    /// Change an account's role.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InactiveAdminPromotion`] when promoting an
    /// account that is not active, [`ConflictError::LastAdmin`] when this
    /// would demote the only active administrator, or [`PlanError::NotFound`].
    #[tracing::instrument(skip(self))]
    pub async fn change_role(&self, id: UserId, role: Role) -> Result<User, PlanError> {
        let user = self.get(id).await?;
        if user.role == role {
            return Ok(user);
        }
        if role == Role::Admin && user.status != UserStatus::Active {
            return Err(ValidationError::InactiveAdminPromotion.into());
        }
        if !self.users.set_role_unless_last_admin(id, role).await? {
            return Err(ConflictError::LastAdmin.into());
        }
        tracing::info!(user_id = %id, %role, "role changed");
        self.get(id).await
    }

    /// Set or clear an account's area.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::NotFound`] for an unknown user, or
    /// [`ConflictError::Reference`] from the store for an unknown area.
    #[tracing::instrument(skip(self))]
    pub async fn assign_area(&self, id: UserId, area_id: Option<AreaId>) -> Result<User, PlanError> {
        let mut user = self.get(id).await?;
        user.area_id = area_id;
        self.users.update(user).await
    }

    /// Edit the caller's own name and photo.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyField`] for a blank name.
    pub async fn update_profile(&self, id: UserId, update: ProfileUpdate) -> Result<User, PlanError> {
        let mut user = self.get(id).await?;
        user.apply_profile(update)?;
        self.users.update(user).await
    }

    /// Replace the caller's password after checking the current one.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::WrongCurrentPassword`] on mismatch or
    /// [`ValidationError::PasswordTooShort`] for a weak new password.
    #[tracing::instrument(skip(self, current, new_password))]
    pub async fn change_password(
        &self,
        id: UserId,
        current: &str,
        new_password: &str,
    ) -> Result<(), PlanError> {
        let user = self.get(id).await?;
        if !self.hasher.verify(current, &user.password_hash)? {
            return Err(ValidationError::WrongCurrentPassword.into());
        }
        self.store_password(user, new_password).await
    }

    /// Set a new password without knowing the old one.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::PasswordTooShort`] or [`PlanError::NotFound`].
    #[tracing::instrument(skip(self, new_password))]
    pub async fn reset_password(&self, id: UserId, new_password: &str) -> Result<(), PlanError> {
        let user = self.get(id).await?;
        self.store_password(user, new_password).await
    }

    /// Delete an account and everything it owns.
    ///
    /// # Errors
    ///
    /// Returns [`ConflictError::LastAdmin`] when `id` is the only active
    /// administrator, or [`PlanError::NotFound`].
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: UserId) -> Result<(), PlanError> {
        self.get(id).await?;
        if !self.users.delete_unless_last_admin(id).await? {
            return Err(ConflictError::LastAdmin.into());
        }
        tracing::info!(user_id = %id, "account deleted");
        Ok(())
    }

    async fn store_password(&self, mut user: User, new_password: &str) -> Result<(), PlanError> {
        validate_password(new_password)?;
        user.password_hash = self.hasher.hash(new_password)?;
        self.users.update(user).await?;
        Ok(())
    }
}
