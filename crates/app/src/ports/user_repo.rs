//! User repository port: persistence for accounts.

use std::future::Future;

use plan_accion_domain::error::PlanError;
use plan_accion_domain::id::UserId;
use plan_accion_domain::user::{Email, NewUser, Role, User, UserStatus};

/// Repository for persisting and querying [`User`]s.
pub trait UserRepository {
    /// Insert a new account and return it with its assigned id.
    fn create(&self, user: NewUser) -> impl Future<Output = Result<User, PlanError>> + Send;

    /// Get an account by id.
    fn get_by_id(&self, id: UserId)
    -> impl Future<Output = Result<Option<User>, PlanError>> + Send;

    /// Get an account by its normalized email.
    fn get_by_email(
        &self,
        email: &Email,
    ) -> impl Future<Output = Result<Option<User>, PlanError>> + Send;

    /// List accounts, optionally only those in `status`, newest first
    /// (by creation time, then id).
    fn list(
        &self,
        status: Option<UserStatus>,
    ) -> impl Future<Output = Result<Vec<User>, PlanError>> + Send;

    /// Persist every mutable field of `user` except its role.
    fn update(&self, user: User) -> impl Future<Output = Result<User, PlanError>> + Send;

    /// Change a user's role unless that would leave no administrator.
    ///
    /// Returns `false` when the change was refused. The check and the write
    /// happen in one statement.
    fn set_role_unless_last_admin(
        &self,
        id: UserId,
        role: Role,
    ) -> impl Future<Output = Result<bool, PlanError>> + Send;

    /// Delete a user unless they are the last administrator.
    ///
    /// Returns `false` when nothing was deleted. The check and the delete
    /// happen in one statement.
    fn delete_unless_last_admin(
        &self,
        id: UserId,
    ) -> impl Future<Output = Result<bool, PlanError>> + Send;

    /// Number of accounts with the `admin` role.
    fn count_admins(&self) -> impl Future<Output = Result<i64, PlanError>> + Send;
}
