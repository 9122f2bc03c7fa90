//! Ownership and role checks shared by the services.

use plan_accion_domain::error::AuthError;
use plan_accion_domain::id::{AreaId, UserId};
use plan_accion_domain::user::User;

/// Allow `actor` if they are an administrator.
///
/// # Errors
///
/// Returns [`AuthError::Forbidden`] otherwise.
pub fn require_admin(actor: &User) -> Result<(), AuthError> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}

/// Allow `actor` if they own the record or are an administrator.
///
/// # Errors
///
/// Returns [`AuthError::Forbidden`] otherwise.
pub fn require_owner_or_admin(actor: &User, owner: UserId) -> Result<(), AuthError> {
    if actor.is_admin() || actor.id == owner {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}

/// Allow `actor` if they belong to the area or are an administrator.
///
/// # Errors
///
/// Returns [`AuthError::Forbidden`] otherwise.
pub fn require_area_member_or_admin(actor: &User, area_id: AreaId) -> Result<(), AuthError> {
    if actor.is_admin() || actor.area_id == Some(area_id) {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}
