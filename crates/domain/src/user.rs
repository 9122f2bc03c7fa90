//! User accounts: identity, role, and the approval lifecycle.
//!
//! An account is created by self-registration in [`UserStatus::Pending`] and
//! only becomes usable once an administrator approves it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PlanError, ValidationError};
use crate::id::{AreaId, UserId};
use crate::time::Timestamp;

/// Minimum accepted length for a plaintext password.
pub const MIN_PASSWORD_LEN: usize = 8;

/// What a user is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "usuario")]
    User,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "usuario",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "usuario" => Ok(Self::User),
            other => Err(ValidationError::InvalidValue {
                field: "role",
                value: other.to_string(),
            }),
        }
    }
}

/// Where an account is in the approval lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserStatus {
    #[serde(rename = "pendiente")]
    Pending,
    #[serde(rename = "activo")]
    Active,
    #[serde(rename = "rechazado")]
    Rejected,
}

impl UserStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pendiente",
            Self::Active => "activo",
            Self::Rejected => "rechazado",
        }
    }

    /// Whether an administrator may move an account from `self` to `next`.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending | Self::Rejected, Self::Active) | (Self::Pending, Self::Rejected)
        )
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pendiente" => Ok(Self::Pending),
            "activo" => Ok(Self::Active),
            "rechazado" => Ok(Self::Rejected),
            other => Err(ValidationError::InvalidValue {
                field: "status",
                value: other.to_string(),
            }),
        }
    }
}

/// A normalized (trimmed, lowercased) email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Normalize and validate an email address.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidEmail`] unless the address has a
    /// non-empty local part and a dotted domain.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let email = raw.trim().to_lowercase();
        let valid = match email.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && !domain.contains('@')
                    && domain.contains('.')
                    && !domain.starts_with('.')
                    && !domain.ends_with('.')
                    && !email.chars().any(char::is_whitespace)
            }
            None => false,
        };
        if valid {
            Ok(Self(email))
        } else {
            Err(ValidationError::InvalidEmail)
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Email {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Email {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Check the plaintext password policy.
///
/// # Errors
///
/// Returns [`ValidationError::PasswordTooShort`] below [`MIN_PASSWORD_LEN`] characters.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LEN,
        });
    }
    Ok(())
}

/// A registered account.
///
/// The password hash is never serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub role: Role,
    pub status: UserStatus,
    pub area_id: Option<AreaId>,
    pub photo_url: Option<String>,
    pub requested_area: Option<String>,
    pub created_at: Timestamp,
}

impl User {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// An administrator whose account is active, so they can log in.
    #[must_use]
    pub fn is_active_admin(&self) -> bool {
        self.is_admin() && self.status == UserStatus::Active
    }

    /// Move the account to `next`, enforcing the approval lifecycle.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidStatusTransition`] for transitions
    /// not allowed by [`UserStatus::can_transition_to`].
    pub fn transition_to(&mut self, next: UserStatus) -> Result<(), ValidationError> {
        if !self.status.can_transition_to(next) {
            return Err(ValidationError::InvalidStatusTransition {
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }
        self.status = next;
        Ok(())
    }

    /// Apply a profile edit.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyField`] when the new name is blank.
    pub fn apply_profile(&mut self, update: ProfileUpdate) -> Result<(), ValidationError> {
        if let Some(name) = update.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(ValidationError::EmptyField("name"));
            }
            self.name = name.to_string();
        }
        if let Some(photo_url) = update.photo_url {
            let photo_url = photo_url.trim();
            self.photo_url = (!photo_url.is_empty()).then(|| photo_url.to_string());
        }
        Ok(())
    }
}

/// Fields a user may change on their own profile.
///
/// An empty `photo_url` clears the photo.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub photo_url: Option<String>,
}

/// A validated account ready to be inserted.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Email,
    pub password_hash: String,
    pub name: String,
    pub role: Role,
    pub status: UserStatus,
    pub requested_area: Option<String>,
    pub created_at: Timestamp,
}

impl NewUser {
    /// Create a builder for constructing a [`NewUser`].
    #[must_use]
    pub fn builder() -> NewUserBuilder {
        NewUserBuilder::default()
    }
}

/// Step-by-step builder for [`NewUser`].
///
/// Defaults to a pending `usuario` account, which is what self-registration produces.
#[derive(Debug, Default)]
pub struct NewUserBuilder {
    email: Option<Email>,
    password_hash: Option<String>,
    name: Option<String>,
    role: Option<Role>,
    status: Option<UserStatus>,
    requested_area: Option<String>,
}

impl NewUserBuilder {
    #[must_use]
    pub fn email(mut self, email: Email) -> Self {
        self.email = Some(email);
        self
    }

    #[must_use]
    pub fn password_hash(mut self, hash: impl Into<String>) -> Self {
        self.password_hash = Some(hash.into());
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    #[must_use]
    pub fn status(mut self, status: UserStatus) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn requested_area(mut self, requested_area: Option<String>) -> Self {
        self.requested_area = requested_area
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        self
    }

    /// Consume the builder, validate, and return a [`NewUser`].
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::Validation`] if the email, password hash or name is missing.
    pub fn build(self) -> Result<NewUser, PlanError> {
        let email = self.email.ok_or(ValidationError::InvalidEmail)?;
        let password_hash = self
            .password_hash
            .filter(|h| !h.is_empty())
            .ok_or(ValidationError::EmptyField("password"))?;
        let name = self
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .ok_or(ValidationError::EmptyField("name"))?;

        Ok(NewUser {
            email,
            password_hash,
            name,
            role: self.role.unwrap_or(Role::User),
            status: self.status.unwrap_or(UserStatus::Pending),
            requested_area: self.requested_area,
            created_at: crate::time::now(),
        })
    }
}
