//! Staff directory: users who create contracts and receive tasks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Role, UserId};

/// A staff member as exposed by read views.
///
/// The password is write-only and therefore absent from this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Validation failures for user input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("email must not be empty")]
    EmptyEmail,
    #[error("email must contain '@'")]
    MalformedEmail,
}

/// Validated profile fields shared by creation and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    name: String,
    email: String,
    role: Role,
}

impl UserProfile {
    /// Trim and validate the profile fields.
    ///
    /// # Examples
    /// ```
    /// use onboarding_backend::domain::{Role, UserProfile};
    ///
    /// let profile = UserProfile::new("  Ayşe Demir ", "ayse@hastane.com", Role::MaliGmy)
    ///     .expect("valid profile");
    /// assert_eq!(profile.name(), "Ayşe Demir");
    /// ```
    pub fn new(
        name: impl AsRef<str>,
        email: impl AsRef<str>,
        role: Role,
    ) -> Result<Self, UserValidationError> {
        let name = name.as_ref().trim();
        let email = email.as_ref().trim();
        if name.is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        if email.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if !email.contains('@') {
            return Err(UserValidationError::MalformedEmail);
        }
        Ok(Self {
            name: name.to_owned(),
            email: email.to_owned(),
            role,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn role(&self) -> Role {
        self.role
    }
}

/// Input for registering a staff member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub profile: UserProfile,
    pub password: Option<String>,
}
