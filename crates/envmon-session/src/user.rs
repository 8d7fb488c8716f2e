//! Authenticated principal and login credentials

use crate::error::SessionError;
use envmon_access::{Ability, Capability, CapabilitySet};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum password length accepted by the login form
pub const MIN_PASSWORD_LEN: usize = 6;

/// Logged-in user profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Account identifier (login name)
    #[serde(rename = "_id")]
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Contact phone
    #[serde(default)]
    pub phone: String,
    /// Administrator flag
    #[serde(rename = "isAdmin", default)]
    pub is_admin: bool,
    /// Directly granted abilities
    #[serde(default)]
    pub abilities: Vec<Ability>,
}

impl User {
    /// Create non-administrator with no abilities
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            phone: String::new(),
            is_admin: false,
            abilities: Vec::new(),
        }
    }

    /// With ability
    #[must_use]
    pub fn with_capability(mut self, cap: Capability) -> Self {
        self.abilities.push(cap.into());
        self
    }

    /// With administrator flag
    #[must_use]
    pub fn with_admin(mut self, is_admin: bool) -> Self {
        self.is_admin = is_admin;
        self
    }

    /// Direct capabilities plus the wildcard for administrators
    #[must_use]
    pub fn capabilities(&self) -> CapabilitySet {
        let mut caps = CapabilitySet::from_abilities(&self.abilities);
        if self.is_admin {
            caps.insert(Capability::All);
        }
        caps
    }
}

/// Login form input
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Account name
    pub username: String,
    /// Password
    pub password: String,
}

impl Credentials {
    /// Create credentials
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Apply the login form rules before contacting the service
    ///
    /// # Errors
    /// Returns `SessionError::InvalidCredentials` for an empty user name or a
    /// password shorter than [`MIN_PASSWORD_LEN`] characters
    pub fn validate(&self) -> Result<(), SessionError> {
        if self.username.trim().is_empty() {
            return Err(SessionError::InvalidCredentials("user name is empty".into()));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(SessionError::InvalidCredentials(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use envmon_access::{Action, Resource};

    #[test]
    fn wire_shape() {
        let user: User = serde_json::from_value(serde_json::json!({
            "_id": "op1",
            "name": "Operator",
            "phone": "0912",
            "isAdmin": false,
            "abilities": [{"action": "read", "subject": "Data"}]
        }))
        .unwrap();
        assert_eq!(user.id, "op1");
        assert!(user.capabilities().permits(&Capability::new(Action::Read, Resource::Data)));
    }

    #[test]
    fn admin_holds_wildcard() {
        let caps = User::new("root", "Root").with_admin(true).capabilities();
        assert!(caps.is_wildcard());
    }

    #[test]
    fn credentials_validation() {
        assert!(Credentials::new("admin", "111111").validate().is_ok());
        assert!(Credentials::new("  ", "111111").validate().is_err());
        assert!(Credentials::new("admin", "12345").validate().is_err());
    }

    #[test]
    fn debug_redacts_password() {
        let text = format!("{:?}", Credentials::new("admin", "secret-pass"));
        assert!(!text.contains("secret-pass"));
        assert!(text.contains("admin"));
    }
}
