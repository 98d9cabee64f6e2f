use serde::{Deserialize, Serialize};
use std::fmt;

// Tri-state tag describing what the client currently believes about its session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionStatus {
    Checking,
    Authenticated,
    NotAuthenticated,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Checking => "checking",
            SessionStatus::Authenticated => "authenticated",
            SessionStatus::NotAuthenticated => "not-authenticated",
        }
    }

    /// True once bootstrapping has resolved to either terminal status.
    pub fn is_stable(&self) -> bool {
        !matches!(self, SessionStatus::Checking)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Role claimed by the identity service for the signed-in employee.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Employee,
    // Roles this client does not know about grant nothing.
    #[serde(other)]
    Unknown,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Employee => "EMPLOYEE",
            Role::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Profile of the authenticated caller as returned by the identity service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: u64,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

/// Session state held by the store.
///
/// The identity lives inside the `Authenticated` variant, so it exists exactly
/// when the status is authenticated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Checking,
    Authenticated(Identity),
    NotAuthenticated,
}

impl SessionState {
    pub fn status(&self) -> SessionStatus {
        match self {
            SessionState::Checking => SessionStatus::Checking,
            SessionState::Authenticated(_) => SessionStatus::Authenticated,
            SessionState::NotAuthenticated => SessionStatus::NotAuthenticated,
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            SessionState::Authenticated(identity) => Some(identity),
            SessionState::Checking | SessionState::NotAuthenticated => None,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.identity().is_some_and(|identity| identity.role == Role::Admin)
    }

    pub fn is_employee(&self) -> bool {
        self.identity()
            .is_some_and(|identity| identity.role == Role::Employee)
    }
}

// Email/password pair submitted by the login form.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

// Sign-up payload submitted by the registration form.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub full_name: String,
    pub email: String,
    pub password: String,
}
