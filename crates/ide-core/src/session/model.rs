//! Session domain model.

use serde::{Deserialize, Serialize};

/// The signed-in user, as returned by the backend and persisted locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    /// Bearer token attached to authorized requests
    pub token: String,
}

/// The authenticated identity of the current client. `user` is `None` when signed out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub user: Option<User>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.user.as_ref().map(|user| user.token.as_str())
    }
}

/// Login request body.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Signup request body.
#[derive(Debug, Clone, Serialize)]
pub struct SignupProfile {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Body of a successful login or signup response.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub user: Option<User>,
}
