//! User records as stored and as sent over the wire

use serde::{Deserialize, Serialize};

/// Stored user. `high_score` only ever goes up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub google_id: String,
    pub high_score: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Body of `POST /api/users`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub google_id: String,
    #[serde(default)]
    pub high_score: u64,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl NewUser {
    pub fn new(username: &str, email: &str, google_id: &str) -> Self {
        Self {
            username: username.to_string(),
            email: email.to_string(),
            google_id: google_id.to_string(),
            high_score: 0,
            avatar_url: None,
        }
    }

    /// Field-level checks serde can't express. Returns the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if self.username.trim().is_empty() {
            return Err("username must not be empty".to_string());
        }
        if self.email.trim().is_empty() {
            return Err("email must not be empty".to_string());
        }
        if !self.email.contains('@') {
            return Err(format!("email '{}' is not a valid address", self.email));
        }
        if self.google_id.trim().is_empty() {
            return Err("googleId must not be empty".to_string());
        }
        Ok(())
    }

    pub fn into_user(self, id: u64) -> User {
        User {
            id,
            username: self.username,
            email: self.email,
            google_id: self.google_id,
            high_score: self.high_score,
            avatar_url: self.avatar_url,
        }
    }
}
