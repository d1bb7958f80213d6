//! User storage

use std::collections::BTreeMap;

use thiserror::Error;

use super::model::{NewUser, User};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("User not found")]
    NotFound,

    #[error("User with this {0} already exists")]
    Duplicate(&'static str),
}

/// Operations the API needs from a user store
pub trait UserStore {
    fn get_user(&self, id: u64) -> Option<User>;

    fn get_user_by_google_id(&self, google_id: &str) -> Option<User>;

    /// Insert a user, assigning the next id. Rejects a googleId, username
    /// or email that is already taken.
    fn create_user(&mut self, new: NewUser) -> Result<User, StoreError>;

    /// Raise the stored high score if `score` is strictly greater.
    /// Returns the record as it stands afterwards.
    fn update_high_score(&mut self, id: u64, score: u64) -> Result<User, StoreError>;

    /// Up to `limit` users, highest score first. Ties keep id order.
    fn top_scores(&self, limit: usize) -> Vec<User>;
}

/// In-memory store, lost on restart
#[derive(Debug, Clone)]
pub struct MemStore {
    users: BTreeMap<u64, User>,
    next_id: u64,
}

impl Default for MemStore {
    fn default() -> Self {
        Self {
            users: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl UserStore for MemStore {
    fn get_user(&self, id: u64) -> Option<User> {
        self.users.get(&id).cloned()
    }

    fn get_user_by_google_id(&self, google_id: &str) -> Option<User> {
        self.users
            .values()
            .find(|u| u.google_id == google_id)
            .cloned()
    }

    fn create_user(&mut self, new: NewUser) -> Result<User, StoreError> {
        for user in self.users.values() {
            if user.google_id == new.google_id {
                return Err(StoreError::Duplicate("googleId"));
            }
            if user.username == new.username {
                return Err(StoreError::Duplicate("username"));
            }
            if user.email == new.email {
                return Err(StoreError::Duplicate("email"));
            }
        }

        let id = self.next_id;
        self.next_id += 1;
        let user = new.into_user(id);
        self.users.insert(id, user.clone());
        log::debug!("Created user {} ({})", id, user.username);
        Ok(user)
    }

    fn update_high_score(&mut self, id: u64, score: u64) -> Result<User, StoreError> {
        let user = self.users.get_mut(&id).ok_or(StoreError::NotFound)?;
        if score > user.high_score {
            log::debug!("User {} high score {} -> {}", id, user.high_score, score);
            user.high_score = score;
        }
        Ok(user.clone())
    }

    fn top_scores(&self, limit: usize) -> Vec<User> {
        let mut users: Vec<User> = self.users.values().cloned().collect();
        users.sort_by(|a, b| b.high_score.cmp(&a.high_score));
        users.truncate(limit);
        users
    }
}
