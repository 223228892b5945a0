// src/db/users.rs
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;

use crate::auth::AuthError;

#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    /// Normalized (trimmed, lowercase).
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public view of a user, without the password hash.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            email: u.email.clone(),
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

/// Process-lifetime user list. Nothing is persisted.
#[derive(Default)]
pub struct UserStore {
    users: RwLock<Vec<User>>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find_by_email(&self, email: &str) -> Option<User> {
        self.users
            .read()
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned()
    }

    pub fn find_by_id(&self, id: i64) -> Option<User> {
        self.users.read().iter().find(|u| u.id == id).cloned()
    }

    /// Inserts a user with the next free id. The existence check and the
    /// insert happen under one write lock.
    pub fn insert(
        &self,
        email: &str,
        password_hash: String,
        now: DateTime<Utc>,
    ) -> Result<User, AuthError> {
        let mut users = self.users.write();

        if users.iter().any(|u| u.email.eq_ignore_ascii_case(email)) {
            return Err(AuthError::EmailTaken(email.to_string()));
        }

        let id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        let user = User {
            id,
            email: email.to_string(),
            password_hash,
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(user)
    }
}
