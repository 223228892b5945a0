// src/auth/service.rs
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::jwt::{Claims, JwtService, TokenKind};
use crate::auth::token::{hash_password, verify_password};
use crate::auth::{AuthError, FieldError};
use crate::db::users::{User, UserResponse, UserStore};

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

/// Login, registration and token refresh over an in-memory user list.
pub struct AuthService {
    users: UserStore,
    jwt: JwtService,
}

impl AuthService {
    pub fn new(jwt: JwtService) -> Self {
        Self {
            users: UserStore::new(),
            jwt,
        }
    }

    /// Creates the demo account. An invalid or already registered demo
    /// email is logged and skipped.
    pub fn with_demo_user(self, email: &str, password: &str) -> Self {
        match self.create_user(email, password) {
            Ok(user) => info!(email = %user.email, "demo user created"),
            Err(e) => warn!(error = %e, "demo user not created"),
        }
        self
    }

    /// Trim + lowercase.
    pub fn normalize_email(email: &str) -> String {
        email.trim().to_lowercase()
    }

    pub fn validate(creds: &Credentials) -> Result<(), AuthError> {
        let mut errors = Vec::new();
        let email = Self::normalize_email(&creds.email);

        if email.is_empty() {
            errors.push(FieldError::new("email", "This field is required"));
        } else if !looks_like_email(&email) {
            errors.push(FieldError::new("email", "Please provide a valid email address"));
        }

        if creds.password.is_empty() {
            errors.push(FieldError::new("password", "This field is required"));
        } else if creds.password.chars().count() < MIN_PASSWORD_LEN {
            errors.push(FieldError::new(
                "password",
                &format!("This field must be at least {MIN_PASSWORD_LEN} characters"),
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AuthError::Validation(errors))
        }
    }

    pub fn login(&self, creds: &Credentials) -> Result<AuthResponse, AuthError> {
        Self::validate(creds)?;
        let email = Self::normalize_email(&creds.email);

        let user = self
            .users
            .find_by_email(&email)
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(&creds.password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        info!(user_id = user.id, "login");
        self.issue(&user)
    }

    pub fn register(&self, creds: &Credentials) -> Result<AuthResponse, AuthError> {
        Self::validate(creds)?;
        let user = self.create_user(&creds.email, &creds.password)?;
        info!(user_id = user.id, "user registered");
        self.issue(&user)
    }

    /// Exchanges a refresh token for a new token pair.
    pub fn refresh(&self, refresh_token: &str) -> Result<AuthResponse, AuthError> {
        let claims = self.jwt.verify_token(refresh_token, TokenKind::Refresh)?;
        let user = self
            .users
            .find_by_id(claims.user_id)
            .ok_or(AuthError::UserNotFound)?;
        self.issue(&user)
    }

    pub fn authenticate(&self, access_token: &str) -> Result<Claims, AuthError> {
        self.jwt.verify_token(access_token, TokenKind::Access)
    }

    pub fn profile(&self, user_id: i64) -> Result<UserResponse, AuthError> {
        self.users
            .find_by_id(user_id)
            .map(|u| UserResponse::from(&u))
            .ok_or(AuthError::UserNotFound)
    }

    fn create_user(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Self::normalize_email(email);
        if email.is_empty() {
            return Err(AuthError::Validation(vec![FieldError::new(
                "email",
                "This field is required",
            )]));
        }
        self.users.insert(&email, hash_password(password), Utc::now())
    }

    fn issue(&self, user: &User) -> Result<AuthResponse, AuthError> {
        Ok(AuthResponse {
            user: UserResponse::from(user),
            access_token: self.jwt.create_token(user.id, &user.email, TokenKind::Access)?,
            refresh_token: self.jwt.create_token(user.id, &user.email, TokenKind::Refresh)?,
            expires_in: self.jwt.access_ttl().num_seconds(),
        })
    }
}

/// One '@', non-empty local part, and a dotted domain without empty labels.
fn looks_like_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
        && !email.chars().any(char::is_whitespace)
}
