//! User account service — application-layer orchestration
//!
//! HTTP handlers should be thin wrappers that delegate to this service.

use std::sync::Arc;

use tracing::info;

use crate::domain::{DomainError, DomainResult, RepositoryProvider, User};
use crate::infrastructure::crypto::jwt::{create_token, JwtConfig};
use crate::infrastructure::crypto::password::{hash_password, verify_password};

/// Issued after a successful signup or login
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: User,
}

pub struct UserService {
    repos: Arc<dyn RepositoryProvider>,
    jwt_config: JwtConfig,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, jwt_config: JwtConfig, bcrypt_cost: u32) -> Self {
        Self {
            repos,
            jwt_config,
            bcrypt_cost,
        }
    }

    pub fn jwt_config(&self) -> &JwtConfig {
        &self.jwt_config
    }

    // ── Authentication ──────────────────────────────────────────

    /// Authenticate by username or email + password and return a JWT.
    pub async fn login(&self, username_or_email: &str, password: &str) -> DomainResult<AuthResult> {
        let users = self.repos.users();
        let user = match users.find_by_username(username_or_email).await? {
            Some(user) => Some(user),
            None => users.find_by_email(username_or_email).await?,
        };

        let Some(user) = user else {
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        };

        let valid = verify_password(password, &user.password_hash).unwrap_or(false);
        if !valid {
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        }

        info!(user_id = %user.id, "User logged in");
        self.issue_token(user)
    }

    // ── Registration ────────────────────────────────────────────

    /// Create an account and log it in.
    pub async fn signup(&self, username: &str, email: &str, password: &str) -> DomainResult<AuthResult> {
        let username = username.trim();
        let email = email.trim();

        if username.chars().count() < 3 || username.chars().count() > 50 {
            return Err(DomainError::Validation(
                "Username must be 3-50 characters".into(),
            ));
        }
        if password.len() < 8 {
            return Err(DomainError::Validation(
                "Password must be at least 8 characters".into(),
            ));
        }
        if !email.contains('@') {
            return Err(DomainError::Validation("Invalid email address".into()));
        }

        let users = self.repos.users();
        if users.find_by_username(username).await?.is_some() {
            return Err(DomainError::Conflict("Username already exists".into()));
        }
        if users.find_by_email(email).await?.is_some() {
            return Err(DomainError::Conflict("Email already exists".into()));
        }

        let password_hash = hash_password(password, self.bcrypt_cost)
            .map_err(|e| DomainError::Validation(format!("Failed to hash password: {e}")))?;

        let user = User::new(username, email, password_hash);
        users.save(user.clone()).await?;

        info!(user_id = %user.id, username = %user.username, "New user registered");
        self.issue_token(user)
    }

    // ── Queries ─────────────────────────────────────────────────

    pub async fn get_user(&self, id: &str) -> DomainResult<User> {
        self.repos
            .users()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("User not found".into()))
    }

    fn issue_token(&self, user: User) -> DomainResult<AuthResult> {
        let token = create_token(&user.id, &user.username, &self.jwt_config)
            .map_err(|e| DomainError::Validation(format!("Failed to create token: {e}")))?;

        Ok(AuthResult {
            token,
            token_type: "Bearer".into(),
            expires_in: self.jwt_config.expiration_hours * 3600,
            user,
        })
    }
}

// ── Tests ──────────────────────────────────────────────────────
