//! Login, session verification and account creation

use crate::domain::{CreateUserInput, LoginInput, LoginResponse, StringUuid, User};
use crate::error::{AppError, Result};
use crate::jwt::{JwtManager, SessionClaims};
use crate::repository::{SessionRepository, UserRepository};
use argon2::{
    password_hash::{PasswordHasher, SaltString},
    Argon2, PasswordHash, PasswordVerifier,
};
use std::sync::Arc;
use tracing::{debug, info};
use validator::Validate;

const INVALID_CREDENTIALS: &str = "Invalid credentials";
const UNAUTHENTICATED: &str = "Unauthenticated.";

pub struct AuthService<U: UserRepository, S: SessionRepository> {
    user_repo: Arc<U>,
    session_repo: Arc<S>,
    jwt_manager: JwtManager,
}

impl<U: UserRepository, S: SessionRepository> AuthService<U, S> {
    pub fn new(user_repo: Arc<U>, session_repo: Arc<S>, jwt_manager: JwtManager) -> Self {
        Self {
            user_repo,
            session_repo,
            jwt_manager,
        }
    }

    pub fn jwt_manager(&self) -> &JwtManager {
        &self.jwt_manager
    }

    /// Check credentials, open a session and issue a token bound to it
    pub async fn login(&self, input: LoginInput) -> Result<LoginResponse> {
        input.validate()?;
        let (Some(email), Some(password)) = (input.email, input.password) else {
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        let Some(user) = self.user_repo.find_by_email(&email).await? else {
            debug!("Login rejected: unknown email");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        if !verify_password(&password, &user.password_hash)? {
            debug!(user_id = user.id, "Login rejected: wrong password");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let session = self.session_repo.create(user.id).await?;
        let token = self
            .jwt_manager
            .create_session_token(user.id, &user.email, session.id)?;

        info!(user_id = user.id, session_id = %session.id, "User logged in");

        Ok(LoginResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt_manager.token_ttl_secs(),
        })
    }

    /// Verify a bearer token and the session it is bound to
    pub async fn authenticate(&self, token: &str) -> Result<SessionClaims> {
        let claims = self.jwt_manager.verify_session_token(token)?;
        let session_id: StringUuid = claims
            .sid
            .parse()
            .map_err(|_| AppError::Unauthorized(UNAUTHENTICATED.to_string()))?;

        let session = self
            .session_repo
            .find_by_id(session_id)
            .await?
            .filter(|s| s.is_active() && s.user_id.to_string() == claims.sub)
            .ok_or_else(|| {
                debug!(session_id = %session_id, "Token bound to inactive session");
                AppError::Unauthorized(UNAUTHENTICATED.to_string())
            })?;

        self.session_repo.update_last_active(session.id).await?;
        Ok(claims)
    }

    /// Revoke the session behind the caller's token
    pub async fn logout(&self, session_id: StringUuid) -> Result<()> {
        self.session_repo.revoke(session_id).await?;
        info!(session_id = %session_id, "Session revoked");
        Ok(())
    }

    pub async fn create_user(&self, name: &str, email: &str, password: &str) -> Result<User> {
        let input = CreateUserInput {
            name: name.to_string(),
            email: email.to_string(),
            password_hash: hash_password(password)?,
        };
        let user = self.user_repo.create(&input).await?;
        info!(user_id = user.id, "User created");
        Ok(user)
    }
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut rand::rngs::OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Verify a password against its stored hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid hash: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
