//! JWT token handling

use crate::config::JwtConfig;
use crate::domain::StringUuid;
use crate::error::{AppError, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Audience stamped into every session token
pub const SESSION_AUDIENCE: &str = "tms-api";

const SESSION_TOKEN_TYPE: &str = "session";

/// Session token claims (issued by login)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Session ID, checked against the sessions table on every request
    pub sid: String,
    pub email: String,
    pub iss: String,
    pub aud: String,
    /// Token type discriminator
    #[serde(default)]
    pub token_type: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// JWT token manager
#[derive(Clone)]
pub struct JwtManager {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtManager {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Lifetime of issued tokens, in seconds
    pub fn token_ttl_secs(&self) -> i64 {
        self.config.token_ttl_secs
    }

    /// Validation with a 5 second leeway instead of the default 60.
    fn strict_validation(&self) -> Validation {
        let mut v = Validation::new(Algorithm::HS256);
        v.leeway = 5;
        v.set_audience(&[SESSION_AUDIENCE]);
        v.set_issuer(&[&self.config.issuer]);
        v
    }

    /// Create a session token bound to `session_id`
    pub fn create_session_token(
        &self,
        user_id: i64,
        email: &str,
        session_id: StringUuid,
    ) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.config.token_ttl_secs);

        let claims = SessionClaims {
            sub: user_id.to_string(),
            sid: session_id.to_string(),
            email: email.to_string(),
            iss: self.config.issuer.clone(),
            aud: SESSION_AUDIENCE.to_string(),
            token_type: SESSION_TOKEN_TYPE.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };
        let header = Header::new(Algorithm::HS256);
        encode(&header, &claims, &self.encoding_key).map_err(|e| AppError::Internal(e.into()))
    }

    /// Verify and decode a session token
    pub fn verify_session_token(&self, token: &str) -> Result<SessionClaims> {
        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &self.strict_validation())?;
        if token_data.claims.token_type != SESSION_TOKEN_TYPE {
            return Err(AppError::Unauthorized("Unauthenticated.".to_string()));
        }
        Ok(token_data.claims)
    }
}
