use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::JwtConfig;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("User ID required to generate token")]
    MissingUserId,

    #[error("Failed to generate token: {0}")]
    Signing(jsonwebtoken::errors::Error),

    #[error("Invalid or expired token: {0}")]
    Invalid(jsonwebtoken::errors::Error),

    #[error("Token payload invalid. User ID is required.")]
    BadPayload,

    #[error("Token expiry out of range")]
    ExpiryOutOfRange,
}

/// Contenu signé du token de session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub user_id: Option<i32>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub role_id: Option<i32>,
    pub timestamp: DateTime<Utc>, // date d'émission
    pub iat: i64,
    pub exp: i64,
}

/// Identité extraite d'un token valide
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionIdentity {
    pub user_id: i32,
    pub username: Option<String>,
    pub role_id: Option<i32>,
    pub issued_at: DateTime<Utc>,
}

/// Émet et vérifie les tokens de session. Aucun état côté serveur : le token
/// signé est le seul artefact.
#[derive(Clone)]
pub struct TokenIssuer {
    algorithm: Algorithm,
    expires_in: Duration,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenIssuer {
    pub fn new(secret: &str, algorithm: Algorithm, expires_in: Duration) -> Self {
        TokenIssuer {
            algorithm,
            expires_in,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn from_config(config: &JwtConfig) -> Self {
        Self::new(&config.secret, config.algorithm, config.expires_in)
    }

    /// Génère un JWT pour un utilisateur vérifié
    pub fn issue(
        &self,
        user_id: i32,
        username: Option<&str>,
        role_id: Option<i32>,
    ) -> Result<String, TokenError> {
        if user_id <= 0 {
            return Err(TokenError::MissingUserId);
        }

        let now = Utc::now();
        let expiration = now
            .checked_add_signed(self.expires_in)
            .ok_or(TokenError::ExpiryOutOfRange)?;

        let claims = Claims {
            user_id: Some(user_id),
            username: username.map(str::to_string),
            role_id,
            timestamp: now,
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        };

        tracing::debug!(user_id, ?role_id, "Generating JWT token");

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key).map_err(TokenError::Signing)
    }

    /// Vérifie et décode un JWT
    pub fn verify(&self, token: &str) -> Result<SessionIdentity, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(TokenError::Invalid)?;

        let user_id = match claims.user_id {
            Some(id) if id > 0 => id,
            _ => return Err(TokenError::BadPayload),
        };

        Ok(SessionIdentity {
            user_id,
            username: claims.username,
            role_id: claims.role_id,
            issued_at: claims.timestamp,
        })
    }
}
