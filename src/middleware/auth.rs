use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use chrono::{DateTime, Utc};
use futures::future::{ready, Ready};
use serde::Serialize;

use crate::errors::AppError;
use crate::utils::jwt::TokenIssuer;

/// Structure qui contient les infos de l'utilisateur authentifié
/// Utilisée comme extracteur dans les routes protégées
#[derive(Debug, Clone, Serialize)]
pub struct AuthUser {
    pub user_id: i32,
    pub username: Option<String>,
    pub role_id: Option<i32>,
    pub token_issued_at: DateTime<Utc>,
}

/// Extrait le token du header (format: "Bearer <token>")
fn bearer_token(req: &HttpRequest) -> Result<&str, AppError> {
    let header = req
        .headers()
        .get("Authorization")
        .ok_or_else(|| AppError::Unauthorized("No token provided".to_string()))?;

    let value = header
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid Authorization header".to_string()))?;

    match value.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        _ => Err(AppError::Unauthorized(
            "Invalid Authorization format (expected: Bearer <token>)".to_string(),
        )),
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthUser, AppError> {
    let token = bearer_token(req)?;

    let issuer = req
        .app_data::<web::Data<TokenIssuer>>()
        .ok_or_else(|| AppError::Internal("TokenIssuer not registered".to_string()))?;

    let identity = issuer.verify(token).map_err(|e| {
        tracing::warn!(error = %e, "Error verifying JWT");
        AppError::from(e)
    })?;

    tracing::debug!(user_id = identity.user_id, "Token verified");

    Ok(AuthUser {
        user_id: identity.user_id,
        username: identity.username,
        role_id: identity.role_id,
        token_issued_at: identity.issued_at,
    })
}

/// Implémentation de FromRequest pour AuthUser
/// Cela permet à Actix-Web d'extraire automatiquement AuthUser des requêtes
impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
