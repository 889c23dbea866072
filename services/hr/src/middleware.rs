//! Authentication middleware: JWT validation and actor resolution

use axum::{
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::env;
use tracing::error;
use uuid::Uuid;

use crate::{error::HrError, state::AppState};

/// JWT claims issued by the auth service
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Account ID
    pub sub: Uuid,
    /// Role code at issue time
    pub role: String,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
    /// Token type (access or refresh)
    pub token_type: TokenType,
}

/// Token type enum
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub enum TokenType {
    Access,
    Refresh,
}

/// Validate the bearer token and load the actor behind it
///
/// The role and department scope are read from the employee record on
/// every request rather than trusted from the token, so a role change
/// takes effect without waiting for token expiry.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, HrError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or_else(unauthorized)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(unauthorized)?;

    let public_key = jwt_public_key().map_err(|e| {
        error!("Failed to load JWT public key: {}", e);
        HrError::Internal
    })?;

    let decoding_key = DecodingKey::from_rsa_pem(public_key.as_bytes()).map_err(|e| {
        error!("Failed to create decoding key: {}", e);
        HrError::Internal
    })?;

    let mut validation = Validation::new(jsonwebtoken::Algorithm::RS256);
    validation.validate_exp = true;

    let token_data = jsonwebtoken::decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|_| unauthorized())?;

    if token_data.claims.token_type != TokenType::Access {
        return Err(unauthorized());
    }

    let actor = state
        .employee_repository
        .resolve_actor(token_data.claims.sub)
        .await?
        .ok_or_else(|| HrError::Authorization("account has no employee profile".to_string()))?;

    req.extensions_mut().insert(actor);

    Ok(next.run(req).await)
}

fn unauthorized() -> HrError {
    HrError::Authorization("missing or invalid credentials".to_string())
}

/// Read the RS256 public key from `JWT_PUBLIC_KEY` (PEM text or a path)
fn jwt_public_key() -> Result<String, String> {
    let public_key = env::var("JWT_PUBLIC_KEY")
        .map_err(|_| "JWT_PUBLIC_KEY environment variable not set".to_string())?;

    if public_key.starts_with("-----BEGIN") {
        Ok(public_key)
    } else {
        std::fs::read_to_string(&public_key)
            .map_err(|e| format!("Failed to read public key file: {}", e))
            .map(|s| s.trim().to_string())
    }
}
