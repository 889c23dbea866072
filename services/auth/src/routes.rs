//! Authentication service routes

use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::{
    AppState,
    jwt::{TokenType, hash_token},
    middleware::auth_middleware,
    models::{LoginCredentials, NewAccount, NewSession},
    validation::{normalize_identifier, validate_email, validate_password, validate_username},
};

/// Response for token generation
#[derive(Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Request for token refresh
#[derive(Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Request for password change
#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Create the router for the authentication service
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/auth/password", post(change_password))
        .route("/auth/register", post(register))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/health", get(health_check))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh_token))
        .route("/auth/logout", post(logout))
        .merge(protected)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "auth-service"
    }))
}

/// Login endpoint
///
/// Accepts a username, an email (case insensitively), or an employee number
/// as the identifier. A failed lookup and a failed password check produce
/// the same response, so the endpoint does not leak which accounts exist.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginCredentials>,
) -> Result<impl IntoResponse, AuthError> {
    let identifier = normalize_identifier(&payload.identifier);
    info!("Login attempt for identifier: {}", identifier);

    let account = state
        .account_repository
        .find_by_identifier(&identifier)
        .await
        .map_err(internal)?
        .ok_or(AuthError::Unauthorized)?;

    let verified = state
        .account_repository
        .verify_password(&account, &payload.password)
        .map_err(internal)?;

    if !verified {
        warn!("Failed login for account {}", account.id);
        return Err(AuthError::Unauthorized);
    }

    let role = state
        .account_repository
        .role_of(account.id)
        .await
        .map_err(internal)?
        .unwrap_or_else(|| "EMPLOYEE".to_string());

    let access_token = state
        .jwt_service
        .generate_access_token(account.id, &role)
        .map_err(internal)?;
    let refresh_token = state
        .jwt_service
        .generate_refresh_token(account.id)
        .map_err(internal)?;

    state
        .session_repository
        .create(&NewSession {
            account_id: account.id,
            token_hash: hash_token(&refresh_token),
            expires_at: refresh_expiry(&state),
        })
        .await
        .map_err(internal)?;

    info!("Account {} logged in", account.id);

    Ok((
        StatusCode::OK,
        Json(TokenResponse {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: state.jwt_service.access_token_expiry(),
        }),
    ))
}

/// Refresh token endpoint
///
/// The presented refresh token must both validate and still have a live
/// session row; a token revoked by logout fails here even before its
/// expiry. The token is rotated on every refresh.
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(payload): Json<RefreshTokenRequest>,
) -> Result<impl IntoResponse, AuthError> {
    let claims = state
        .jwt_service
        .validate_token(&payload.refresh_token)
        .map_err(|_| AuthError::Unauthorized)?;

    if claims.token_type != TokenType::Refresh {
        return Err(AuthError::Unauthorized);
    }

    let token_hash = hash_token(&payload.refresh_token);
    let session = state
        .session_repository
        .find_valid(&token_hash)
        .await
        .map_err(internal)?
        .ok_or(AuthError::Unauthorized)?;

    if session.account_id != claims.sub {
        return Err(AuthError::Unauthorized);
    }

    let role = state
        .account_repository
        .role_of(claims.sub)
        .await
        .map_err(internal)?
        .unwrap_or_else(|| "EMPLOYEE".to_string());

    let access_token = state
        .jwt_service
        .generate_access_token(claims.sub, &role)
        .map_err(internal)?;
    let new_refresh_token = state
        .jwt_service
        .generate_refresh_token(claims.sub)
        .map_err(internal)?;

    // Rotate: retire the presented token, then register its replacement.
    state
        .session_repository
        .revoke(&token_hash)
        .await
        .map_err(internal)?;
    state
        .session_repository
        .create(&NewSession {
            account_id: claims.sub,
            token_hash: hash_token(&new_refresh_token),
            expires_at: refresh_expiry(&state),
        })
        .await
        .map_err(internal)?;

    Ok((
        StatusCode::OK,
        Json(TokenResponse {
            access_token,
            refresh_token: new_refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: state.jwt_service.access_token_expiry(),
        }),
    ))
}

/// Logout endpoint
pub async fn logout(
    State(state): State<AppState>,
    Json(payload): Json<RefreshTokenRequest>,
) -> Result<impl IntoResponse, AuthError> {
    let claims = state
        .jwt_service
        .validate_token(&payload.refresh_token)
        .map_err(|_| AuthError::Unauthorized)?;

    if claims.token_type != TokenType::Refresh {
        return Err(AuthError::Unauthorized);
    }

    state
        .session_repository
        .revoke(&hash_token(&payload.refresh_token))
        .await
        .map_err(internal)?;

    info!("Account {} logged out", claims.sub);

    Ok((
        StatusCode::OK,
        Json(serde_json::json!({"message": "Logged out successfully"})),
    ))
}

/// Password change endpoint
///
/// Requires a valid access token plus the current password, and revokes
/// every open session of the account on success.
pub async fn change_password(
    State(state): State<AppState>,
    Extension(account_id): Extension<uuid::Uuid>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<impl IntoResponse, AuthError> {
    validate_password(&payload.new_password).map_err(AuthError::Validation)?;

    let account = state
        .account_repository
        .find_by_id(account_id)
        .await
        .map_err(internal)?
        .ok_or(AuthError::Unauthorized)?;

    let verified = state
        .account_repository
        .verify_password(&account, &payload.current_password)
        .map_err(internal)?;

    if !verified {
        return Err(AuthError::Unauthorized);
    }

    state
        .account_repository
        .update_password(account.id, &payload.new_password)
        .await
        .map_err(internal)?;

    state
        .session_repository
        .revoke_for_account(account.id)
        .await
        .map_err(internal)?;

    Ok((
        StatusCode::OK,
        Json(serde_json::json!({"message": "Password updated"})),
    ))
}

/// Account provisioning endpoint
///
/// Creates a bare account not yet linked to an employee profile. Reserved
/// for HR-class callers; the usual path provisions accounts together with
/// the employee record.
pub async fn register(
    State(state): State<AppState>,
    Extension(account_id): Extension<uuid::Uuid>,
    Json(payload): Json<NewAccount>,
) -> Result<impl IntoResponse, AuthError> {
    let role = state
        .account_repository
        .role_of(account_id)
        .await
        .map_err(internal)?
        .unwrap_or_default();
    if role != "HR" && role != "ADMIN" {
        return Err(AuthError::Unauthorized);
    }

    validate_username(&payload.username).map_err(AuthError::Validation)?;
    validate_email(&payload.email).map_err(AuthError::Validation)?;
    validate_password(&payload.password).map_err(AuthError::Validation)?;

    let account = state
        .account_repository
        .create(&payload)
        .await
        .map_err(internal)?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "id": account.id,
            "username": account.username,
            "email": account.email,
        })),
    ))
}

fn refresh_expiry(state: &AppState) -> DateTime<Utc> {
    Utc::now() + Duration::seconds(state.jwt_service.refresh_token_expiry() as i64)
}

fn internal(e: anyhow::Error) -> AuthError {
    error!("Authentication service error: {}", e);
    AuthError::InternalServerError
}

/// Custom error type for authentication errors
#[derive(Debug)]
pub enum AuthError {
    Unauthorized,
    Validation(String),
    InternalServerError,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AuthError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AuthError::Validation(message) => (StatusCode::UNPROCESSABLE_ENTITY, message),
            AuthError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(serde_json::json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
