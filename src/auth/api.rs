//! Authentication API Endpoints
//! Mission: Exchange credentials for a bearer token

use crate::auth::{
    jwt::JwtHandler,
    manager::{AuthenticationManager, LoginError},
    models::AuthenticationRequest,
    user_store::UserDirectory,
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Shared auth state
#[derive(Clone)]
pub struct AuthState {
    pub manager: Arc<AuthenticationManager>,
    pub users: Arc<dyn UserDirectory>,
    pub jwt_handler: Arc<JwtHandler>,
}

impl AuthState {
    pub fn new(users: Arc<dyn UserDirectory>, jwt_handler: Arc<JwtHandler>) -> Self {
        Self {
            manager: Arc::new(AuthenticationManager::new(users.clone())),
            users,
            jwt_handler,
        }
    }
}

/// Login endpoint - POST /api/v1/auth/authenticate
///
/// Responds with the raw token as a plain-text body.
pub async fn authenticate(
    State(state): State<AuthState>,
    Json(payload): Json<AuthenticationRequest>,
) -> Result<String, AuthApiError> {
    let AuthenticationRequest { email, password } = payload;
    info!("Login attempt: {}", email);

    let manager = state.manager.clone();
    let candidate = email.clone();
    tokio::task::spawn_blocking(move || manager.authenticate(&candidate, &password))
        .await
        .map_err(|e| {
            error!("Credential check panicked: {}", e);
            AuthApiError::InternalError
        })?
        .map_err(|e| {
            warn!("Failed login attempt: {}", email);
            AuthApiError::from(e)
        })?;

    let user = state.users.find_by_email(&email).map_err(|e| {
        error!("User vanished after successful login: {}", e);
        AuthApiError::LookupFailed
    })?;

    let token = state.jwt_handler.issue(&user).map_err(|e| {
        error!("Token issuance failed for {}: {:#}", user.email, e);
        AuthApiError::InternalError
    })?;

    info!("Login successful: {} ({})", user.email, user.role);

    Ok(token)
}

/// Auth API errors
#[derive(Debug)]
pub enum AuthApiError {
    InvalidCredentials,
    LookupFailed,
    InternalError,
}

impl From<LoginError> for AuthApiError {
    fn from(e: LoginError) -> Self {
        match e {
            LoginError::InvalidCredentials => AuthApiError::InvalidCredentials,
        }
    }
}

impl IntoResponse for AuthApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthApiError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid email or password")
            }
            AuthApiError::LookupFailed => (StatusCode::BAD_REQUEST, "Some error has occurred"),
            AuthApiError::InternalError => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (status, message).into_response()
    }
}
