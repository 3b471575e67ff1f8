// ============================
// crates/backend-lib/src/handlers/login.rs
// ============================
//! `POST /api/auth/login`
use crate::error::AppError;
use crate::validation::validate_login;
use crate::AppState;
use axum::{extract::State, Json};
use std::sync::Arc;
use userauth_common::{LoginRequest, Session};
use zeroize::Zeroize;

/// Authenticate and return a session, or an error envelope
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<Session>, AppError> {
    let LoginRequest {
        email,
        mut password,
    } = request;

    let result = match validate_login(&email, &password) {
        Ok(()) => state.login.login(&email, &password).await,
        Err(e) => Err(e.into()),
    };
    password.zeroize();

    result.map(Json)
}
