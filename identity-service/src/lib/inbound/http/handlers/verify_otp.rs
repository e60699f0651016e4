use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::IdentityData;
use crate::domain::identity::models::EmailAddress;
use crate::inbound::http::router::AppState;

pub async fn verify_otp(
    State(state): State<AppState>,
    Json(body): Json<VerifyOtpRequest>,
) -> Result<ApiSuccess<IdentityData>, ApiError> {
    let submitted_at = state.clock.now();
    let email = EmailAddress::new(body.email)?;

    state
        .session_service
        .verify_otp(&email, &body.code, submitted_at)
        .await
        .map_err(ApiError::from)
        .map(|ref identity| ApiSuccess::new(StatusCode::OK, identity.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VerifyOtpRequest {
    email: String,
    code: String,
}
