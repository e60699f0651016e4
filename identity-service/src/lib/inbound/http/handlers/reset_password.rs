use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::MessageData;
use crate::domain::identity::errors::SessionError;
use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::models::ResetPasswordCommand;
use crate::inbound::http::router::AppState;

pub async fn reset_password(
    State(state): State<AppState>,
    Json(body): Json<ResetPasswordRequest>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    let requested_at = state.clock.now();

    state
        .session_service
        .reset_password(body.try_into_command()?, requested_at)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::OK, MessageData::new("Password updated")))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResetPasswordRequest {
    email: String,
    token: String,
    new_password: String,
}

impl ResetPasswordRequest {
    fn try_into_command(self) -> Result<ResetPasswordCommand, SessionError> {
        Ok(ResetPasswordCommand {
            email: EmailAddress::new(self.email)?,
            token: self.token,
            new_password: self.new_password,
        })
    }
}
