use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::IdentityData;
use crate::domain::identity::errors::SessionError;
use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::models::NewPassword;
use crate::domain::identity::models::RegisterCommand;
use crate::inbound::http::router::AppState;

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<ApiSuccess<IdentityData>, ApiError> {
    state
        .session_service
        .register(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref identity| ApiSuccess::new(StatusCode::CREATED, identity.into()))
}

/// HTTP request body for registration (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequest {
    email: String,
    password: String,
    #[serde(default)]
    username: String,
    #[serde(default)]
    bio: String,
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<RegisterCommand, SessionError> {
        let email = EmailAddress::new(self.email)?;
        let password = NewPassword::new(self.password)?;
        Ok(RegisterCommand::new(email, password, self.username, self.bio))
    }
}
