use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::ApiError;
use super::ApiSuccess;
use super::MessageData;
use crate::domain::identity::gate::AuthenticatedIdentity;
use crate::inbound::http::router::AppState;

/// Revokes the access token that authenticated this request.
pub async fn logout(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedIdentity>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    state
        .session_service
        .logout(caller.email(), &caller.access_token)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::OK, MessageData::new("Logged out")))
}
