use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::ApiError;
use super::ApiSuccess;
use super::IdentityData;
use crate::domain::identity::gate::AuthenticatedIdentity;
use crate::domain::identity::models::EmailAddress;
use crate::inbound::http::router::AppState;

/// Profile of the caller, as loaded by the auth gate.
pub async fn get_me(
    Extension(caller): Extension<AuthenticatedIdentity>,
) -> ApiSuccess<IdentityData> {
    ApiSuccess::new(StatusCode::OK, (&caller.identity).into())
}

pub async fn get_identity(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<ApiSuccess<IdentityData>, ApiError> {
    let email = EmailAddress::new(email)?;

    state
        .session_service
        .get_by_email(&email)
        .await
        .map_err(ApiError::from)
        .map(|ref identity| ApiSuccess::new(StatusCode::OK, identity.into()))
}
