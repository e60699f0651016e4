use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::IdentityData;
use crate::domain::identity::gate::AuthenticatedIdentity;
use crate::domain::identity::models::UpdateProfileCommand;
use crate::inbound::http::router::AppState;

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedIdentity>,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<ApiSuccess<IdentityData>, ApiError> {
    let command = UpdateProfileCommand {
        username: body.username,
        bio: body.bio,
    };

    state
        .session_service
        .update_profile(caller.email(), command)
        .await
        .map_err(ApiError::from)
        .map(|ref identity| ApiSuccess::new(StatusCode::OK, identity.into()))
}

/// Only provided fields are updated
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateProfileRequest {
    username: Option<String>,
    bio: Option<String>,
}
