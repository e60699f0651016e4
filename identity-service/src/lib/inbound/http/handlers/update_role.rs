use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::IdentityData;
use crate::domain::identity::gate::AuthenticatedIdentity;
use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::models::Role;
use crate::inbound::http::router::AppState;

pub async fn update_role(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedIdentity>,
    Path(email): Path<String>,
    Json(body): Json<UpdateRoleRequest>,
) -> Result<ApiSuccess<IdentityData>, ApiError> {
    let email = EmailAddress::new(email)?;
    let role: Role = body.role.parse()?;

    let identity = state
        .session_service
        .update_role(&email, role)
        .await
        .map_err(ApiError::from)?;
    tracing::info!("{} changed role of {} to {}", caller.email(), email, role);

    Ok(ApiSuccess::new(StatusCode::OK, (&identity).into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateRoleRequest {
    role: String,
}
