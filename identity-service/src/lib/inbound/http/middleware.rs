use axum::extract::Request;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::identity::gate::AuthenticatedIdentity;
use crate::domain::identity::gate::GateError;
use crate::domain::identity::gate::RoleGate;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Middleware that runs the auth gate and adds the caller to request extensions
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let authorization = match req.headers().get(AUTHORIZATION) {
        Some(value) => Some(
            value
                .to_str()
                .map_err(|_| ApiError::from(GateError::MalformedHeader))?
                .to_string(),
        ),
        None => None,
    };

    let caller = state
        .auth_gate
        .authenticate(authorization.as_deref())
        .await
        .map_err(|e| {
            tracing::warn!("Request rejected by auth gate: {}", e);
            ApiError::from(e)
        })?;

    req.extensions_mut().insert(caller);

    Ok(next.run(req).await)
}

/// Middleware that admits only admins. Must run after [`authenticate`].
pub async fn require_admin(req: Request, next: Next) -> Result<Response, ApiError> {
    let caller = req
        .extensions()
        .get::<AuthenticatedIdentity>()
        .ok_or(GateError::MissingHeader)?;

    RoleGate::require_admin(caller).map_err(|e| {
        tracing::warn!("{} denied admin route: {}", caller.email(), e);
        ApiError::from(e)
    })?;

    Ok(next.run(req).await)
}
