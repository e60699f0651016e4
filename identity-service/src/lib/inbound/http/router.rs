use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::forgot_password::forgot_password;
use super::handlers::get_identity::get_identity;
use super::handlers::get_identity::get_me;
use super::handlers::login::login;
use super::handlers::logout::logout;
use super::handlers::refresh::refresh;
use super::handlers::register::register;
use super::handlers::reset_password::reset_password;
use super::handlers::update_profile::update_profile;
use super::handlers::update_role::update_role;
use super::handlers::verify_otp::verify_otp;
use super::middleware::authenticate as auth_middleware;
use super::middleware::require_admin;
use crate::domain::identity::ports::AuthGatePort;
use crate::domain::identity::ports::Clock;
use crate::domain::identity::ports::SessionServicePort;

#[derive(Clone)]
pub struct AppState {
    pub session_service: Arc<dyn SessionServicePort>,
    pub auth_gate: Arc<dyn AuthGatePort>,
    /// Stamps verification and reset submissions. Share it with the service.
    pub clock: Arc<dyn Clock>,
}

pub fn create_router(
    session_service: Arc<dyn SessionServicePort>,
    auth_gate: Arc<dyn AuthGatePort>,
    clock: Arc<dyn Clock>,
    request_timeout: Duration,
) -> Router {
    let state = AppState {
        session_service,
        auth_gate,
        clock,
    };

    let public_routes = Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/verify-otp", post(verify_otp))
        .route("/api/auth/login", post(login))
        .route("/api/auth/refresh", post(refresh))
        .route("/api/auth/forgot-password", post(forgot_password))
        .route("/api/auth/reset-password", post(reset_password));

    let protected_routes = Router::new()
        .route("/api/auth/logout", post(logout))
        .route("/api/users/me", get(get_me).patch(update_profile))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Layers run bottom-up: the auth gate before the role gate
    let admin_routes = Router::new()
        .route("/api/users/:email", get(get_identity))
        .route("/api/users/:email/role", put(update_role))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // No headers in the span: they carry bearer tokens
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(admin_routes)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
