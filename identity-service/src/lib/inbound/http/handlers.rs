use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::domain::identity::errors::EmailError;
use crate::domain::identity::errors::ErrorKind;
use crate::domain::identity::errors::RoleError;
use crate::domain::identity::errors::SessionError;
use crate::domain::identity::gate::GateError;
use crate::domain::identity::models::Identity;

pub mod forgot_password;
pub mod get_identity;
pub mod login;
pub mod logout;
pub mod refresh;
pub mod register;
pub mod reset_password;
pub mod update_profile;
pub mod update_role;
pub mod verify_otp;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    UnprocessableEntity(String),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
    Gone(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Gone(msg) => (StatusCode::GONE, msg),
        };

        (status, Json(ApiResponseBody::new_error(status, message))).into_response()
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err.kind() {
            ErrorKind::Validation => ApiError::UnprocessableEntity(err.to_string()),
            ErrorKind::Conflict => ApiError::Conflict(err.to_string()),
            ErrorKind::NotFound => ApiError::NotFound(err.to_string()),
            ErrorKind::Expired => ApiError::Gone(err.to_string()),
            ErrorKind::InvalidCredentials
            | ErrorKind::InvalidToken
            | ErrorKind::Unauthorized => ApiError::Unauthorized(err.to_string()),
            ErrorKind::InvalidCode => ApiError::BadRequest(err.to_string()),
            ErrorKind::Internal => {
                tracing::error!("Request failed: {}", err);
                ApiError::InternalServerError("Internal server error".to_string())
            }
        }
    }
}

impl From<EmailError> for ApiError {
    fn from(err: EmailError) -> Self {
        SessionError::from(err).into()
    }
}

impl From<RoleError> for ApiError {
    fn from(err: RoleError) -> Self {
        SessionError::from(err).into()
    }
}

impl From<GateError> for ApiError {
    fn from(err: GateError) -> Self {
        match err {
            GateError::MalformedHeader => ApiError::BadRequest(err.to_string()),
            GateError::Store(_) => {
                tracing::error!("Auth gate failed: {}", err);
                ApiError::InternalServerError("Internal server error".to_string())
            }
            _ => ApiError::Unauthorized(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}

/// Plain acknowledgement for flows with nothing else to return
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageData {
    pub message: String,
}

impl MessageData {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Public view of an identity. Never includes the hash or pending code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityData {
    pub email: String,
    pub username: String,
    pub bio: String,
    pub role: String,
    pub verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Identity> for IdentityData {
    fn from(identity: &Identity) -> Self {
        Self {
            email: identity.email.to_string(),
            username: identity.username.clone(),
            bio: identity.bio.clone(),
            role: identity.role.to_string(),
            verified: identity.verified,
            provider: identity.provider.clone(),
            created_at: identity.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_errors_map_to_statuses() {
        let cases = [
            (
                SessionError::from(EmailError::InvalidFormat("x".to_string())),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                SessionError::AlreadyExists("a@b.com".to_string()),
                StatusCode::CONFLICT,
            ),
            (
                SessionError::NotFound("a@b.com".to_string()),
                StatusCode::NOT_FOUND,
            ),
            (SessionError::CodeExpired, StatusCode::GONE),
            (SessionError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (SessionError::InvalidCode, StatusCode::BAD_REQUEST),
            (
                SessionError::DatabaseError("down".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            let response = ApiError::from(err).into_response();
            assert_eq!(response.status(), status);
        }
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let err = ApiError::from(SessionError::DatabaseError(
            "connection refused at 10.0.0.5".to_string(),
        ));
        assert_eq!(
            err,
            ApiError::InternalServerError("Internal server error".to_string())
        );
    }

    #[test]
    fn test_gate_errors_map_to_statuses() {
        assert_eq!(
            ApiError::from(GateError::MalformedHeader).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(GateError::LoggedOut).into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(GateError::Store("down".to_string()))
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
