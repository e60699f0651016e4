use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::TokenKind;
use thiserror::Error;

use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::Role;
use crate::domain::identity::ports::AuthGatePort;
use crate::domain::identity::ports::Clock;
use crate::domain::identity::ports::CredentialStore;
use crate::domain::identity::ports::SystemClock;

/// Caller identity attached to a request that passed the gate.
#[derive(Debug, Clone)]
pub struct AuthenticatedIdentity {
    pub identity: Identity,
    pub access_token: String,
}

impl AuthenticatedIdentity {
    pub fn email(&self) -> &EmailAddress {
        &self.identity.email
    }

    pub fn role(&self) -> Role {
        self.identity.role
    }
}

/// Reasons a request is turned away by the gates.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GateError {
    #[error("Missing authorization header")]
    MissingHeader,

    #[error("Invalid authorization header format, expected: Bearer <token>")]
    MalformedHeader,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    Expired,

    #[error("Access token required")]
    WrongTokenKind,

    #[error("Token has been logged out")]
    LoggedOut,

    #[error("User not found")]
    UserNotFound,

    #[error("Admin role required")]
    Forbidden,

    #[error("Credential store unavailable: {0}")]
    Store(String),
}

/// Per-request authentication check.
///
/// Steps, first failure wins: header present, `Bearer <token>` shape,
/// signature, expiry, access kind, not revoked, identity exists.
pub struct AuthGate<CS>
where
    CS: CredentialStore,
{
    store: Arc<CS>,
    authenticator: Arc<Authenticator>,
    clock: Arc<dyn Clock>,
}

impl<CS> AuthGate<CS>
where
    CS: CredentialStore,
{
    pub fn new(store: Arc<CS>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            store,
            authenticator,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

#[async_trait]
impl<CS> AuthGatePort for AuthGate<CS>
where
    CS: CredentialStore,
{
    async fn authenticate(
        &self,
        authorization: Option<&str>,
    ) -> Result<AuthenticatedIdentity, GateError> {
        let header = authorization.ok_or(GateError::MissingHeader)?;
        let token = bearer_token(header)?;

        let claims = self
            .authenticator
            .validate_token(token)
            .map_err(|_| GateError::InvalidToken)?;

        if self.authenticator.is_expired(&claims, self.clock.now()) {
            return Err(GateError::Expired);
        }

        if claims.kind != TokenKind::Access {
            return Err(GateError::WrongTokenKind);
        }

        let email = EmailAddress::new(claims.email).map_err(|_| GateError::InvalidToken)?;

        if self
            .store
            .is_revoked(&email, token)
            .await
            .map_err(|e| GateError::Store(e.to_string()))?
        {
            return Err(GateError::LoggedOut);
        }

        // Role comes from the stored identity, so demotions apply immediately
        let identity = self
            .store
            .find_identity(&email)
            .await
            .map_err(|e| GateError::Store(e.to_string()))?
            .ok_or(GateError::UserNotFound)?;

        Ok(AuthenticatedIdentity {
            identity,
            access_token: token.to_string(),
        })
    }
}

/// Admits only callers holding the admin role.
pub struct RoleGate;

impl RoleGate {
    pub fn require_admin(caller: &AuthenticatedIdentity) -> Result<(), GateError> {
        if caller.role() == Role::Admin {
            Ok(())
        } else {
            Err(GateError::Forbidden)
        }
    }
}

fn bearer_token(header: &str) -> Result<&str, GateError> {
    let (scheme, token) = header
        .split_once(' ')
        .ok_or(GateError::MalformedHeader)?;

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() || token.contains(' ') {
        return Err(GateError::MalformedHeader);
    }

    Ok(token)
}
