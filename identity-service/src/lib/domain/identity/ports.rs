use async_trait::async_trait;
use auth::OneTimeCodeGenerator;
use auth::TokenPair;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::identity::errors::MailerError;
use crate::domain::identity::errors::SessionError;
use crate::domain::identity::gate::AuthenticatedIdentity;
use crate::domain::identity::gate::GateError;
use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::models::ExternalSignInCommand;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::RefreshRecord;
use crate::domain::identity::models::RegisterCommand;
use crate::domain::identity::models::ResetPasswordCommand;
use crate::domain::identity::models::ResetRequest;
use crate::domain::identity::models::RevocationEntry;
use crate::domain::identity::models::Role;
use crate::domain::identity::models::UpdateProfileCommand;

/// Port for identity and session lifecycle operations.
#[async_trait]
pub trait SessionServicePort: Send + Sync + 'static {
    /// Register a new identity and email it a verification code.
    ///
    /// # Arguments
    /// * `command` - Validated email, password, and profile fields
    ///
    /// # Returns
    /// Created, unverified identity
    ///
    /// # Errors
    /// * `AlreadyExists` - Email is already registered
    /// * `Mail` - Verification code could not be delivered (nothing is stored)
    /// * `DatabaseError` - Database operation failed
    async fn register(&self, command: RegisterCommand) -> Result<Identity, SessionError>;

    /// Confirm a pending registration.
    ///
    /// Expiry or a wrong code deletes the pending identity.
    ///
    /// # Arguments
    /// * `email` - Identity to verify
    /// * `code` - Submitted code
    /// * `submitted_at` - Instant the code was submitted
    ///
    /// # Errors
    /// * `NotFound` - No such identity
    /// * `AlreadyVerified` - Identity has no pending code
    /// * `CodeExpired` - Submitted after the validity window
    /// * `InvalidCode` - Code does not match
    async fn verify_otp(
        &self,
        email: &EmailAddress,
        code: &str,
        submitted_at: DateTime<Utc>,
    ) -> Result<Identity, SessionError>;

    /// Check credentials and open a session.
    ///
    /// # Returns
    /// Fresh access and refresh tokens
    ///
    /// # Errors
    /// * `NotFound` - No such identity
    /// * `InvalidCredentials` - Password mismatch
    async fn login(&self, email: &EmailAddress, password: &str)
        -> Result<TokenPair, SessionError>;

    /// Exchange a refresh token for a new pair. The presented token is consumed.
    ///
    /// # Errors
    /// * `InvalidToken` - Unparseable, wrongly signed, or not a refresh token
    /// * `SessionExpired` - Refresh token expired
    /// * `RefreshRecordNotFound` - Token is not the current one for its email
    /// * `NotFound` - Identity was removed
    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, SessionError>;

    /// Revoke an access token and end the refresh session.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn logout(&self, email: &EmailAddress, access_token: &str) -> Result<(), SessionError>;

    /// Email a password reset token, replacing any earlier one.
    ///
    /// # Errors
    /// * `NotFound` - No such identity
    /// * `Mail` - Token could not be delivered
    async fn forgot_password(&self, email: &EmailAddress) -> Result<(), SessionError>;

    /// Set a new password using an emailed reset token.
    ///
    /// Expiry or a wrong token deletes the reset request.
    ///
    /// # Arguments
    /// * `command` - Email, token, and new password
    /// * `requested_at` - Instant the reset was submitted
    ///
    /// # Errors
    /// * `NotFound` - No such identity
    /// * `ResetRequestNotFound` - No outstanding reset for this email
    /// * `ResetTokenExpired` - Submitted after the validity window
    /// * `InvalidToken` - Token does not match
    /// * `WeakPassword` - New password fails the policy; the request is kept
    async fn reset_password(
        &self,
        command: ResetPasswordCommand,
        requested_at: DateTime<Utc>,
    ) -> Result<(), SessionError>;

    /// Retrieve identity by email.
    ///
    /// # Errors
    /// * `NotFound` - No such identity
    async fn get_by_email(&self, email: &EmailAddress) -> Result<Identity, SessionError>;

    /// Change the role of an identity.
    ///
    /// # Errors
    /// * `NotFound` - No such identity
    async fn update_role(&self, email: &EmailAddress, role: Role)
        -> Result<Identity, SessionError>;

    /// Change display name and/or bio.
    ///
    /// # Errors
    /// * `NotFound` - No such identity
    async fn update_profile(
        &self,
        email: &EmailAddress,
        command: UpdateProfileCommand,
    ) -> Result<Identity, SessionError>;

    /// Sign in through an external provider, creating a verified identity
    /// on first use.
    ///
    /// Domain-only hook with no HTTP route. The caller must have completed
    /// the provider exchange already, since `command.email` is trusted as is.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn complete_external_sign_in(
        &self,
        command: ExternalSignInCommand,
    ) -> Result<TokenPair, SessionError>;
}

/// Port for the per-request authentication check.
#[async_trait]
pub trait AuthGatePort: Send + Sync + 'static {
    /// Resolve an `Authorization` header value to an authenticated identity.
    ///
    /// # Errors
    /// See [`GateError`] for each rejection.
    async fn authenticate(
        &self,
        authorization: Option<&str>,
    ) -> Result<AuthenticatedIdentity, GateError>;
}

/// Persistence for identities, reset requests, refresh records, and revocations.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Persist a new identity.
    ///
    /// # Errors
    /// * `AlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create_identity(&self, identity: Identity) -> Result<Identity, SessionError>;

    /// Retrieve identity by email (None if not found).
    async fn find_identity(&self, email: &EmailAddress)
        -> Result<Option<Identity>, SessionError>;

    /// Overwrite an existing identity.
    ///
    /// # Errors
    /// * `NotFound` - Identity does not exist
    async fn update_identity(&self, identity: Identity) -> Result<Identity, SessionError>;

    /// Remove an identity.
    ///
    /// # Returns
    /// True if a row was removed
    async fn delete_identity(&self, email: &EmailAddress) -> Result<bool, SessionError>;

    /// Insert or replace the reset request for its email.
    async fn save_reset_request(&self, request: ResetRequest) -> Result<(), SessionError>;

    async fn find_reset_request(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<ResetRequest>, SessionError>;

    async fn delete_reset_request(&self, email: &EmailAddress) -> Result<(), SessionError>;

    /// Insert or replace the refresh record for its email.
    async fn save_refresh_record(&self, record: RefreshRecord) -> Result<(), SessionError>;

    /// Atomically delete the refresh record if it holds exactly `token`.
    ///
    /// # Returns
    /// True if the record matched and was removed
    async fn consume_refresh_record(
        &self,
        email: &EmailAddress,
        token: &str,
    ) -> Result<bool, SessionError>;

    async fn delete_refresh_record(&self, email: &EmailAddress) -> Result<(), SessionError>;

    /// Record a revoked access token. Repeating an entry is a no-op.
    async fn revoke(&self, entry: RevocationEntry) -> Result<(), SessionError>;

    async fn is_revoked(&self, email: &EmailAddress, token: &str) -> Result<bool, SessionError>;
}

/// Outbound email delivery.
#[async_trait]
pub trait Mailer: Send + Sync + 'static {
    /// Send a registration verification code.
    ///
    /// # Errors
    /// * `RequestFailed` - Provider unreachable or timed out
    /// * `Rejected` - Provider refused the message
    async fn send_verification_code(
        &self,
        to: &EmailAddress,
        code: &str,
    ) -> Result<(), MailerError>;

    /// Send a password reset token.
    ///
    /// # Errors
    /// * `RequestFailed` - Provider unreachable or timed out
    /// * `Rejected` - Provider refused the message
    async fn send_reset_token(&self, to: &EmailAddress, token: &str) -> Result<(), MailerError>;
}

/// Source of one-time codes and reset tokens.
pub trait CodeGenerator: Send + Sync + 'static {
    fn generate(&self) -> String;
}

impl CodeGenerator for OneTimeCodeGenerator {
    fn generate(&self) -> String {
        OneTimeCodeGenerator::generate(self)
    }
}

/// Source of the current instant.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
