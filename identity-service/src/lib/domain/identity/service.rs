use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::OneTimeCodeGenerator;
use auth::TokenKind;
use auth::TokenPair;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::identity::errors::SessionError;
use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::models::ExternalSignInCommand;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::NewPassword;
use crate::domain::identity::models::PendingCode;
use crate::domain::identity::models::RefreshRecord;
use crate::domain::identity::models::RegisterCommand;
use crate::domain::identity::models::ResetPasswordCommand;
use crate::domain::identity::models::ResetRequest;
use crate::domain::identity::models::RevocationEntry;
use crate::domain::identity::models::Role;
use crate::domain::identity::models::SessionSettings;
use crate::domain::identity::models::UpdateProfileCommand;
use crate::domain::identity::ports::Clock;
use crate::domain::identity::ports::CodeGenerator;
use crate::domain::identity::ports::CredentialStore;
use crate::domain::identity::ports::Mailer;
use crate::domain::identity::ports::SessionServicePort;
use crate::domain::identity::ports::SystemClock;

/// Domain service implementation for the session lifecycle.
///
/// Concrete implementation of SessionServicePort with dependency injection.
pub struct SessionService<CS, M>
where
    CS: CredentialStore,
    M: Mailer,
{
    store: Arc<CS>,
    mailer: Arc<M>,
    authenticator: Arc<Authenticator>,
    code_generator: Arc<dyn CodeGenerator>,
    clock: Arc<dyn Clock>,
    settings: SessionSettings,
}

impl<CS, M> SessionService<CS, M>
where
    CS: CredentialStore,
    M: Mailer,
{
    /// Create a new session service with injected dependencies.
    ///
    /// Codes come from [`OneTimeCodeGenerator`] and time from the wall clock
    /// unless overridden.
    ///
    /// # Arguments
    /// * `store` - Credential persistence implementation
    /// * `mailer` - Outbound email implementation
    /// * `authenticator` - Password hashing and token issuance
    /// * `settings` - Code and reset token validity windows
    pub fn new(
        store: Arc<CS>,
        mailer: Arc<M>,
        authenticator: Arc<Authenticator>,
        settings: SessionSettings,
    ) -> Self {
        Self {
            store,
            mailer,
            authenticator,
            code_generator: Arc::new(OneTimeCodeGenerator::new()),
            clock: Arc::new(SystemClock),
            settings,
        }
    }

    pub fn with_code_generator(mut self, code_generator: Arc<dyn CodeGenerator>) -> Self {
        self.code_generator = code_generator;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    async fn find_existing(&self, email: &EmailAddress) -> Result<Identity, SessionError> {
        self.store
            .find_identity(email)
            .await?
            .ok_or_else(|| SessionError::NotFound(email.to_string()))
    }

    /// Issue a pair and make its refresh token the current one for `identity`.
    async fn open_session(
        &self,
        identity: &Identity,
        now: DateTime<Utc>,
    ) -> Result<TokenPair, SessionError> {
        let pair = self
            .authenticator
            .issue_tokens(identity.email.as_str(), identity.role.as_str(), now)
            .map_err(|e| SessionError::Token(e.to_string()))?;

        self.store
            .save_refresh_record(RefreshRecord {
                email: identity.email.clone(),
                token: pair.refresh_token.clone(),
                issued_at: now,
            })
            .await?;

        Ok(pair)
    }

    async fn purge_pending(&self, email: &EmailAddress) -> Result<(), SessionError> {
        if !self.store.delete_identity(email).await? {
            tracing::debug!("Pending identity {} was already removed", email);
        }
        Ok(())
    }
}

#[async_trait]
impl<CS, M> SessionServicePort for SessionService<CS, M>
where
    CS: CredentialStore,
    M: Mailer,
{
    async fn register(&self, command: RegisterCommand) -> Result<Identity, SessionError> {
        if self.store.find_identity(&command.email).await?.is_some() {
            tracing::warn!("Registration rejected, {} already exists", command.email);
            return Err(SessionError::AlreadyExists(command.email.to_string()));
        }

        let password_hash = self
            .authenticator
            .hash_password(command.password.as_str())
            .map_err(|e| SessionError::Hashing(e.to_string()))?;

        let now = self.clock.now();
        let code = self.code_generator.generate();

        // Nothing is stored if the code cannot be delivered
        if let Err(e) = self
            .mailer
            .send_verification_code(&command.email, &code)
            .await
        {
            tracing::error!(
                "Failed to send verification code to {}: {}",
                command.email,
                e
            );
            return Err(e.into());
        }

        let identity = Identity {
            email: command.email,
            password_hash,
            username: command.username,
            bio: command.bio,
            role: Role::User,
            verified: false,
            pending_code: Some(PendingCode {
                code,
                issued_at: now,
            }),
            provider: None,
            created_at: now,
        };

        let created = self.store.create_identity(identity).await?;
        tracing::info!("Registered identity {}, awaiting verification", created.email);

        Ok(created)
    }

    async fn verify_otp(
        &self,
        email: &EmailAddress,
        code: &str,
        submitted_at: DateTime<Utc>,
    ) -> Result<Identity, SessionError> {
        let mut identity = self.find_existing(email).await?;

        if identity.verified {
            return Err(SessionError::AlreadyVerified(email.to_string()));
        }

        let Some(pending) = identity.pending_code.take() else {
            self.purge_pending(email).await?;
            return Err(SessionError::CodeExpired);
        };

        if submitted_at - pending.issued_at > self.settings.otp_validity {
            self.purge_pending(email).await?;
            tracing::warn!("Verification code for {} expired, identity purged", email);
            return Err(SessionError::CodeExpired);
        }

        if pending.code != code {
            self.purge_pending(email).await?;
            tracing::warn!("Wrong verification code for {}, identity purged", email);
            return Err(SessionError::InvalidCode);
        }

        identity.verified = true;
        let verified = self.store.update_identity(identity).await?;
        tracing::info!("Verified identity {}", email);

        Ok(verified)
    }

    async fn login(
        &self,
        email: &EmailAddress,
        password: &str,
    ) -> Result<TokenPair, SessionError> {
        let identity = self.find_existing(email).await?;
        let now = self.clock.now();

        let pair = self
            .authenticator
            .authenticate(
                password,
                &identity.password_hash,
                email.as_str(),
                identity.role.as_str(),
                now,
            )
            .map_err(|e| match e {
                AuthenticationError::InvalidCredentials => {
                    tracing::warn!("Failed login for {}", email);
                    SessionError::InvalidCredentials
                }
                AuthenticationError::JwtError(err) => SessionError::Token(err.to_string()),
            })?;

        self.store
            .save_refresh_record(RefreshRecord {
                email: email.clone(),
                token: pair.refresh_token.clone(),
                issued_at: now,
            })
            .await?;
        tracing::info!("Identity {} logged in", email);

        Ok(pair)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, SessionError> {
        let claims = self
            .authenticator
            .validate_token(refresh_token)
            .map_err(|e| SessionError::InvalidToken(e.to_string()))?;

        if claims.kind != TokenKind::Refresh {
            return Err(SessionError::InvalidToken(format!(
                "expected a refresh token, got {}",
                claims.kind
            )));
        }

        let now = self.clock.now();
        if self.authenticator.is_expired(&claims, now) {
            return Err(SessionError::SessionExpired);
        }

        let email = EmailAddress::new(claims.email)
            .map_err(|e| SessionError::InvalidToken(e.to_string()))?;

        if !self
            .store
            .consume_refresh_record(&email, refresh_token)
            .await?
        {
            tracing::warn!("Refresh token for {} is not the current one", email);
            return Err(SessionError::RefreshRecordNotFound(email.to_string()));
        }

        let identity = self.find_existing(&email).await?;
        let pair = self.open_session(&identity, now).await?;
        tracing::debug!("Rotated refresh token for {}", email);

        Ok(pair)
    }

    async fn logout(&self, email: &EmailAddress, access_token: &str) -> Result<(), SessionError> {
        self.store
            .revoke(RevocationEntry {
                email: email.clone(),
                token: access_token.to_string(),
                revoked_at: self.clock.now(),
            })
            .await?;
        self.store.delete_refresh_record(email).await?;
        tracing::info!("Identity {} logged out", email);

        Ok(())
    }

    async fn forgot_password(&self, email: &EmailAddress) -> Result<(), SessionError> {
        self.find_existing(email).await?;

        let token = self.code_generator.generate();
        if let Err(e) = self.mailer.send_reset_token(email, &token).await {
            tracing::error!("Failed to send reset token to {}: {}", email, e);
            return Err(e.into());
        }

        self.store
            .save_reset_request(ResetRequest {
                email: email.clone(),
                token,
                created_at: self.clock.now(),
            })
            .await?;
        tracing::info!("Password reset requested for {}", email);

        Ok(())
    }

    async fn reset_password(
        &self,
        command: ResetPasswordCommand,
        requested_at: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        let email = &command.email;
        let mut identity = self.find_existing(email).await?;

        let request = self
            .store
            .find_reset_request(email)
            .await?
            .ok_or_else(|| SessionError::ResetRequestNotFound(email.to_string()))?;

        if requested_at - request.created_at > self.settings.reset_validity {
            self.store.delete_reset_request(email).await?;
            tracing::warn!("Reset token for {} expired", email);
            return Err(SessionError::ResetTokenExpired);
        }

        if request.token != command.token {
            self.store.delete_reset_request(email).await?;
            tracing::warn!("Wrong reset token for {}, request discarded", email);
            return Err(SessionError::InvalidToken(
                "reset token does not match".to_string(),
            ));
        }

        let new_password = NewPassword::new(command.new_password)?;

        identity.password_hash = self
            .authenticator
            .hash_password(new_password.as_str())
            .map_err(|e| SessionError::Hashing(e.to_string()))?;

        self.store.update_identity(identity).await?;
        self.store.delete_reset_request(email).await?;
        self.store.delete_refresh_record(email).await?;
        tracing::info!("Password reset for {}", email);

        Ok(())
    }

    async fn get_by_email(&self, email: &EmailAddress) -> Result<Identity, SessionError> {
        self.find_existing(email).await
    }

    async fn update_role(
        &self,
        email: &EmailAddress,
        role: Role,
    ) -> Result<Identity, SessionError> {
        let mut identity = self.find_existing(email).await?;
        identity.role = role;

        let updated = self.store.update_identity(identity).await?;
        tracing::info!("Role of {} set to {}", email, role);

        Ok(updated)
    }

    async fn update_profile(
        &self,
        email: &EmailAddress,
        command: UpdateProfileCommand,
    ) -> Result<Identity, SessionError> {
        let mut identity = self.find_existing(email).await?;

        if let Some(username) = command.username {
            identity.username = username;
        }

        if let Some(bio) = command.bio {
            identity.bio = bio;
        }

        self.store.update_identity(identity).await
    }

    async fn complete_external_sign_in(
        &self,
        command: ExternalSignInCommand,
    ) -> Result<TokenPair, SessionError> {
        let now = self.clock.now();

        let identity = match self.store.find_identity(&command.email).await? {
            Some(identity) => identity,
            None => {
                // Empty hash never verifies, so password login stays closed
                let identity = Identity {
                    email: command.email,
                    password_hash: String::new(),
                    username: command.username,
                    bio: String::new(),
                    role: Role::User,
                    verified: true,
                    pending_code: None,
                    provider: Some(command.provider),
                    created_at: now,
                };
                let created = self.store.create_identity(identity).await?;
                tracing::info!(
                    "Created {} identity {} on first sign-in",
                    created.provider.as_deref().unwrap_or("external"),
                    created.email
                );
                created
            }
        };

        self.open_session(&identity, now).await
    }
}
