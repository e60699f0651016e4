use chrono::DateTime;
use chrono::Utc;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::TokenCodec;
use crate::jwt::TokenPair;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and token issuance.
///
/// Constructed once at startup and shared by reference; it owns the signing
/// key through its [`TokenCodec`].
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_codec: TokenCodec,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator around a configured token codec.
    pub fn new(token_codec: TokenCodec) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            token_codec,
        }
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Check a candidate password against a stored hash.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> bool {
        self.password_hasher.verify(password, stored_hash)
    }

    /// Verify credentials and issue a token pair.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `email` - Subject of the issued tokens
    /// * `role` - Role embedded in the access token
    /// * `now` - Issue instant
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        email: &str,
        role: &str,
        now: DateTime<Utc>,
    ) -> Result<TokenPair, AuthenticationError> {
        if !self.password_hasher.verify(password, stored_hash) {
            return Err(AuthenticationError::InvalidCredentials);
        }

        Ok(self.token_codec.issue(email, role, now)?)
    }

    /// Issue a token pair without password verification.
    ///
    /// Used by refresh rotation and external sign-in, where the caller has
    /// already been authenticated by other means.
    pub fn issue_tokens(
        &self,
        email: &str,
        role: &str,
        now: DateTime<Utc>,
    ) -> Result<TokenPair, JwtError> {
        self.token_codec.issue(email, role, now)
    }

    /// Verify signature and decode claims. Expiry is not checked.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.token_codec.parse(token)
    }

    /// True if the claims are expired at `now` (or carry no expiry).
    pub fn is_expired(&self, claims: &Claims, now: DateTime<Utc>) -> bool {
        self.token_codec.is_expired(claims, now)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::jwt::TokenKind;

    fn authenticator() -> Authenticator {
        Authenticator::new(TokenCodec::new(
            b"test_secret_key_at_least_32_bytes!",
            Duration::hours(1),
            Duration::hours(24),
        ))
    }

    #[test]
    fn test_authenticate_success() {
        let authenticator = authenticator();

        let hash = authenticator
            .hash_password("Abcd123!")
            .expect("Failed to hash password");

        let pair = authenticator
            .authenticate("Abcd123!", &hash, "a@b.com", "user", Utc::now())
            .expect("Authentication failed");

        assert!(!pair.access_token.is_empty());
        assert!(!pair.refresh_token.is_empty());

        let decoded = authenticator
            .validate_token(&pair.access_token)
            .expect("Token validation failed");
        assert_eq!(decoded.email, "a@b.com");
        assert_eq!(decoded.kind, TokenKind::Access);
    }

    #[test]
    fn test_authenticate_invalid_password() {
        let authenticator = authenticator();

        let hash = authenticator
            .hash_password("Abcd123!")
            .expect("Failed to hash password");

        let result = authenticator.authenticate("wrong", &hash, "a@b.com", "user", Utc::now());
        assert!(matches!(
            result,
            Err(AuthenticationError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_issue_and_expire() {
        let authenticator = authenticator();
        let now = Utc::now();

        let pair = authenticator
            .issue_tokens("a@b.com", "admin", now)
            .expect("Failed to issue tokens");
        let claims = authenticator.validate_token(&pair.access_token).unwrap();

        assert!(!authenticator.is_expired(&claims, now));
        assert!(authenticator.is_expired(&claims, now + Duration::hours(2)));
    }

    #[test]
    fn test_validate_invalid_token() {
        let authenticator = authenticator();

        let result = authenticator.validate_token("invalid.token.here");
        assert!(result.is_err());
    }
}
