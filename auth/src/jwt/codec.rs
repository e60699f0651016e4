use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use super::claims::Claims;
use super::errors::JwtError;
use super::handler::JwtHandler;

/// Access/refresh token pair returned by login and refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Issues and parses signed session tokens.
///
/// Owns the signing key and both token lifetimes. Knows nothing about storage.
pub struct TokenCodec {
    handler: JwtHandler,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenCodec {
    /// Create a codec from an injected secret and token lifetimes.
    ///
    /// # Arguments
    /// * `secret` - HMAC signing secret
    /// * `access_ttl` - Lifetime of access tokens
    /// * `refresh_ttl` - Lifetime of refresh tokens
    pub fn new(secret: &[u8], access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            handler: JwtHandler::new(secret),
            access_ttl,
            refresh_ttl,
        }
    }

    /// Issue an access token and a refresh token for a subject.
    ///
    /// # Arguments
    /// * `email` - Subject email
    /// * `role` - Role embedded in the access token
    /// * `now` - Issue instant
    ///
    /// # Errors
    /// * `EncodingFailed` - Signing failed
    pub fn issue(
        &self,
        email: &str,
        role: &str,
        now: DateTime<Utc>,
    ) -> Result<TokenPair, JwtError> {
        let issued_at = now.timestamp();

        let access = Claims::access(email, role, (now + self.access_ttl).timestamp());
        let refresh = Claims::refresh(email, issued_at, (now + self.refresh_ttl).timestamp());

        Ok(TokenPair {
            access_token: self.handler.encode(&access)?,
            refresh_token: self.handler.encode(&refresh)?,
        })
    }

    /// Verify a token signature and decode its claims.
    ///
    /// # Errors
    /// * `InvalidToken` - Bad signature, malformed structure, or unsupported algorithm
    pub fn parse(&self, token: &str) -> Result<Claims, JwtError> {
        self.handler.decode(token)
    }

    /// True if `exp` is at or before `now`, or missing.
    pub fn is_expired(&self, claims: &Claims, now: DateTime<Utc>) -> bool {
        claims.is_expired(now.timestamp())
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::claims::TokenKind;

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    fn codec() -> TokenCodec {
        TokenCodec::new(SECRET, Duration::hours(1), Duration::hours(24))
    }

    #[test]
    fn test_issue_and_parse_access_token() {
        let codec = codec();
        let now = Utc::now();

        let pair = codec.issue("a@b.com", "admin", now).expect("Failed to issue");
        let claims = codec.parse(&pair.access_token).expect("Failed to parse");

        assert_eq!(claims.email, "a@b.com");
        assert_eq!(claims.role.as_deref(), Some("admin"));
        assert_eq!(claims.kind, TokenKind::Access);
        assert_eq!(claims.exp, Some((now + Duration::hours(1)).timestamp()));
        assert!(!codec.is_expired(&claims, now));
    }

    #[test]
    fn test_issue_and_parse_refresh_token() {
        let codec = codec();
        let now = Utc::now();

        let pair = codec.issue("a@b.com", "user", now).expect("Failed to issue");
        let claims = codec.parse(&pair.refresh_token).expect("Failed to parse");

        assert_eq!(claims.kind, TokenKind::Refresh);
        assert!(claims.role.is_none());
        assert_eq!(claims.iat, Some(now.timestamp()));
        assert_eq!(claims.exp, Some((now + Duration::hours(24)).timestamp()));
    }

    #[test]
    fn test_pairs_issued_in_same_instant_differ() {
        let codec = codec();
        let now = Utc::now();

        let first = codec.issue("a@b.com", "user", now).unwrap();
        let second = codec.issue("a@b.com", "user", now).unwrap();

        assert_ne!(first.access_token, second.access_token);
        assert_ne!(first.refresh_token, second.refresh_token);
    }

    #[test]
    fn test_expiry_boundary() {
        let codec = codec();
        let now = Utc::now();

        let pair = codec.issue("a@b.com", "user", now).unwrap();
        let claims = codec.parse(&pair.access_token).unwrap();

        assert!(!codec.is_expired(&claims, now + Duration::minutes(59)));
        assert!(codec.is_expired(&claims, now + Duration::hours(1)));
    }

    #[test]
    fn test_expired_token_still_parses() {
        let codec = codec();
        let issued = Utc::now() - Duration::days(3);

        let pair = codec.issue("a@b.com", "user", issued).unwrap();
        let claims = codec.parse(&pair.refresh_token).expect("Expired token should parse");

        assert!(codec.is_expired(&claims, Utc::now()));
    }

    #[test]
    fn test_parse_rejects_foreign_signature() {
        let other = TokenCodec::new(
            b"another_secret_key_at_least_32_bytes",
            Duration::hours(1),
            Duration::hours(24),
        );
        let pair = other.issue("a@b.com", "user", Utc::now()).unwrap();

        assert!(matches!(
            codec().parse(&pair.access_token),
            Err(JwtError::InvalidToken(_))
        ));
    }
}
