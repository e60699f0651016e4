use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// Distinguishes short-lived access tokens from single-use refresh tokens.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Session token claims.
///
/// Access tokens carry `email`, `role`, `kind` and `exp`. Refresh tokens carry
/// `email`, `kind`, `exp` and `iat`. Every token also gets a random `jti` so two
/// tokens minted for the same subject within the same second never collide.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Subject email address
    pub email: String,

    /// Role at issuance (access tokens only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    pub kind: TokenKind,

    /// Expiration time (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Issued at (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// JWT ID (unique token identifier)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

impl Claims {
    /// Create access token claims.
    ///
    /// # Arguments
    /// * `email` - Subject email
    /// * `role` - Role string embedded for downstream authorization
    /// * `expires_at` - Expiration (Unix timestamp)
    pub fn access(email: impl ToString, role: impl ToString, expires_at: i64) -> Self {
        Self {
            email: email.to_string(),
            role: Some(role.to_string()),
            kind: TokenKind::Access,
            exp: Some(expires_at),
            iat: None,
            jti: Some(Uuid::new_v4().to_string()),
        }
    }

    /// Create refresh token claims.
    ///
    /// # Arguments
    /// * `email` - Subject email
    /// * `issued_at` - Issue time (Unix timestamp)
    /// * `expires_at` - Expiration (Unix timestamp)
    pub fn refresh(email: impl ToString, issued_at: i64, expires_at: i64) -> Self {
        Self {
            email: email.to_string(),
            role: None,
            kind: TokenKind::Refresh,
            exp: Some(expires_at),
            iat: Some(issued_at),
            jti: Some(Uuid::new_v4().to_string()),
        }
    }

    /// Set expiration (Unix timestamp).
    pub fn with_expiration(mut self, exp: i64) -> Self {
        self.exp = Some(exp);
        self
    }

    /// Remove the expiration claim.
    pub fn without_expiration(mut self) -> Self {
        self.exp = None;
        self
    }

    /// Check if token is expired.
    ///
    /// Expired means `exp` is at or before `current_timestamp`. A token
    /// without `exp` is treated as expired.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp.map_or(true, |exp| exp <= current_timestamp)
    }
}
