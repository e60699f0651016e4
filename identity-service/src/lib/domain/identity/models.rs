use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::domain::identity::errors::EmailError;
use crate::domain::identity::errors::PasswordPolicyError;
use crate::domain::identity::errors::RoleError;

/// Identity aggregate entity.
///
/// An account keyed by email. Unverified identities carry the pending
/// verification code and the instant it was issued.
#[derive(Debug, Clone)]
pub struct Identity {
    pub email: EmailAddress,
    pub password_hash: String,
    pub username: String,
    pub bio: String,
    pub role: Role,
    pub verified: bool,
    pub pending_code: Option<PendingCode>,
    pub provider: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Verification code awaiting confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCode {
    pub code: String,
    pub issued_at: DateTime<Utc>,
}

/// Password reset token issued by ForgotPassword, one per email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetRequest {
    pub email: EmailAddress,
    pub token: String,
    pub created_at: DateTime<Utc>,
}

/// The single currently valid refresh token for an email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshRecord {
    pub email: EmailAddress,
    pub token: String,
    pub issued_at: DateTime<Utc>,
}

/// Access token invalidated by logout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevocationEntry {
    pub email: EmailAddress,
    pub token: String,
    pub revoked_at: DateTime<Utc>,
}

/// Email address type
///
/// Exactly one `@`, not at the start, followed by a domain containing a `.`
/// that is not its last character.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Arguments
    /// * `email` - Raw email string
    ///
    /// # Returns
    /// Validated EmailAddress value object
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not match the accepted shape
    pub fn new(email: String) -> Result<Self, EmailError> {
        let (local, domain) = email
            .split_once('@')
            .ok_or_else(|| EmailError::InvalidFormat("missing '@'".to_string()))?;

        if local.is_empty() {
            return Err(EmailError::InvalidFormat(
                "'@' cannot be the first character".to_string(),
            ));
        }
        if domain.contains('@') {
            return Err(EmailError::InvalidFormat(
                "more than one '@'".to_string(),
            ));
        }
        match domain.rfind('.') {
            Some(dot) if dot + 1 < domain.len() => Ok(Self(email)),
            Some(_) => Err(EmailError::InvalidFormat(
                "domain cannot end with '.'".to_string(),
            )),
            None => Err(EmailError::InvalidFormat(
                "domain must contain '.'".to_string(),
            )),
        }
    }

    /// Get email as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plaintext password that satisfies the strength policy.
///
/// Never printed: `Debug` is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct NewPassword(String);

impl NewPassword {
    const MIN_LENGTH: usize = 8;

    /// Validate a candidate password.
    ///
    /// # Errors
    /// * `TooShort` - Fewer than 8 characters
    /// * `MissingUppercase` / `MissingLowercase` / `MissingDigit` / `MissingSpecial`
    pub fn new(password: String) -> Result<Self, PasswordPolicyError> {
        let length = password.chars().count();
        if length < Self::MIN_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            });
        }

        let mut upper = false;
        let mut lower = false;
        let mut digit = false;
        let mut special = false;
        for c in password.chars() {
            if c.is_uppercase() {
                upper = true;
            } else if c.is_lowercase() {
                lower = true;
            } else if c.is_ascii_digit() {
                digit = true;
            } else {
                special = true;
            }
        }

        if !upper {
            Err(PasswordPolicyError::MissingUppercase)
        } else if !lower {
            Err(PasswordPolicyError::MissingLowercase)
        } else if !digit {
            Err(PasswordPolicyError::MissingDigit)
        } else if !special {
            Err(PasswordPolicyError::MissingSpecial)
        } else {
            Ok(Self(password))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for NewPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NewPassword(***)")
    }
}

/// Authorization role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(RoleError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validity windows for one-time codes and reset tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    pub otp_validity: Duration,
    pub reset_validity: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            otp_validity: Duration::minutes(5),
            reset_validity: Duration::minutes(10),
        }
    }
}

/// Command to register a new identity with domain types
#[derive(Debug)]
pub struct RegisterCommand {
    pub email: EmailAddress,
    pub password: NewPassword,
    pub username: String,
    pub bio: String,
}

impl RegisterCommand {
    /// Construct a new register command.
    ///
    /// # Arguments
    /// * `email` - Validated email address
    /// * `password` - Policy-checked password (hashed by the service)
    /// * `username` - Display name
    /// * `bio` - Free-form profile text
    pub fn new(email: EmailAddress, password: NewPassword, username: String, bio: String) -> Self {
        Self {
            email,
            password,
            username,
            bio,
        }
    }
}

/// Command to complete a password reset.
///
/// The new password is checked against the policy only once the token has
/// been accepted.
pub struct ResetPasswordCommand {
    pub email: EmailAddress,
    pub token: String,
    pub new_password: String,
}

impl fmt::Debug for ResetPasswordCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResetPasswordCommand")
            .field("email", &self.email)
            .field("token", &"***")
            .field("new_password", &"***")
            .finish()
    }
}

/// Partial profile update. Only provided fields change.
#[derive(Debug, Default)]
pub struct UpdateProfileCommand {
    pub username: Option<String>,
    pub bio: Option<String>,
}

/// Sign-in asserted by an external identity provider
#[derive(Debug)]
pub struct ExternalSignInCommand {
    pub email: EmailAddress,
    pub provider: String,
    pub username: String,
}
