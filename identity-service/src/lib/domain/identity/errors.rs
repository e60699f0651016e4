use thiserror::Error;

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for password strength policy failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("Password too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Password must contain at least one uppercase letter")]
    MissingUppercase,

    #[error("Password must contain at least one lowercase letter")]
    MissingLowercase,

    #[error("Password must contain at least one digit")]
    MissingDigit,

    #[error("Password must contain at least one special character")]
    MissingSpecial,
}

/// Error for Role parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RoleError {
    #[error("Unknown role: {0} (expected \"user\" or \"admin\")")]
    Unknown(String),
}

/// Error for outbound mail delivery
#[derive(Debug, Clone, Error)]
pub enum MailerError {
    #[error("Failed to build mail client: {0}")]
    ClientFailed(String),

    #[error("Mail request failed: {0}")]
    RequestFailed(String),

    #[error("Mail provider rejected message (status={status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Failure classification shared by every session flow.
///
/// The request-handling layer maps kinds to transport outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Conflict,
    NotFound,
    Expired,
    InvalidCredentials,
    InvalidToken,
    InvalidCode,
    Unauthorized,
    Internal,
}

/// Top-level error for all identity and session operations
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    // Value object validation errors (automatically converted via #[from])
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Invalid password: {0}")]
    WeakPassword(#[from] PasswordPolicyError),

    #[error("Invalid role: {0}")]
    InvalidRole(#[from] RoleError),

    // Domain-level errors
    #[error("Email already exists: {0}")]
    AlreadyExists(String),

    #[error("Email already verified: {0}")]
    AlreadyVerified(String),

    #[error("User not found: {0}")]
    NotFound(String),

    #[error("No password reset requested for: {0}")]
    ResetRequestNotFound(String),

    #[error("Refresh token not recognised for: {0}")]
    RefreshRecordNotFound(String),

    #[error("Verification code expired, please register again")]
    CodeExpired,

    #[error("Reset token expired, please request a new one")]
    ResetTokenExpired,

    #[error("Session expired, please log in again")]
    SessionExpired,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Invalid verification code, please register again")]
    InvalidCode,

    // Infrastructure errors
    #[error("Mail delivery failed: {0}")]
    Mail(String),

    #[error("Token signing failed: {0}")]
    Token(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl SessionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SessionError::InvalidEmail(_)
            | SessionError::WeakPassword(_)
            | SessionError::InvalidRole(_) => ErrorKind::Validation,
            SessionError::AlreadyExists(_) | SessionError::AlreadyVerified(_) => {
                ErrorKind::Conflict
            }
            SessionError::NotFound(_)
            | SessionError::ResetRequestNotFound(_)
            | SessionError::RefreshRecordNotFound(_) => ErrorKind::NotFound,
            SessionError::CodeExpired
            | SessionError::ResetTokenExpired
            | SessionError::SessionExpired => ErrorKind::Expired,
            SessionError::InvalidCredentials => ErrorKind::InvalidCredentials,
            SessionError::InvalidToken(_) => ErrorKind::InvalidToken,
            SessionError::InvalidCode => ErrorKind::InvalidCode,
            SessionError::Mail(_)
            | SessionError::Token(_)
            | SessionError::Hashing(_)
            | SessionError::DatabaseError(_) => ErrorKind::Internal,
        }
    }
}

impl From<MailerError> for SessionError {
    fn from(err: MailerError) -> Self {
        SessionError::Mail(err.to_string())
    }
}
