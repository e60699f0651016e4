//! Authentication primitives library
//!
//! Storage-agnostic building blocks for the session lifecycle:
//! - Password hashing (Argon2id)
//! - Signed access/refresh session tokens
//! - One-time numeric codes for email verification and password reset
//! - Authentication coordination
//!
//! Services define their own ports and adapt these implementations, so the
//! business rules (what a code is for, when a token is revoked) stay out of
//! this crate.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("Abcd123!").unwrap();
//! assert!(hasher.verify("Abcd123!", &hash));
//! ```
//!
//! ## Session Tokens
//! ```
//! use auth::{TokenCodec, TokenKind};
//! use chrono::{Duration, Utc};
//!
//! let codec = TokenCodec::new(
//!     b"secret_key_at_least_32_bytes_long!",
//!     Duration::hours(1),
//!     Duration::hours(24),
//! );
//! let pair = codec.issue("a@b.com", "user", Utc::now()).unwrap();
//! let claims = codec.parse(&pair.access_token).unwrap();
//! assert_eq!(claims.kind, TokenKind::Access);
//! assert!(!codec.is_expired(&claims, Utc::now()));
//! ```
//!
//! ## One-Time Codes
//! ```
//! use auth::OneTimeCodeGenerator;
//!
//! let code = OneTimeCodeGenerator::new().generate();
//! assert_eq!(code.len(), 6);
//! ```

pub mod authenticator;
pub mod jwt;
pub mod otp;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::TokenCodec;
pub use jwt::TokenKind;
pub use jwt::TokenPair;
pub use otp::OneTimeCodeGenerator;
pub use password::PasswordError;
pub use password::PasswordHasher;
