use std::env;
use std::time::Duration;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

use crate::domain::identity::models::SessionSettings;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub session: SessionConfig,
    pub mailer: MailerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// Absent `url` selects the in-memory credential store.
#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_access_ttl_minutes")]
    pub access_ttl_minutes: i64,
    #[serde(default = "default_refresh_ttl_hours")]
    pub refresh_ttl_hours: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    #[serde(default = "default_otp_validity_minutes")]
    pub otp_validity_minutes: i64,
    #[serde(default = "default_reset_validity_minutes")]
    pub reset_validity_minutes: i64,
}

#[derive(Deserialize, Clone)]
pub struct MailerConfig {
    pub endpoint: String,
    pub api_key: String,
    pub sender_email: String,
    pub sender_name: Option<String>,
    #[serde(default = "default_mailer_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout_secs() -> u64 {
    5
}

fn default_access_ttl_minutes() -> i64 {
    60
}

fn default_refresh_ttl_hours() -> i64 {
    24
}

fn default_otp_validity_minutes() -> i64 {
    5
}

fn default_reset_validity_minutes() -> i64 {
    10
}

fn default_mailer_timeout_secs() -> u64 {
    10
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout_secs(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            otp_validity_minutes: default_otp_validity_minutes(),
            reset_validity_minutes: default_reset_validity_minutes(),
        }
    }
}

// Secrets stay out of Debug output
impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"***")
            .field("access_ttl_minutes", &self.access_ttl_minutes)
            .field("refresh_ttl_hours", &self.refresh_ttl_hours)
            .finish()
    }
}

impl std::fmt::Debug for MailerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailerConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"***")
            .field("sender_email", &self.sender_email)
            .field("sender_name", &self.sender_name)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl DatabaseConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

impl JwtConfig {
    const MIN_SECRET_LENGTH: usize = 32;

    pub fn access_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.access_ttl_minutes)
    }

    pub fn refresh_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.refresh_ttl_hours)
    }
}

impl SessionConfig {
    pub fn settings(&self) -> SessionSettings {
        SessionSettings {
            otp_validity: chrono::Duration::minutes(self.otp_validity_minutes),
            reset_validity: chrono::Duration::minutes(self.reset_validity_minutes),
        }
    }
}

impl MailerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (JWT__SECRET, DATABASE__URL, SERVER__HTTP_PORT, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: JWT__SECRET=... overrides jwt.secret
            .add_source(Environment::default().separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Reject values that would make the service unsafe or unusable.
    ///
    /// # Errors
    /// * `ConfigError::Message` - Secret too short or a window that is not positive
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.len() < JwtConfig::MIN_SECRET_LENGTH {
            return Err(ConfigError::Message(format!(
                "jwt.secret must be at least {} bytes",
                JwtConfig::MIN_SECRET_LENGTH
            )));
        }

        let windows = [
            ("jwt.access_ttl_minutes", self.jwt.access_ttl_minutes),
            ("jwt.refresh_ttl_hours", self.jwt.refresh_ttl_hours),
            ("session.otp_validity_minutes", self.session.otp_validity_minutes),
            ("session.reset_validity_minutes", self.session.reset_validity_minutes),
        ];
        for (name, value) in windows {
            if value <= 0 {
                return Err(ConfigError::Message(format!("{} must be positive", name)));
            }
        }

        Ok(())
    }
}
