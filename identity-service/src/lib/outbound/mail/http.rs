use async_trait::async_trait;
use serde::Serialize;

use crate::config::MailerConfig;
use crate::domain::identity::errors::MailerError;
use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::ports::Mailer;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MailAddress {
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailBody {
    sender: MailAddress,
    to: Vec<MailAddress>,
    subject: String,
    text_content: String,
}

/// Mailer posting to a transactional email HTTP API (Brevo-compatible body).
pub struct HttpMailer {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    sender_email: String,
    sender_name: Option<String>,
}

impl HttpMailer {
    /// Build a mailer with a request timeout from configuration.
    ///
    /// # Errors
    /// * `ClientFailed` - HTTP client could not be constructed
    pub fn new(config: &MailerConfig) -> Result<Self, MailerError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| MailerError::ClientFailed(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            sender_email: config.sender_email.clone(),
            sender_name: config.sender_name.clone(),
        })
    }

    async fn deliver(
        &self,
        to: &EmailAddress,
        subject: &str,
        text: String,
    ) -> Result<(), MailerError> {
        let body = SendEmailBody {
            sender: MailAddress {
                email: self.sender_email.clone(),
                name: self.sender_name.clone(),
            },
            to: vec![MailAddress {
                email: to.to_string(),
                name: None,
            }],
            subject: subject.to_string(),
            text_content: text,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("api-key", &self.api_key)
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| MailerError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!("Mail '{}' accepted for {}", subject, to);
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(MailerError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send_verification_code(
        &self,
        to: &EmailAddress,
        code: &str,
    ) -> Result<(), MailerError> {
        self.deliver(
            to,
            "Verify your email",
            format!("Your verification code is {}.", code),
        )
        .await
    }

    async fn send_reset_token(&self, to: &EmailAddress, token: &str) -> Result<(), MailerError> {
        self.deliver(
            to,
            "Reset your password",
            format!("Use this code to reset your password: {}.", token),
        )
        .await
    }
}
