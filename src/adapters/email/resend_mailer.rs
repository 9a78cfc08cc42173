//! Resend HTTP mailer.
//!
//! Sends one message per call through `POST /emails` with bearer auth. The
//! receipt attachment travels base64-encoded in the JSON body.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use std::time::Duration;

use crate::domain::booking::Receipt;
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{ReceiptAttachment, ReceiptMailer};

const DEFAULT_API_BASE_URL: &str = "https://api.resend.com";

#[derive(Clone)]
pub struct ResendConfig {
    api_key: SecretString,
    from: String,
    api_base_url: String,
    timeout: Duration,
}

impl ResendConfig {
    /// `from` is a full header value, e.g. `"Yatra <noreply@example.com>"`.
    pub fn new(api_key: SecretString, from: impl Into<String>) -> Self {
        Self {
            api_key,
            from: from.into(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

impl std::fmt::Debug for ResendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResendConfig")
            .field("from", &self.from)
            .field("api_base_url", &self.api_base_url)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize)]
struct EmailBody<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: String,
    text: String,
    attachments: [AttachmentBody<'a>; 1],
}

#[derive(Debug, Serialize)]
struct AttachmentBody<'a> {
    filename: &'a str,
    content: String,
}

#[derive(Debug)]
pub struct ResendMailer {
    config: ResendConfig,
    http_client: reqwest::Client,
}

impl ResendMailer {
    pub fn new(config: ResendConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_default();
        Self { config, http_client }
    }

    fn message_text(receipt: &Receipt) -> String {
        let names: Vec<&str> = receipt.lines.iter().map(|l| l.name.as_str()).collect();
        format!(
            "Namaste,\n\nThank you for registering. Your payment of {} for {} has been received.\n\
             Your receipt is attached.\n",
            receipt.total,
            names.join(", ")
        )
    }
}

#[async_trait]
impl ReceiptMailer for ResendMailer {
    async fn send(
        &self,
        to: &str,
        receipt: &Receipt,
        attachment: &ReceiptAttachment,
    ) -> Result<(), DomainError> {
        let body = EmailBody {
            from: &self.config.from,
            to: [to],
            subject: "Your yatra booking receipt".to_string(),
            text: Self::message_text(receipt),
            attachments: [AttachmentBody {
                filename: &attachment.filename,
                content: STANDARD.encode(&attachment.bytes),
            }],
        };

        let response = self
            .http_client
            .post(format!("{}/emails", self.config.api_base_url))
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| DomainError::new(ErrorCode::InternalError, format!("Resend request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(DomainError::new(
                ErrorCode::InternalError,
                format!("Resend API error ({}): {}", status, error_text),
            ));
        }

        tracing::info!(to, filename = %attachment.filename, "Receipt email sent");
        Ok(())
    }
}
