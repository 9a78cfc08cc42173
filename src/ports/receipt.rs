//! Receipt rendering and delivery ports.

use async_trait::async_trait;

use crate::domain::booking::Receipt;
use crate::domain::foundation::DomainError;

/// A rendered receipt ready to attach to a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptAttachment {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Renders a receipt document. Called once per recipient.
pub trait ReceiptRenderer: Send + Sync {
    fn render(&self, receipt: &Receipt) -> Result<ReceiptAttachment, DomainError>;
}

/// Delivers a receipt to one address.
#[async_trait]
pub trait ReceiptMailer: Send + Sync {
    async fn send(
        &self,
        to: &str,
        receipt: &Receipt,
        attachment: &ReceiptAttachment,
    ) -> Result<(), DomainError>;
}
