//! Receipt email adapters.

mod resend_mailer;
mod text_renderer;

pub use resend_mailer::{ResendConfig, ResendMailer};
pub use text_renderer::TextReceiptRenderer;
