// --- File: crates/bookify_sendgrid/src/service.rs ---
//! SendGrid mail dispatcher implementation.
//!
//! Implements the [`NotificationService`] seam over the SendGrid v3
//! mail-send REST API. Invite attachments go out base64-encoded with the
//! `text/calendar` content type so recipient mail clients hand them to the
//! calendar application.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use bookify_common::services::{
    BoxFuture, DispatchError, InviteAttachment, NotificationResult, NotificationService,
};
use bookify_common::HTTP_CLIENT;
use bookify_config::SendgridConfig;
use serde_json::{json, Value};
use tracing::{info, warn};

const MAIL_SEND_URL: &str = "https://api.sendgrid.com/v3/mail/send";

/// SendGrid notification dispatcher.
pub struct SendGridMailer {
    api_key: String,
    from_email: String,
    from_name: Option<String>,
}

impl SendGridMailer {
    /// Build a mailer from config. The API key comes from the
    /// `SENDGRID_API_KEY` environment variable, never from the config file.
    pub fn from_config(config: &SendgridConfig) -> Result<Self, DispatchError> {
        let api_key =
            std::env::var("SENDGRID_API_KEY").map_err(|_| DispatchError::NotConfigured)?;
        Ok(Self {
            api_key,
            from_email: config.from_email.clone(),
            from_name: config.from_name.clone(),
        })
    }

    /// The configured sender address (also used as the invite ORGANIZER).
    pub fn from_email(&self) -> &str {
        &self.from_email
    }
}

/// Build the v3 mail-send request body. Pure so tests can assert on the
/// exact payload without a network.
pub(crate) fn build_payload(
    from_email: &str,
    from_name: Option<&str>,
    to: &str,
    subject: &str,
    html_body: &str,
    attachment: Option<&InviteAttachment>,
) -> Value {
    let mut from = json!({ "email": from_email });
    if let Some(name) = from_name {
        from["name"] = json!(name);
    }

    let mut payload = json!({
        "personalizations": [{ "to": [{ "email": to }] }],
        "from": from,
        "subject": subject,
        "content": [{ "type": "text/html", "value": html_body }],
    });

    if let Some(invite) = attachment {
        payload["attachments"] = json!([{
            "content": BASE64.encode(invite.content.as_bytes()),
            "filename": invite.filename,
            "type": "text/calendar",
            "disposition": "attachment",
        }]);
    }

    payload
}

impl NotificationService for SendGridMailer {
    fn send_email(
        &self,
        to: &str,
        subject: &str,
        html_body: &str,
        attachment: Option<InviteAttachment>,
    ) -> BoxFuture<'_, NotificationResult, DispatchError> {
        let to = to.to_string();
        let subject = subject.to_string();
        let html_body = html_body.to_string();

        Box::pin(async move {
            let payload = build_payload(
                &self.from_email,
                self.from_name.as_deref(),
                &to,
                &subject,
                &html_body,
                attachment.as_ref(),
            );

            let response = HTTP_CLIENT
                .post(MAIL_SEND_URL)
                .bearer_auth(&self.api_key)
                .json(&payload)
                .send()
                .await
                .map_err(|e| DispatchError::Request(e.to_string()))?;

            let status = response.status();
            if status.is_success() {
                info!("email sent to {} - status: {}", to, status.as_u16());
                Ok(NotificationResult {
                    status: status.as_u16().to_string(),
                })
            } else {
                let message = response.text().await.unwrap_or_default();
                warn!("sendgrid rejected mail to {}: {} {}", to, status, message);
                Err(DispatchError::Api {
                    status: status.as_u16(),
                    message,
                })
            }
        })
    }
}
