use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use log::{info, warn};

use entity::contact_message;

use crate::error::GenericError;

struct SmtpConfig {
    host: String,
    username: String,
    password: String,
    from: String,
    to: String,
}

fn smtp_config() -> Option<SmtpConfig> {
    Some(SmtpConfig {
        host: std::env::var("SMTP_HOST").ok()?,
        username: std::env::var("SMTP_USERNAME").ok()?,
        password: std::env::var("SMTP_PASSWORD").ok()?,
        from: std::env::var("SMTP_FROM").ok()?,
        to: std::env::var("CONTACT_NOTIFY_TO").ok()?,
    })
}

fn mailbox(address: &str) -> Result<Mailbox, GenericError> {
    address
        .parse()
        .map_err(|_| GenericError::UnknownError("Invalid notification address"))
}

/// Best-effort admin notification for a stored contact message. The message
/// is already durable when this runs; callers log the error and move on,
/// the HTTP outcome never depends on it.
pub async fn send_contact_notification(
    stored: &contact_message::Model,
) -> Result<(), GenericError> {
    let Some(config) = smtp_config() else {
        warn!(
            "smtp not configured; skipping notification for contact message {}",
            stored.id
        );
        return Ok(());
    };

    let email = Message::builder()
        .from(mailbox(&config.from)?)
        .to(mailbox(&config.to)?)
        .subject(format!("[Contact] {}", stored.subject))
        .body(format!(
            "From: {} <{}>\nPhone: {}\n\n{}",
            stored.name,
            stored.email,
            stored.phone.as_deref().unwrap_or("-"),
            stored.message
        ))
        .map_err(|_| GenericError::UnknownError("Unable to build notification email"))?;

    let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
        .map_err(|_| GenericError::UnknownError("Unable to open SMTP relay"))?
        .credentials(Credentials::new(config.username, config.password))
        .build();

    mailer
        .send(email)
        .await
        .map_err(|_| GenericError::UnknownError("SMTP send failed"))?;

    info!("contact notification sent for message {}", stored.id);
    Ok(())
}
