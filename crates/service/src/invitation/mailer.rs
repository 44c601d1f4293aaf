use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;
use tracing::info;

use models::user::Role;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail configuration error: {0}")]
    Config(String),
    #[error("mail send failed: {0}")]
    Send(String),
}

/// Outbound mail seam so the service can be tested without SMTP.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_invitation(
        &self,
        to: &str,
        code: &str,
        role: Role,
        registration_link: &str,
    ) -> Result<(), MailError>;
}

/// SMTP mailer backed by lettre's tokio transport.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl SmtpMailer {
    pub fn from_config(cfg: &configs::SmtpConfig) -> Result<Self, MailError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(&cfg.host)
            .map_err(|e| MailError::Config(e.to_string()))?
            .port(cfg.port);
        if !cfg.username.is_empty() {
            builder = builder.credentials(Credentials::new(cfg.username.clone(), cfg.password.clone()));
        }
        Ok(Self { transport: builder.build(), from: cfg.from.clone() })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_invitation(
        &self,
        to: &str,
        code: &str,
        role: Role,
        registration_link: &str,
    ) -> Result<(), MailError> {
        let body = format!(
            "You have been invited to Shadow Docket as {role}.\n\n\
             Complete your registration here:\n{link}\n\n\
             Your invitation code: {code}\n\n\
             This invitation expires in 7 days.",
            role = role.as_str(),
            link = registration_link,
        );
        let email = Message::builder()
            .from(self.from.parse().map_err(|e| MailError::Config(format!("{e}")))?)
            .to(to.parse().map_err(|e| MailError::Config(format!("{e}")))?)
            .subject("Invitation to Shadow Docket")
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| MailError::Send(e.to_string()))?;
        self.transport
            .send(email)
            .await
            .map_err(|e| MailError::Send(e.to_string()))?;
        Ok(())
    }
}

/// Fallback used when SMTP is not configured: logs instead of sending.
/// Invitations stay valid; the code can still be delivered out of band.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_invitation(
        &self,
        to: &str,
        code: &str,
        role: Role,
        registration_link: &str,
    ) -> Result<(), MailError> {
        info!(
            to,
            code,
            role = role.as_str(),
            link = registration_link,
            "smtp not configured; invitation mail logged instead of sent"
        );
        Ok(())
    }
}
