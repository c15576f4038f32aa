//! Email service for password reset links

use lettre::{
    message::{header::ContentType, Mailbox, Message},
    transport::smtp::authentication::Credentials,
    SmtpTransport, Transport,
};
use std::str::FromStr;

use crate::{
    config::EmailConfig,
    error::{AppError, AppResult},
};

#[derive(Clone)]
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Link sent to the user, pointing at the front-end reset page
    pub fn password_reset_link(&self, token: &str) -> String {
        format!(
            "{}/{}",
            self.config.password_reset_url.trim_end_matches('/'),
            token
        )
    }

    /// Send a password reset link
    pub async fn send_password_reset(
        &self,
        to: &str,
        username: &str,
        link: &str,
        valid_hours: u64,
    ) -> AppResult<()> {
        let subject = "Password reset on Local Library";
        let body = format!(
            r#"
Hello {username},

Someone asked to reset the password of your Local Library account.
Follow this link to choose a new one:

{link}

The link expires in {valid_hours} hours and can be used once.
If you did not ask for this, you can ignore this email.
"#,
            username = username,
            link = link,
            valid_hours = valid_hours
        );

        self.send_email(to, subject, &body).await
    }

    fn build_message(&self, to: &str, subject: &str, body: &str) -> AppResult<Message> {
        let from_name = self
            .config
            .smtp_from_name
            .as_deref()
            .unwrap_or("Local Library");
        let from_mailbox = Mailbox::from_str(&format!("{} <{}>", from_name, self.config.smtp_from))
            .map_err(|e| AppError::Internal(format!("Invalid from address: {}", e)))?;

        let to_mailbox = Mailbox::from_str(to)
            .map_err(|e| AppError::Internal(format!("Invalid to address: {}", e)))?;

        Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| AppError::Internal(format!("Failed to build email: {}", e)))
    }

    fn build_transport(&self) -> AppResult<SmtpTransport> {
        let mailer_builder = if self.config.smtp_use_tls {
            SmtpTransport::starttls_relay(&self.config.smtp_host)
                .map_err(|e| AppError::Internal(format!("Failed to create SMTP transport: {}", e)))?
        } else {
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
        }
        .port(self.config.smtp_port);

        let mailer_builder = if let (Some(username), Some(password)) =
            (&self.config.smtp_username, &self.config.smtp_password)
        {
            mailer_builder.credentials(Credentials::new(username.clone(), password.clone()))
        } else {
            mailer_builder
        };

        Ok(mailer_builder.build())
    }

    async fn send_email(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        let email = self.build_message(to, subject, body)?;

        if !self.config.enabled {
            tracing::info!("Email delivery disabled, not sending \"{}\" to {}", subject, to);
            tracing::debug!("Email body:{}", body);
            return Ok(());
        }

        let mailer = self.build_transport()?;

        // SmtpTransport blocks on network I/O
        tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| AppError::Internal(format!("Email task failed: {}", e)))?
            .map_err(|e| AppError::Internal(format!("Failed to send email: {}", e)))?;

        tracing::info!("Sent \"{}\" to {}", subject, to);
        Ok(())
    }
}
