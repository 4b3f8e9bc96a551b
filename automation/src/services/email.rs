use crate::config::SmtpConfig;
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, MultiPart, SinglePart},
    transport::smtp::{authentication::Credentials, PoolConfig},
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::time::Duration;
use tracing::{error, info};

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("invalid mailbox address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("smtp transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
    #[error("send failed: {0}")]
    Failed(String),
}

/// Outbound email collaborator.
///
/// Workflow actions only ever send plain-text notifications; the
/// implementation is responsible for any HTML dressing.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send_notification(&self, to: &str, subject: &str, body: &str)
        -> Result<(), EmailError>;
}

/// SMTP-backed implementation of [`EmailSender`].
#[derive(Debug, Clone)]
pub struct SmtpEmailService {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_email: String,
    from_name: String,
}

impl SmtpEmailService {
    pub fn new(smtp_config: &SmtpConfig) -> Self {
        let creds = Credentials::new(
            smtp_config.username.clone(),
            smtp_config.password.clone(),
        );

        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&smtp_config.host)
            .port(smtp_config.port)
            .credentials(creds)
            .pool_config(PoolConfig::new().max_size(10))
            .timeout(Some(Duration::from_secs(10)))
            .build();

        SmtpEmailService {
            transport,
            from_email: smtp_config.from_email.clone(),
            from_name: smtp_config.from_name.clone(),
        }
    }
}

#[async_trait]
impl EmailSender for SmtpEmailService {
    async fn send_notification(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), EmailError> {
        let from = format!("{} <{}>", self.from_name, self.from_email).parse::<Mailbox>()?;
        let to_mailbox = to.parse::<Mailbox>()?;

        let html_body = notification_html(body);

        let message = Message::builder()
            .from(from)
            .to(to_mailbox)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body),
                    ),
            )?;

        match self.transport.send(message).await {
            Ok(_) => {
                info!("Email sent successfully to {}", to);
                Ok(())
            }
            Err(e) => {
                error!("Failed to send email to {}: {}", to, e);
                Err(e.into())
            }
        }
    }
}

/// Wrap a plain-text notification in the platform's branded HTML shell.
fn notification_html(message: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <style>
      body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; }}
      .container {{ max-width: 600px; margin: 0 auto; padding: 20px; }}
      .header {{ background: #1f2937; color: white; padding: 20px; text-align: center; }}
      .content {{ padding: 20px; background: #f9f9f9; }}
      .footer {{ text-align: center; padding: 20px; font-size: 12px; color: #666; }}
    </style>
  </head>
  <body>
    <div class="container">
      <div class="header">
        <h1>{app}</h1>
      </div>
      <div class="content">
        <p>{body}</p>
      </div>
      <div class="footer">
        <p>{app} | This is an automated notification</p>
      </div>
    </div>
  </body>
</html>
"#,
        app = crate::APP_NAME,
        body = message.replace('\n', "<br>"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_shell_preserves_line_breaks() {
        let html = notification_html("line one\nline two");
        assert!(html.contains("line one<br>line two"));
        assert!(html.contains(crate::APP_NAME));
    }
}
