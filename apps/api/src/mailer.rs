use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::{debug, error, info};

use crate::config::MailConfig;

/// Thin SMTP collaborator for inquiry notifications.
///
/// Sends are fire-and-forget: delivery runs on a blocking task and a failure
/// is logged, never surfaced to the request that triggered it. When no SMTP
/// settings are configured the mailer is a no-op.
#[derive(Clone)]
pub struct Mailer {
    config: Option<MailConfig>,
}

impl Mailer {
    pub fn new(config: Option<MailConfig>) -> Self {
        Self { config }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.is_some()
    }

    /// Queues an HTML email to the configured notification address.
    pub fn notify(&self, subject: &str, html_body: &str) {
        let Some(config) = self.config.clone() else {
            debug!("mail transport not configured, skipping notification");
            return;
        };
        let subject = subject.to_string();
        let html_body = html_body.to_string();

        tokio::task::spawn_blocking(move || {
            let message = Message::builder()
                .from(match config.from_address.parse() {
                    Ok(mbox) => mbox,
                    Err(e) => {
                        error!("Invalid MAIL_FROM address: {e}");
                        return;
                    }
                })
                .to(match config.notify_address.parse() {
                    Ok(mbox) => mbox,
                    Err(e) => {
                        error!("Invalid MAIL_TO address: {e}");
                        return;
                    }
                })
                .subject(&subject)
                .header(ContentType::TEXT_HTML)
                .body(html_body);

            let message = match message {
                Ok(m) => m,
                Err(e) => {
                    error!("Failed to build notification email: {e}");
                    return;
                }
            };

            let transport = match SmtpTransport::relay(&config.smtp_host) {
                Ok(builder) => builder
                    .port(config.smtp_port)
                    .credentials(Credentials::new(config.smtp_user, config.smtp_pass))
                    .build(),
                Err(e) => {
                    error!("Failed to build SMTP transport: {e}");
                    return;
                }
            };

            match transport.send(&message) {
                Ok(_) => info!("Notification email sent: {subject}"),
                Err(e) => error!("Failed to send notification email: {e}"),
            }
        });
    }
}
