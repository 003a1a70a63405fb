use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use super::config::SmtpSettings;
use super::report::AlertMessage;
use crate::error::{MonitorError, Result};

/// Delivers an alert to a list of recipients
pub trait Notifier {
    fn send(&self, message: &AlertMessage, recipients: &[String]) -> Result<()>;
}

/// Plain-text mail through an SMTP relay
pub struct SmtpNotifier {
    mailer: SmtpTransport,
    from: String,
}

impl SmtpNotifier {
    /// Build the transport; nothing is sent until [`Notifier::send`]
    pub fn new(settings: &SmtpSettings, hostname: &str) -> Result<Self> {
        let mut builder = if settings.starttls {
            SmtpTransport::starttls_relay(&settings.host).map_err(|e| {
                MonitorError::delivery(format!("invalid relay {}: {}", settings.host, e))
            })?
        } else {
            SmtpTransport::builder_dangerous(&settings.host)
        };
        builder = builder.port(settings.port);

        if let Some(username) = &settings.username {
            let password = settings.password.clone().unwrap_or_default();
            builder = builder.credentials(Credentials::new(username.clone(), password));
        }

        let from = settings
            .from
            .clone()
            .unwrap_or_else(|| format!("resmon@{}", hostname.to_lowercase()));

        Ok(Self {
            mailer: builder.build(),
            from,
        })
    }
}

impl Notifier for SmtpNotifier {
    fn send(&self, message: &AlertMessage, recipients: &[String]) -> Result<()> {
        let from: Mailbox = self
            .from
            .parse()
            .map_err(|e| MonitorError::delivery(format!("invalid sender {}: {}", self.from, e)))?;

        let mut builder = Message::builder()
            .from(from)
            .subject(message.subject.as_str())
            .header(ContentType::TEXT_PLAIN);

        let mut accepted = 0;
        for addr in recipients {
            match addr.parse::<Mailbox>() {
                Ok(mailbox) => {
                    builder = builder.to(mailbox);
                    accepted += 1;
                }
                Err(e) => log::error!("Invalid email address {}: {}", addr, e),
            }
        }
        if accepted == 0 {
            return Err(MonitorError::delivery("no valid recipient configured"));
        }

        let email = builder
            .body(message.body.clone())
            .map_err(|e| MonitorError::delivery(format!("cannot build message: {}", e)))?;

        self.mailer
            .send(&email)
            .map_err(|e| MonitorError::delivery(e.to_string()))?;
        log::info!("Alert sent to {} recipient(s)", accepted);
        Ok(())
    }
}
