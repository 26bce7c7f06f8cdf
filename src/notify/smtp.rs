use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use crate::config::MailConfig;
use crate::domain::Cents;

use super::{AlertMessage, DeliveryError, Notifier};

/// Sends the budget alert through an authenticated SMTP relay upgraded with
/// STARTTLS. The sender address is also the login user.
///
/// Addresses are checked up front; the connection is opened per alert.
pub struct SmtpNotifier {
    host: String,
    port: u16,
    credentials: Credentials,
    from: Mailbox,
    to: Mailbox,
    currency_symbol: String,
}

impl SmtpNotifier {
    pub fn new(mail: &MailConfig, currency_symbol: impl Into<String>) -> Result<Self, DeliveryError> {
        Ok(Self {
            host: mail.smtp_host.clone(),
            port: mail.smtp_port,
            credentials: Credentials::new(mail.sender.clone(), mail.password.clone()),
            from: parse_mailbox(&mail.sender)?,
            to: parse_mailbox(&mail.recipient)?,
            currency_symbol: currency_symbol.into(),
        })
    }

    fn build_message(&self, spend: Cents) -> Result<Message, DeliveryError> {
        let alert = AlertMessage::budget_exceeded(&self.currency_symbol, spend);
        let message = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(alert.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(alert.body)?;
        Ok(message)
    }

    fn transport(&self) -> Result<SmtpTransport, DeliveryError> {
        let transport = SmtpTransport::starttls_relay(&self.host)?
            .port(self.port)
            .credentials(self.credentials.clone())
            .build();
        Ok(transport)
    }
}

impl Notifier for SmtpNotifier {
    fn notify(&self, spend: Cents) -> Result<(), DeliveryError> {
        let message = self.build_message(spend)?;
        tracing::debug!(host = %self.host, port = self.port, "connecting to mail relay");
        self.transport()?.send(&message)?;
        tracing::info!(to = %self.to, spend, "budget alert sent");
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, DeliveryError> {
    address
        .parse()
        .map_err(|source| DeliveryError::InvalidAddress {
            address: address.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mail_config(sender: &str, recipient: &str) -> MailConfig {
        MailConfig {
            smtp_host: "smtp.example.com".into(),
            smtp_port: 587,
            sender: sender.into(),
            recipient: recipient.into(),
            password: "app-password".into(),
        }
    }

    #[test]
    fn test_rejects_invalid_addresses() {
        let err = SmtpNotifier::new(&mail_config("not an address", "you@example.com"), "₹")
            .err()
            .unwrap();
        assert!(
            matches!(err, DeliveryError::InvalidAddress { ref address, .. } if address == "not an address")
        );

        let err = SmtpNotifier::new(&mail_config("me@example.com", ""), "₹")
            .err()
            .unwrap();
        assert!(matches!(err, DeliveryError::InvalidAddress { .. }));
    }

    #[test]
    fn test_builds_plain_text_alert() {
        let notifier =
            SmtpNotifier::new(&mail_config("me@example.com", "you@example.com"), "₹").unwrap();
        let message = notifier.build_message(15000).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("From: me@example.com"));
        assert!(raw.contains("To: you@example.com"));
        assert!(raw.contains("Subject: Monthly Budget Limit Exceeded!"));
        assert!(raw.contains("Content-Type: text/plain"));
    }
}
