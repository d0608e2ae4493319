use async_trait::async_trait;
use lettre::{
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};

use super::{MailError, Mailer, OutgoingMail};
use crate::config::SmtpConfig;

/// Sends plain-text mail through a STARTTLS relay.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
}

impl SmtpMailer {
    pub fn new(cfg: &SmtpConfig) -> Result<Self, MailError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&cfg.server)?
            .port(cfg.port)
            .credentials(Credentials::new(cfg.username.clone(), cfg.password.clone()))
            .build();
        let sender = mailbox(&cfg.sender_name, &cfg.sender_email)?;
        Ok(Self { transport, sender })
    }
}

fn mailbox(name: &str, address: &str) -> Result<Mailbox, MailError> {
    let parsed = address
        .trim()
        .parse::<Address>()
        .map_err(|source| MailError::Address {
            address: address.to_string(),
            source,
        })?;
    let name = Some(name.trim().to_string()).filter(|name| !name.is_empty());
    Ok(Mailbox::new(name, parsed))
}

fn build_message(sender: &Mailbox, mail: OutgoingMail) -> Result<Message, MailError> {
    let recipient = mailbox(&mail.to_name, &mail.to_address)?;
    Ok(Message::builder()
        .from(sender.clone())
        .to(recipient)
        .subject(mail.subject)
        .header(ContentType::TEXT_PLAIN)
        .body(mail.body)?)
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        let message = build_message(&self.sender, mail)?;
        let response = self.transport.send(message).await?;
        if !response.is_positive() {
            return Err(MailError::Rejected(response.code().to_string()));
        }
        Ok(())
    }
}
