/**
 * Outbound Mailer
 *
 * Wraps a lettre transport together with the configured `From:` mailbox.
 *
 * # Transports
 *
 * - `Smtp` - STARTTLS relay built from `MailConfig`
 * - `Stub` - in-memory transport that records messages, used by tests
 */

use lettre::{
    message::{header::ContentType, Mailbox},
    transport::{smtp::authentication::Credentials, stub::AsyncStubTransport},
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::backend::error::BackendError;
use crate::backend::server::config::MailConfig;
use crate::shared::{SendMailRequest, SharedError};

#[derive(Clone)]
enum Transport {
    Smtp(AsyncSmtpTransport<Tokio1Executor>),
    Stub(AsyncStubTransport),
}

/// Sends messages on behalf of authenticated users
#[derive(Clone)]
pub struct Mailer {
    transport: Transport,
    from: Mailbox,
}

fn parse_mailbox(field: &'static str, address: &str) -> Result<Mailbox, SharedError> {
    address
        .trim()
        .parse::<Mailbox>()
        .map_err(|e| SharedError::validation(field, format!("Invalid address '{}': {}", address.trim(), e)))
}

impl Mailer {
    /// Build an SMTP mailer from configuration
    pub fn from_config(config: &MailConfig) -> Result<Self, BackendError> {
        let from = parse_mailbox("MAIL_FROM", &config.from)
            .map_err(|e| BackendError::state(e.to_string()))?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| BackendError::state(format!("Invalid SMTP host {}: {}", config.host, e)))?
            .port(config.port);

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        tracing::info!("Mail enabled via {}:{}", config.host, config.port);
        Ok(Self {
            transport: Transport::Smtp(builder.build()),
            from,
        })
    }

    /// Build a mailer that hands messages to a stub transport
    ///
    /// Keep a clone of `transport` to inspect what was sent.
    pub fn with_stub(from: &str, transport: AsyncStubTransport) -> Result<Self, BackendError> {
        Ok(Self {
            transport: Transport::Stub(transport),
            from: parse_mailbox("from", from)?,
        })
    }

    /// Build the message for a request
    ///
    /// Blank recipient entries are skipped. `reply_to` is the sending user's
    /// address; an unparseable one is dropped rather than failing the send.
    pub fn build_message(
        &self,
        request: &SendMailRequest,
        reply_to: Option<&str>,
    ) -> Result<(Message, usize), BackendError> {
        request.validate()?;

        let mut builder = Message::builder()
            .from(self.from.clone())
            .subject(request.subject.trim());
        let mut recipients = 0;

        for address in request.to.iter().filter(|a| !a.trim().is_empty()) {
            builder = builder.to(parse_mailbox("to", address)?);
            recipients += 1;
        }
        for address in request.cc.iter().filter(|a| !a.trim().is_empty()) {
            builder = builder.cc(parse_mailbox("cc", address)?);
            recipients += 1;
        }

        if let Some(reply_to) = reply_to {
            match parse_mailbox("reply_to", reply_to) {
                Ok(mailbox) => builder = builder.reply_to(mailbox),
                Err(e) => tracing::warn!("Skipping Reply-To: {}", e),
            }
        }

        let content_type = if request.html {
            ContentType::TEXT_HTML
        } else {
            ContentType::TEXT_PLAIN
        };

        let message = builder
            .header(content_type)
            .body(request.body.clone())
            .map_err(|e| BackendError::from(SharedError::validation("to", e.to_string())))?;

        Ok((message, recipients))
    }

    /// Hand a message to the transport
    pub async fn send(&self, message: Message) -> Result<(), BackendError> {
        match &self.transport {
            Transport::Smtp(smtp) => smtp
                .send(message)
                .await
                .map(|_| ())
                .map_err(|e| BackendError::mail(e.to_string())),
            Transport::Stub(stub) => stub
                .send(message)
                .await
                .map_err(|e| BackendError::mail(e.to_string())),
        }
    }
}
