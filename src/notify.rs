//! E-mail notification seam.
//!
//! Services build [`Email`] values and hand them to [`deliver`], which logs
//! and swallows failures: a notification never fails the operation that
//! triggered it.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::error::HrmsResult;

/// An outgoing e-mail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email {
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}

impl Email {
    /// Creates an e-mail.
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }
}

/// Sends e-mails.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Sends one e-mail.
    async fn send(&self, email: Email) -> HrmsResult<()>;
}

/// Sends `email`, logging instead of propagating a failure.
pub async fn deliver(mailer: &dyn Mailer, email: Email) {
    let to = email.to.clone();
    let subject = email.subject.clone();
    if let Err(error) = mailer.send(email).await {
        warn!(to = %to, subject = %subject, error = %error, "Failed to send notification");
    }
}

/// A mailer that only writes each message to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingMailer;

#[async_trait]
impl Mailer for TracingMailer {
    async fn send(&self, email: Email) -> HrmsResult<()> {
        info!(to = %email.to, subject = %email.subject, "Sending notification");
        Ok(())
    }
}

/// A mailer that keeps every message in memory.
#[derive(Debug, Clone, Default)]
pub struct OutboxMailer {
    sent: Arc<Mutex<Vec<Email>>>,
}

impl OutboxMailer {
    /// Creates an empty outbox.
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages sent so far, oldest first.
    pub async fn sent(&self) -> Vec<Email> {
        self.sent.lock().await.clone()
    }

    /// Messages sent to `to`.
    pub async fn sent_to(&self, to: &str) -> Vec<Email> {
        self.sent
            .lock()
            .await
            .iter()
            .filter(|e| e.to.eq_ignore_ascii_case(to))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl Mailer for OutboxMailer {
    async fn send(&self, email: Email) -> HrmsResult<()> {
        self.sent.lock().await.push(email);
        Ok(())
    }
}
