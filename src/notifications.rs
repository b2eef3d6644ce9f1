//! Transient user notifications
//!
//! Session actions push short messages here; whatever renders them drains the
//! receiving half of the channel.

use std::time::Duration;
use tokio::sync::mpsc;
use uuid::Uuid;

/// How long a notification stays visible unless the UI decides otherwise
pub const AUTO_HIDE: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub key: Uuid,
    pub message: String,
    pub variant: Variant,
    pub auto_hide: Duration,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, Variant::Info)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, Variant::Error)
    }

    fn new(message: impl Into<String>, variant: Variant) -> Self {
        Self {
            key: Uuid::new_v4(),
            message: message.into(),
            variant,
            auto_hide: AUTO_HIDE,
        }
    }
}

#[derive(Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl Notifier {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn enqueue(&self, notification: Notification) {
        if self.tx.send(notification).is_err() {
            // Nobody is listening, e.g. headless use
            log::debug!("Notification dropped: receiver closed");
        }
    }
}
