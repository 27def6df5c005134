//! Notification sink used by stores to surface action outcomes.
//!
//! Stores fire-and-forget through [`NotificationSink`]; how a message is
//! presented (toast, status bar, log line) is the embedder's concern. The
//! sink is an injected dependency so tests can observe exactly what was
//! reported.

use std::fmt::Debug;

use log::{error, info};

/// Severity of a surfaced message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// A captured notification, as delivered by [`ChannelNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
}

/// Fire-and-forget message sink; the return value is never consulted.
pub trait NotificationSink: Send + Sync + Debug {
    fn notify(&self, message: &str, kind: NotificationKind);
}

/// Routes notifications onto the `log` facade.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl NotificationSink for LogNotifier {
    fn notify(&self, message: &str, kind: NotificationKind) {
        match kind {
            NotificationKind::Success => info!("{message}"),
            NotificationKind::Error => error!("{message}"),
        }
    }
}

/// Pushes notifications onto a flume channel.
///
/// The UI (or a test) drains the receiver; a dropped receiver makes
/// delivery a no-op rather than an error.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: flume::Sender<Notification>,
}

impl ChannelNotifier {
    pub fn unbounded() -> (Self, flume::Receiver<Notification>) {
        let (sender, receiver) = flume::unbounded();
        (Self { sender }, receiver)
    }
}

impl NotificationSink for ChannelNotifier {
    fn notify(&self, message: &str, kind: NotificationKind) {
        let _ = self.sender.send(Notification {
            message: message.to_string(),
            kind,
        });
    }
}
