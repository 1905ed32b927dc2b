//! Success notifications for mutating calls.
//!
//! `EventBus` fans `UiEvent`s out over a `tokio::broadcast` channel so any
//! number of UI listeners (toasts, status bars) can subscribe. Publishing with
//! no subscribers is not an error; the event is simply dropped.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Receives one call per successful create, update or remove.
pub trait SuccessNotifier: Send + Sync {
    fn notify_success(&self, message: &str);
}

/// Events published to UI listeners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiEvent {
    ApiSuccess { message: String },
}

const DEFAULT_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<UiEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<UiEvent> {
        self.sender.subscribe()
    }

    /// Returns how many subscribers received the event.
    pub fn publish(&self, event: UiEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl SuccessNotifier for EventBus {
    fn notify_success(&self, message: &str) {
        self.publish(UiEvent::ApiSuccess {
            message: message.to_string(),
        });
    }
}

/// Notifier that only logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl SuccessNotifier for LogNotifier {
    fn notify_success(&self, message: &str) {
        tracing::info!(notice = message, "api call succeeded");
    }
}
