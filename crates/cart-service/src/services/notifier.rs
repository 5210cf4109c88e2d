//! Notification sink for user-facing error messages.

use std::sync::{Arc, Mutex, PoisonError};

/// Reports a user-facing error message.
///
/// Fire-and-forget: delivery failures are the sink's own concern.
pub trait NotificationSink: Send + Sync {
    /// Shows `message` to the shopper.
    fn report_error(&self, message: &str);
}

impl<T: NotificationSink + ?Sized> NotificationSink for Arc<T> {
    fn report_error(&self, message: &str) {
        (**self).report_error(message)
    }
}

/// Sink that logs every message at warn level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl NotificationSink for TracingNotifier {
    fn report_error(&self, message: &str) {
        tracing::warn!(notification = message, "Cart notification");
    }
}

/// Sink that keeps every message, for tests and for surfacing the last
/// error through an API.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every message reported so far, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.lock().clone()
    }

    /// Returns the most recent message.
    pub fn last(&self) -> Option<String> {
        self.lock().last().cloned()
    }

    /// Returns the number of messages reported.
    pub fn count(&self) -> usize {
        self.lock().len()
    }

    /// Forgets every message.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl NotificationSink for RecordingNotifier {
    fn report_error(&self, message: &str) {
        self.lock().push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_order() {
        let notifier = RecordingNotifier::new();

        notifier.report_error("first");
        notifier.report_error("second");

        assert_eq!(notifier.messages(), vec!["first", "second"]);
        assert_eq!(notifier.last().as_deref(), Some("second"));
    }

    #[test]
    fn clones_share_messages() {
        let notifier = RecordingNotifier::new();
        let shared: Arc<dyn NotificationSink> = Arc::new(notifier.clone());

        shared.report_error("boom");

        assert_eq!(notifier.count(), 1);
        notifier.clear();
        assert_eq!(notifier.count(), 0);
    }
}
