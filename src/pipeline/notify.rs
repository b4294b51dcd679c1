use serde::Serialize;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Default,
    Destructive,
}

/// Transient message shown after a submit attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: Variant,
}

impl Notification {
    pub fn success(title: String, description: String) -> Self {
        Self {
            title,
            description,
            variant: Variant::Default,
        }
    }

    pub fn destructive(title: String, description: String) -> Self {
        Self {
            title,
            description,
            variant: Variant::Destructive,
        }
    }

    pub fn is_destructive(&self) -> bool {
        self.variant == Variant::Destructive
    }
}

/// Fire-and-forget sink for notifications.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Keeps every notification in order and mirrors it to the log.
#[derive(Clone, Default)]
pub struct NotificationLog {
    entries: Arc<Mutex<Vec<Notification>>>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<Notification> {
        self.entries
            .lock()
            .map(|e| e.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    pub fn take(&self) -> Vec<Notification> {
        match self.entries.lock() {
            Ok(mut e) => std::mem::take(&mut *e),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl NotificationSink for NotificationLog {
    fn notify(&self, notification: Notification) {
        match notification.variant {
            Variant::Default => tracing::info!(
                title = %notification.title,
                description = %notification.description,
                "Notification"
            ),
            Variant::Destructive => tracing::warn!(
                title = %notification.title,
                description = %notification.description,
                "Destructive notification"
            ),
        }
        match self.entries.lock() {
            Ok(mut e) => e.push(notification),
            Err(poisoned) => poisoned.into_inner().push(notification),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_keeps_order() {
        let log = NotificationLog::new();
        log.notify(Notification::success("a".into(), "first".into()));
        log.notify(Notification::destructive("b".into(), "second".into()));

        let entries = log.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].description, "first");
        assert!(entries[1].is_destructive());
    }

    #[test]
    fn test_take_drains() {
        let log = NotificationLog::new();
        log.notify(Notification::success("a".into(), "b".into()));
        assert_eq!(log.take().len(), 1);
        assert!(log.entries().is_empty());
    }

    #[test]
    fn test_variant_serializes_lowercase() {
        let n = Notification::destructive("t".into(), "d".into());
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["variant"], "destructive");
    }
}
