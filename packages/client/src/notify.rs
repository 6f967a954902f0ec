use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Success,
    Destructive,
}

/// Short user-facing message raised by a session operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: Variant,
}

impl Notification {
    pub fn success(description: impl Into<String>) -> Self {
        Self {
            title: "Success".to_string(),
            description: description.into(),
            variant: Variant::Success,
        }
    }

    pub fn error(description: impl Into<String>) -> Self {
        Self {
            title: "Error".to_string(),
            description: description.into(),
            variant: Variant::Destructive,
        }
    }

    pub fn is_destructive(&self) -> bool {
        self.variant == Variant::Destructive
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.description)
    }
}

/// Sink for notifications. Implementations must not block.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.variant {
            Variant::Success => {
                tracing::info!(title = %notification.title, "{}", notification.description)
            }
            Variant::Destructive => {
                tracing::warn!(title = %notification.title, "{}", notification.description)
            }
        }
    }
}
