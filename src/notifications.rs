//! Notifications
//!
//! Transient user-facing messages raised by storefront actions.

#[cfg(test)]
use mockall::automock;
use tracing::info;

/// Visual style of a notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Variant {
    /// Informational
    #[default]
    Default,

    /// Something was removed or went wrong
    Destructive,
}

/// A short message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Headline
    pub title: String,

    /// Body text
    pub description: String,

    /// Style
    pub variant: Variant,
}

impl Notification {
    /// An informational notification.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: Variant::Default,
        }
    }

    /// A destructive notification.
    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            variant: Variant::Destructive,
            ..Self::new(title, description)
        }
    }
}

/// Sink for notifications. Delivery is best effort.
#[cfg_attr(test, automock)]
pub trait Notifier {
    /// Show `notification` to the user.
    fn notify(&mut self, notification: Notification);
}

/// Emits notifications as log events.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, notification: Notification) {
        info!(
            variant = ?notification.variant,
            title = %notification.title,
            "{}",
            notification.description
        );
    }
}

/// A notification queued for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Queue-unique identifier
    pub id: u64,

    /// The notification
    pub notification: Notification,
}

/// In-memory toast queue.
#[derive(Debug, Clone, Default)]
pub struct Toasts {
    next_id: u64,
    toasts: Vec<Toast>,
}

impl Toasts {
    /// Empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queued toasts, oldest first.
    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    /// Dismiss the toast with `id`, or every toast when `id` is `None`.
    pub fn dismiss(&mut self, id: Option<u64>) {
        match id {
            Some(id) => self.toasts.retain(|toast| toast.id != id),
            None => self.toasts.clear(),
        }
    }
}

impl Notifier for Toasts {
    fn notify(&mut self, notification: Notification) {
        self.next_id += 1;
        self.toasts.push(Toast {
            id: self.next_id,
            notification,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toasts_get_unique_ids() {
        let mut toasts = Toasts::new();

        toasts.notify(Notification::new("A", "first"));
        toasts.notify(Notification::destructive("B", "second"));

        let ids: Vec<u64> = toasts.toasts().iter().map(|t| t.id).collect();

        assert_eq!(ids, [1, 2]);
        assert_eq!(
            toasts.toasts().last().map(|t| t.notification.variant),
            Some(Variant::Destructive)
        );
    }

    #[test]
    fn dismiss_one_or_all() {
        let mut toasts = Toasts::new();

        toasts.notify(Notification::new("A", "first"));
        toasts.notify(Notification::new("B", "second"));
        toasts.dismiss(Some(1));

        assert_eq!(toasts.toasts().len(), 1);

        toasts.dismiss(None);

        assert!(toasts.toasts().is_empty());
    }

    #[test]
    fn notifier_is_object_safe() {
        let mut sinks: Vec<Box<dyn Notifier>> = vec![Box::new(LogNotifier), Box::new(Toasts::new())];

        for sink in &mut sinks {
            sink.notify(Notification::new("Added to cart", "Tour has been added to your cart."));
        }

        assert_eq!(sinks.len(), 2);
    }
}
