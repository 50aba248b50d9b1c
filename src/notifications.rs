//! User-facing notifications.
//!
//! The toast layer receives `(title, description, severity)` tuples for every
//! user-visible outcome. Calls are fire-and-forget; the core never blocks on
//! or inspects the result of a notification.

use std::sync::{Mutex, PoisonError};

/// How prominently a toast should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Neutral information.
    Info,

    /// A completed action.
    Success,

    /// A rejected action the user can correct.
    Warning,

    /// A failure outside the user's control.
    Error,
}

/// One notification shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Short headline.
    pub title: String,

    /// One-line detail text.
    pub description: String,

    /// Rendering severity.
    pub severity: Severity,
}

impl Toast {
    /// Create a toast.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity,
        }
    }
}

/// Notification collaborator. Implementations must not block.
pub trait Notifier: Send + Sync {
    /// Show a toast to the user.
    fn notify(&self, toast: Toast);
}

/// Discards every toast.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _toast: Toast) {}
}

/// Records every toast for later inspection. Intended for tests.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    toasts: Mutex<Vec<Toast>>,
}

impl RecordingNotifier {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every toast received so far, in order.
    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, toast: Toast) {
        self.toasts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(toast);
    }
}
