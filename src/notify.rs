//! User-facing notifications.
//!
//! The search core reports through the [`Notifier`] trait; the terminal UI
//! collects messages in a [`ToastQueue`], batch mode prints them with
//! [`LogNotifier`].

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl ToastLevel {
    pub const fn title(self) -> &'static str {
        match self {
            Self::Info => "Info",
            Self::Success => "Success",
            Self::Warning => "Warning",
            Self::Error => "Error",
        }
    }

    /// How long a toast of this level stays on screen.
    pub const fn timeout(self) -> Duration {
        match self {
            Self::Success => Duration::from_millis(2000),
            Self::Info | Self::Error => Duration::from_millis(3000),
            Self::Warning => Duration::from_millis(4000),
        }
    }
}

/// Fire-and-forget message sink.
pub trait Notifier {
    fn notify(&mut self, level: ToastLevel, message: &str);

    fn warning(&mut self, message: &str) {
        self.notify(ToastLevel::Warning, message);
    }

    fn error(&mut self, message: &str) {
        self.notify(ToastLevel::Error, message);
    }

    fn success(&mut self, message: &str) {
        self.notify(ToastLevel::Success, message);
    }

    fn info(&mut self, message: &str) {
        self.notify(ToastLevel::Info, message);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
    expires_at: Instant,
}

/// Stack of on-screen toasts, newest last.
#[derive(Debug, Clone)]
pub struct ToastQueue {
    toasts: VecDeque<Toast>,
    capacity: usize,
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(3)
    }
}

impl ToastQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            toasts: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Push a toast that expires relative to `now`.
    pub fn push_at(&mut self, level: ToastLevel, message: impl Into<String>, now: Instant) {
        self.toasts.push_back(Toast {
            level,
            message: message.into(),
            expires_at: now + level.timeout(),
        });
        while self.toasts.len() > self.capacity {
            self.toasts.pop_front();
        }
    }

    /// Drop expired toasts. Returns true if anything was removed.
    pub fn expire(&mut self, now: Instant) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|toast| toast.expires_at > now);
        self.toasts.len() != before
    }

    /// Most recent toast still on screen.
    pub fn latest(&self) -> Option<&Toast> {
        self.toasts.back()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

impl Notifier for ToastQueue {
    fn notify(&mut self, level: ToastLevel, message: &str) {
        self.push_at(level, message, Instant::now());
    }
}

/// Writes notifications to stderr and the tracing log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, level: ToastLevel, message: &str) {
        tracing::info!(level = level.title(), "{message}");
        eprintln!("[{}] {message}", level.title());
    }
}
