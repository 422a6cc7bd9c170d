use std::time::{Duration, Instant};

/// How long a toast stays on screen.
pub const TOAST_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    shown_at: Instant,
}

impl Toast {
    fn expires_at(&self, lifetime: Duration) -> Instant {
        self.shown_at + lifetime
    }
}

/// Newest last.
#[derive(Debug)]
pub struct Notifications {
    toasts: Vec<Toast>,
    lifetime: Duration,
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new(TOAST_DURATION)
    }
}

impl Notifications {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            toasts: Vec::new(),
            lifetime,
        }
    }

    pub fn push(&mut self, message: impl Into<String>, kind: ToastKind) {
        self.push_at(message, kind, Instant::now());
    }

    pub fn push_at(&mut self, message: impl Into<String>, kind: ToastKind, now: Instant) {
        self.toasts.push(Toast {
            message: message.into(),
            kind,
            shown_at: now,
        });
    }

    /// Drop every toast whose time is up.
    pub fn prune(&mut self, now: Instant) {
        let lifetime = self.lifetime;
        self.toasts.retain(|toast| toast.expires_at(lifetime) > now);
    }

    pub fn active(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    /// Time until the oldest visible toast should disappear.
    pub fn next_expiry(&self, now: Instant) -> Option<Duration> {
        self.toasts
            .iter()
            .map(|toast| toast.expires_at(self.lifetime).saturating_duration_since(now))
            .min()
    }
}
