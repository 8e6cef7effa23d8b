//! Transient notifications and the busy overlay.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Info,
    Warning,
    Danger,
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Danger => write!(f, "danger"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub level: Level,
    pub expires_at: Instant,
}

/// Holds at most one notice; a newer one replaces the current one.
#[derive(Debug, Clone)]
pub struct Notifier {
    ttl: Duration,
    current: Option<Notice>,
}

impl Notifier {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, current: None }
    }

    pub fn push(&mut self, level: Level, message: impl Into<String>, now: Instant) {
        let message = message.into();
        tracing::debug!(%level, %message, "notice");
        self.current = Some(Notice {
            message,
            level,
            expires_at: now + self.ttl,
        });
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }

    /// Drop the notice once it has expired.
    pub fn tick(&mut self, now: Instant) {
        if self.current.as_ref().is_some_and(|n| now >= n.expires_at) {
            self.current = None;
        }
    }

    pub fn current(&self) -> Option<&Notice> {
        self.current.as_ref()
    }
}

/// Full-screen busy overlay. Nested operations keep it up until the last one ends.
#[derive(Debug, Clone, Default)]
pub struct Busy {
    depth: usize,
    label: Option<String>,
}

impl Busy {
    pub fn begin(&mut self, label: impl Into<String>) {
        self.depth += 1;
        self.label = Some(label.into());
    }

    pub fn end(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        if self.depth == 0 {
            self.label = None;
        }
    }

    pub fn reset(&mut self) {
        self.depth = 0;
        self.label = None;
    }

    pub fn is_active(&self) -> bool {
        self.depth > 0
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_auto_dismisses() {
        let start = Instant::now();
        let mut n = Notifier::new(Duration::from_secs(5));
        n.push(Level::Success, "Uploaded", start);

        n.tick(start + Duration::from_millis(4999));
        assert_eq!(n.current().map(|c| c.message.as_str()), Some("Uploaded"));

        n.tick(start + Duration::from_secs(5));
        assert!(n.current().is_none());
    }

    #[test]
    fn test_newer_notice_replaces_older() {
        let start = Instant::now();
        let mut n = Notifier::new(Duration::from_secs(5));
        n.push(Level::Info, "first", start);
        n.push(Level::Danger, "second", start + Duration::from_secs(4));

        n.tick(start + Duration::from_secs(6));
        let current = n.current().unwrap();
        assert_eq!(current.message, "second");
        assert_eq!(current.level, Level::Danger);
    }

    #[test]
    fn test_busy_nesting() {
        let mut b = Busy::default();
        b.begin("Uploading");
        b.begin("Refreshing");
        b.end();
        assert!(b.is_active());
        b.end();
        assert!(!b.is_active());
        assert!(b.label().is_none());
        b.end();
        assert!(!b.is_active());
    }
}
