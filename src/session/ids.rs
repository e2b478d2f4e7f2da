//! Session identifiers.
//!
//! Every session id has the form `"<uuid-v4>-<n>"`, where `n` counts session
//! constructions. The count comes from a `SessionIdCounter`. Production code
//! shares the process-wide [`SessionIdCounter::global`] instance; tests
//! create their own counter so their numbering is isolated.

use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

static GLOBAL: SessionIdCounter = SessionIdCounter::new();

/// Monotonic counter of session constructions.
///
/// Starts at 0; the first issued id carries `1`.
#[derive(Debug, Default)]
pub struct SessionIdCounter {
    issued: AtomicU64,
}

impl SessionIdCounter {
    /// Create a counter starting at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            issued: AtomicU64::new(0),
        }
    }

    /// The process-wide counter.
    #[must_use]
    pub fn global() -> &'static SessionIdCounter {
        &GLOBAL
    }

    /// Increment and return the new count.
    pub fn next(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Number of ids issued so far.
    #[must_use]
    pub fn issued(&self) -> u64 {
        self.issued.load(Ordering::Relaxed)
    }

    /// Reset to zero.
    pub fn reset(&self) {
        self.issued.store(0, Ordering::Relaxed);
    }

    /// Issue a fresh session id.
    pub fn next_id(&self) -> String {
        format!("{}-{}", Uuid::new_v4(), self.next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_starts_at_zero() {
        let counter = SessionIdCounter::new();
        assert_eq!(counter.issued(), 0);
        assert_eq!(counter.next(), 1);
        assert_eq!(counter.next(), 2);
        assert_eq!(counter.issued(), 2);
    }

    #[test]
    fn test_reset() {
        let counter = SessionIdCounter::new();
        counter.next();
        counter.reset();
        assert_eq!(counter.next(), 1);
    }

    #[test]
    fn test_id_format() {
        let counter = SessionIdCounter::new();
        let id = counter.next_id();

        let (uuid, n) = id.rsplit_once('-').unwrap();
        assert_eq!(n, "1");
        assert!(Uuid::parse_str(uuid).is_ok());
        assert_ne!(counter.next_id(), id);
    }
}
