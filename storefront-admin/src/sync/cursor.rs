//! Envelope ordering
//!
//! Keys order by `(timestamp, source)`. A context applies an envelope only
//! when its key is strictly greater than the last key it applied or produced,
//! so replays and self-notifications are ignored and late deliveries from the
//! push and poll paths cannot roll state back.

use shared::models::EnvelopeKey;

#[derive(Debug, Clone, Default)]
pub struct EnvelopeCursor {
    last: Option<EnvelopeKey>,
}

impl EnvelopeCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&EnvelopeKey> {
        self.last.as_ref()
    }

    /// Accept and record `key` if it is newer than anything seen
    pub fn accept(&mut self, key: &EnvelopeKey) -> bool {
        if self.last.as_ref().is_some_and(|last| key <= last) {
            return false;
        }
        self.last = Some(key.clone());
        true
    }

    /// Timestamp for a local envelope: never below what was already observed
    pub fn stamp(&mut self, source: &str, now: i64) -> i64 {
        let timestamp = match &self.last {
            Some(last) => now.max(last.timestamp + 1),
            None => now,
        };
        self.last = Some(EnvelopeKey {
            timestamp,
            source: source.to_string(),
        });
        timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(ts: i64, source: &str) -> EnvelopeKey {
        EnvelopeKey { timestamp: ts, source: source.into() }
    }

    #[test]
    fn test_accept_is_strictly_increasing() {
        let mut cursor = EnvelopeCursor::new();
        assert!(cursor.accept(&key(10, "a")));
        assert!(!cursor.accept(&key(10, "a")));
        assert!(!cursor.accept(&key(9, "z")));
        assert!(cursor.accept(&key(12, "b")));
    }

    #[test]
    fn test_equal_timestamps_break_on_source() {
        let mut cursor = EnvelopeCursor::new();
        assert!(cursor.accept(&key(10, "a")));
        assert!(cursor.accept(&key(10, "b")));
        assert!(!cursor.accept(&key(10, "a")));
    }

    #[test]
    fn test_stamp_moves_past_observed() {
        let mut cursor = EnvelopeCursor::new();
        cursor.accept(&key(100, "remote"));
        // Local clock behind the remote one
        assert_eq!(cursor.stamp("local", 50), 101);
        assert_eq!(cursor.stamp("local", 500), 500);
        // Own envelope read back is not re-applied
        assert!(!cursor.accept(&key(500, "local")));
    }
}
