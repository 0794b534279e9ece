use super::verdict::Verdict;
use crate::core::vision::Signature;
use log::debug;
use parking_lot::Mutex;
use std::time::{Duration, Instant};

struct CacheEntry {
    verdict: Verdict,
    signature: Signature,
    created_at: Instant,
}

/// Single-slot most-recent-result cache.
///
/// `put` always replaces the previous entry; an entry found expired by `get`
/// is discarded.
pub struct ResultCache {
    validity: Duration,
    slot: Mutex<Option<CacheEntry>>,
}

impl ResultCache {
    pub fn new(validity: Duration) -> Self {
        Self {
            validity,
            slot: Mutex::new(None),
        }
    }

    /// Cached verdict and its age, if `signature` matches a still-valid entry.
    pub fn get(&self, signature: &Signature, now: Instant) -> Option<(Verdict, Duration)> {
        let mut slot = self.slot.lock();
        let entry = slot.as_ref()?;

        let age = now.saturating_duration_since(entry.created_at);
        if age >= self.validity {
            debug!("🗑️ Cache entry expired after {}ms", age.as_millis());
            *slot = None;
            return None;
        }
        if !entry.signature.matches(signature) {
            return None;
        }
        Some((entry.verdict.clone(), age))
    }

    pub fn put(&self, verdict: Verdict, signature: Signature, now: Instant) {
        *self.slot.lock() = Some(CacheEntry {
            verdict,
            signature,
            created_at: now,
        });
    }

    /// Age of the held entry, whether or not it is still valid.
    pub fn age(&self, now: Instant) -> Option<Duration> {
        self.slot
            .lock()
            .as_ref()
            .map(|entry| now.saturating_duration_since(entry.created_at))
    }

    pub fn is_populated(&self) -> bool {
        self.slot.lock().is_some()
    }

    pub fn validity(&self) -> Duration {
        self.validity
    }

    pub fn clear(&self) {
        *self.slot.lock() = None;
    }
}
