use super::cache::ResultCache;
use super::verdict::Verdict;
use crate::core::vision::Signature;
use log::debug;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleAction {
    /// Valid cache hit, already tagged with its age.
    FromCache(Verdict),
    /// Skip-rate frame: the fresh last verdict or a processing placeholder.
    Skipped(Verdict),
    Process,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleDecision {
    pub frame_number: u64,
    pub action: ScheduleAction,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    pub frames: u64,
    pub cache_hits: u64,
    pub skipped: u64,
    pub processed: u64,
}

/// Decides per frame whether to reuse, defer, or classify.
pub struct FrameScheduler {
    skip_rate: u64,
    stale_window: Duration,
    counter: AtomicU64,
    cache_hits: AtomicU64,
    skipped: AtomicU64,
    processed: AtomicU64,
    cache: ResultCache,
    last: Mutex<Option<(Verdict, Instant)>>,
}

impl FrameScheduler {
    pub fn new(skip_rate: u64, cache_duration: Duration, stale_window: Duration) -> Self {
        Self {
            skip_rate: skip_rate.max(1),
            stale_window,
            counter: AtomicU64::new(0),
            cache_hits: AtomicU64::new(0),
            skipped: AtomicU64::new(0),
            processed: AtomicU64::new(0),
            cache: ResultCache::new(cache_duration),
            last: Mutex::new(None),
        }
    }

    pub fn schedule(&self, signature: &Signature, now: Instant) -> ScheduleDecision {
        let frame_number = self.counter.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some((verdict, age)) = self.cache.get(signature, now) {
            self.cache_hits.fetch_add(1, Ordering::Relaxed);
            debug!("⚡ Frame {} served from cache ({}ms old)", frame_number, age.as_millis());
            return ScheduleDecision {
                frame_number,
                action: ScheduleAction::FromCache(verdict.with_cache(age.as_millis() as u64)),
            };
        }

        if frame_number % self.skip_rate != 0 {
            self.skipped.fetch_add(1, Ordering::Relaxed);
            let reused = self
                .last
                .lock()
                .as_ref()
                .filter(|(_, at)| now.saturating_duration_since(*at) < self.stale_window)
                .map(|(verdict, _)| verdict.clone());

            let verdict = match reused {
                Some(verdict) => verdict.skipped(frame_number),
                None => Verdict::processing(frame_number),
            };
            debug!("⏭️ Frame {} skipped", frame_number);
            return ScheduleDecision {
                frame_number,
                action: ScheduleAction::Skipped(verdict),
            };
        }

        self.processed.fetch_add(1, Ordering::Relaxed);
        ScheduleDecision {
            frame_number,
            action: ScheduleAction::Process,
        }
    }

    /// Stores the verdict of a fully processed frame as cache entry and last-known result.
    pub fn record(&self, verdict: &Verdict, signature: Signature, now: Instant) {
        self.cache.put(verdict.clone(), signature, now);
        *self.last.lock() = Some((verdict.clone(), now));
    }

    pub fn frame_count(&self) -> u64 {
        self.counter.load(Ordering::SeqCst)
    }

    pub fn skip_rate(&self) -> u64 {
        self.skip_rate
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    pub fn stats(&self) -> SchedulerStats {
        SchedulerStats {
            frames: self.frame_count(),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            processed: self.processed.load(Ordering::Relaxed),
        }
    }

    pub fn reset(&self) {
        self.counter.store(0, Ordering::SeqCst);
        self.cache_hits.store(0, Ordering::Relaxed);
        self.skipped.store(0, Ordering::Relaxed);
        self.processed.store(0, Ordering::Relaxed);
        self.cache.clear();
        *self.last.lock() = None;
    }
}
