use super::config::RecognizerConfig;
use super::error::PipelineError;
use super::payload;
use super::policy::DecisionPolicy;
use super::scheduler::{FrameScheduler, ScheduleAction};
use super::status::{ClassifierStatus, ComponentStatus, LabelListing, PerformanceStats, RecognizerStatus};
use super::verdict::{Outcome, Verdict};
use crate::core::exchange::ExchangeState;
use crate::core::vision::{
    catalog, normalize_hands, BoundingBox, Classifier, Frame, HandLocalizer, LandmarkSet, NearDuplicateFilter,
    Prediction, RankedLabel, RawFrame, RegionExtractor, RegionSize, StabilityInfo, VisionError,
};
use chrono::Utc;
use log::{debug, error, info, warn};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::time::Instant;

/// Vision backends. Either may be absent when its model failed to load.
#[derive(Clone, Default)]
pub struct Backends {
    pub localizer: Option<Arc<dyn HandLocalizer>>,
    pub classifier: Option<Arc<dyn Classifier>>,
}

impl Backends {
    pub fn new(localizer: Arc<dyn HandLocalizer>, classifier: Arc<dyn Classifier>) -> Self {
        Self {
            localizer: Some(localizer),
            classifier: Some(classifier),
        }
    }
}

/// What one detector + classifier pass produced.
enum Inference {
    NoHands,
    InvalidLandmarks,
    Classified {
        hands: Vec<LandmarkSet>,
        bounds: Option<BoundingBox>,
        region_size: RegionSize,
        prediction: Prediction,
        ranked: Vec<RankedLabel>,
        stability: StabilityInfo,
    },
}

/// Owned inputs of one inference pass, movable onto a worker thread.
struct InferenceJob {
    localizer: Arc<dyn HandLocalizer>,
    classifier: Arc<dyn Classifier>,
    extractor: RegionExtractor,
    max_hands: usize,
    top_k: usize,
    /// Set by the waiting caller once it gives up on this job.
    cancelled: Arc<AtomicBool>,
}

impl InferenceJob {
    fn ensure_live(&self) -> Result<(), PipelineError> {
        if self.cancelled.load(Ordering::Acquire) {
            Err(PipelineError::Abandoned)
        } else {
            Ok(())
        }
    }

    fn run(&self, frame: &Frame) -> Result<Inference, PipelineError> {
        self.ensure_live()?;
        let presence = self.localizer.detect(frame)?;
        if !presence.present {
            return Ok(Inference::NoHands);
        }

        let raw_hands = match self.localizer.all_landmarks(frame)? {
            Some(hands) if !hands.is_empty() => hands,
            _ => return Err(VisionError::MissingLandmarks.into()),
        };
        let reported = raw_hands.len();
        let hands = normalize_hands(raw_hands, self.max_hands);
        let Some(primary) = hands.first() else {
            warn!("⚠️ All {} detected hand(s) had malformed landmarks", reported);
            return Ok(Inference::InvalidLandmarks);
        };

        let region = self.extractor.extract(frame, primary.points());
        let region_size = region.size();
        let bounds = region.bounds;

        self.ensure_live()?;
        let prediction = self.classifier.predict(&region.image)?;
        self.ensure_live()?;
        let ranked = self.classifier.top_k(&region.image, self.top_k)?;
        debug!(
            "🔍 Region {}x{} → {:?} ({:.3})",
            region_size.width, region_size.height, prediction.label, prediction.confidence
        );

        Ok(Inference::Classified {
            hands,
            bounds,
            region_size,
            prediction,
            ranked,
            stability: self.classifier.stability_info(),
        })
    }
}

/// Releases an in-flight slot when the pooled job finishes or unwinds.
struct InFlightSlot(Arc<AtomicUsize>);

impl Drop for InFlightSlot {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Frame-to-verdict pipeline: scheduling, caching, inference and the exchange hand-off.
pub struct FrameRecognizer {
    config: RecognizerConfig,
    backends: Backends,
    filter: NearDuplicateFilter,
    extractor: RegionExtractor,
    policy: DecisionPolicy,
    scheduler: FrameScheduler,
    exchange: Arc<ExchangeState>,
    pool: Option<rayon::ThreadPool>,
    /// Pooled jobs queued or running, capped at `max_in_flight`.
    in_flight: Arc<AtomicUsize>,
    max_in_flight: usize,
    classifications: AtomicU64,
    timeouts: AtomicU64,
}

impl FrameRecognizer {
    pub fn new(
        config: RecognizerConfig,
        backends: Backends,
        exchange: Arc<ExchangeState>,
    ) -> Result<Self, PipelineError> {
        config.validate()?;

        if let Some(classifier) = backends.classifier.as_ref().filter(|c| c.is_ready()) {
            let labels = classifier.available_labels();
            config.validate_labels(&labels)?;
            info!("🔤 Classifier ready with {} letters", labels.len());
        }

        let threads = num_cpus::get().clamp(1, 4);
        let pool = match config.inference_timeout {
            Some(_) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|i| format!("signlink-infer-{}", i))
                    .panic_handler(|_| error!("❌ Inference worker panicked"))
                    .build()?;
                info!("🧵 Inference pool started with {} threads", threads);
                Some(pool)
            }
            None => None,
        };

        let recognizer = Self {
            scheduler: FrameScheduler::new(
                config.frame_skip_rate,
                config.cache_duration,
                config.stale_result_window,
            ),
            policy: DecisionPolicy::new(config.min_classifier_confidence),
            filter: NearDuplicateFilter::new(),
            extractor: RegionExtractor::new(),
            config,
            backends,
            exchange,
            pool,
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: threads * 2,
            classifications: AtomicU64::new(0),
            timeouts: AtomicU64::new(0),
        };

        let components = recognizer.components();
        info!(
            "✅ FrameRecognizer created (localizer: {}, classifier: {})",
            components.hand_localizer, components.classifier
        );
        Ok(recognizer)
    }

    pub fn config(&self) -> &RecognizerConfig {
        &self.config
    }

    pub fn exchange(&self) -> &Arc<ExchangeState> {
        &self.exchange
    }

    pub fn components(&self) -> ComponentStatus {
        ComponentStatus {
            hand_localizer: self.backends.localizer.as_ref().map_or(false, |l| l.is_ready()),
            classifier: self.backends.classifier.as_ref().map_or(false, |c| c.is_ready()),
        }
    }

    pub fn is_available(&self) -> bool {
        let components = self.components();
        components.hand_localizer && components.classifier
    }

    /// JSON request body in, verdict out.
    pub fn recognize_payload(&self, body: Option<&str>) -> Verdict {
        self.recognize_payload_at(body, Instant::now())
    }

    pub fn recognize_payload_at(&self, body: Option<&str>, now: Instant) -> Verdict {
        if !self.is_available() {
            return Verdict::unavailable();
        }
        match payload::decode_request(body, self.config.max_frame_size) {
            Ok(frame) => self.recognize_frame_at(frame, now),
            Err(e) => {
                warn!("⚠️ Rejected payload: {}", e);
                PipelineError::from(e).to_verdict()
            }
        }
    }

    /// YUV420 camera frame in, verdict out.
    pub fn recognize_raw(&self, raw: &RawFrame) -> Verdict {
        let (max_w, max_h) = self.config.max_frame_size;
        match raw.to_rgba().and_then(|frame| frame.fit_within(max_w, max_h)) {
            Ok(frame) => self.recognize_frame(frame),
            Err(e) => {
                warn!("⚠️ Rejected camera frame: {}", e);
                PipelineError::from(payload::PayloadError::from(e)).to_verdict()
            }
        }
    }

    pub fn recognize_frame(&self, frame: Frame) -> Verdict {
        self.recognize_frame_at(frame, Instant::now())
    }

    pub fn recognize_frame_at(&self, frame: Frame, now: Instant) -> Verdict {
        if !self.is_available() {
            return Verdict::unavailable();
        }

        let signature = self.filter.signature(&frame);
        let decision = self.scheduler.schedule(&signature, now);
        match decision.action {
            ScheduleAction::FromCache(verdict) | ScheduleAction::Skipped(verdict) => return verdict,
            ScheduleAction::Process => {}
        }

        let mut verdict = self.classify(frame);
        verdict.frame_number = Some(decision.frame_number);

        if verdict.frame_processed {
            self.scheduler.record(&verdict, signature, now);
            self.exchange.record_learner(&verdict);
        }
        verdict
    }

    /// One-shot classification that leaves the cache, counter and exchange untouched.
    pub fn classify_once(&self, frame: Frame) -> Verdict {
        if !self.is_available() {
            return Verdict::unavailable();
        }
        self.classify(frame)
    }

    fn classify(&self, frame: Frame) -> Verdict {
        let (Some(localizer), Some(classifier)) = (&self.backends.localizer, &self.backends.classifier) else {
            return Verdict::unavailable();
        };

        let job = InferenceJob {
            localizer: Arc::clone(localizer),
            classifier: Arc::clone(classifier),
            extractor: self.extractor,
            max_hands: self.config.localizer.max_num_hands,
            top_k: self.config.top_k,
            cancelled: Arc::new(AtomicBool::new(false)),
        };

        match self.run_job(job, frame) {
            Ok(inference) => self.verdict_for(inference),
            Err(e) => {
                match &e {
                    PipelineError::InferenceTimeout(_) | PipelineError::Backlogged(_) => {
                        self.timeouts.fetch_add(1, Ordering::Relaxed);
                        warn!("⏱️ {}", e);
                    }
                    PipelineError::Vision(_) => warn!("⚠️ Recognition failed: {}", e),
                    _ => error!("❌ Recognition fault: {}", e),
                }
                e.to_verdict()
            }
        }
    }

    fn run_job(&self, job: InferenceJob, frame: Frame) -> Result<Inference, PipelineError> {
        let (Some(pool), Some(timeout)) = (&self.pool, self.config.inference_timeout) else {
            return panic::catch_unwind(AssertUnwindSafe(|| job.run(&frame))).unwrap_or_else(|_| {
                error!("❌ Inline inference panicked");
                Err(PipelineError::WorkerLost)
            });
        };

        if self.in_flight.fetch_add(1, Ordering::AcqRel) >= self.max_in_flight {
            self.in_flight.fetch_sub(1, Ordering::AcqRel);
            return Err(PipelineError::Backlogged(self.max_in_flight));
        }
        let slot = InFlightSlot(Arc::clone(&self.in_flight));
        let cancelled = Arc::clone(&job.cancelled);

        let (tx, rx) = mpsc::sync_channel(1);
        pool.spawn(move || {
            let _slot = slot;
            let _ = tx.send(job.run(&frame));
        });

        match rx.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => {
                cancelled.store(true, Ordering::Release);
                Err(PipelineError::InferenceTimeout(timeout))
            }
            Err(RecvTimeoutError::Disconnected) => Err(PipelineError::WorkerLost),
        }
    }

    fn verdict_for(&self, inference: Inference) -> Verdict {
        match inference {
            Inference::NoHands => Verdict::no_hands(),
            Inference::InvalidLandmarks => Verdict::invalid_landmarks(true),
            Inference::Classified {
                hands,
                bounds,
                region_size,
                prediction,
                ranked,
                stability,
            } => {
                self.classifications.fetch_add(1, Ordering::Relaxed);
                let mut verdict = self.policy.decide(
                    prediction.label.as_deref(),
                    prediction.confidence,
                    ranked,
                    &stability,
                );
                verdict.hands_detected = true;
                verdict.frame_processed = true;
                verdict.landmarks = Some(hands);
                verdict.bounding_box = bounds;
                verdict.hand_region_size = Some(region_size);
                if verdict.outcome == Outcome::Accepted {
                    debug!("✋ Accepted {:?} at {:.3}", verdict.label, verdict.confidence);
                }
                verdict
            }
        }
    }

    /// Letters the classifier can produce; `None` while it is not loaded.
    pub fn labels(&self) -> Option<LabelListing> {
        let classifier = self.backends.classifier.as_ref().filter(|c| c.is_ready())?;
        let gestures: Vec<_> = classifier
            .available_labels()
            .iter()
            .map(|label| catalog::describe(label))
            .collect();
        Some(LabelListing {
            success: true,
            total: gestures.len(),
            gestures,
        })
    }

    pub fn status(&self) -> RecognizerStatus {
        self.status_at(Instant::now())
    }

    pub fn status_at(&self, now: Instant) -> RecognizerStatus {
        let stats = self.scheduler.stats();
        let cache = self.scheduler.cache();
        let cache_age = cache.age(now);
        let ready_classifier = self.backends.classifier.as_ref().filter(|c| c.is_ready());
        let labels = ready_classifier.map(|c| c.available_labels()).unwrap_or_default();

        RecognizerStatus {
            success: true,
            components: self.components(),
            classifier: ClassifierStatus {
                available_letters: labels.len(),
                labels,
                stability_info: ready_classifier.map(|c| c.stability_info()),
            },
            performance: PerformanceStats {
                frame_counter: stats.frames,
                frame_skip_rate: self.scheduler.skip_rate(),
                cache_duration_ms: cache.validity().as_millis() as u64,
                effective_fps: self.config.effective_fps(),
                cache_valid: cache_age.map_or(false, |age| age < cache.validity()),
                cache_age_ms: cache_age.map(|age| age.as_millis() as u64),
                classifications: self.classifications.load(Ordering::Relaxed),
                cache_hits: stats.cache_hits,
                skipped_frames: stats.skipped,
                processed_frames: stats.processed,
                timeouts: self.timeouts.load(Ordering::Relaxed),
            },
            timestamp: Utc::now(),
        }
    }

    /// Clears the counter, cache and last-known verdict.
    pub fn reset(&self) {
        self.scheduler.reset();
        info!("🔄 Recognizer state reset");
    }
}

impl Drop for FrameRecognizer {
    fn drop(&mut self) {
        debug!(
            "🗑️ FrameRecognizer dropped after {} frames",
            self.scheduler.frame_count()
        );
    }
}
