//! Real-time frame decision pipeline.
//!
//! ```text
//! frame ─▶ NearDuplicateFilter ─▶ FrameScheduler ─┬─▶ cached / skipped verdict
//!                                                 └─▶ HandLocalizer ─▶ RegionExtractor
//!                                                     ─▶ Classifier ─▶ DecisionPolicy
//!                                                     ─▶ ResultCache + ExchangeState
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod payload;
pub mod policy;
pub mod recognizer;
pub mod scheduler;
pub mod status;
pub mod verdict;

pub use cache::ResultCache;
pub use config::{ConfigError, RecognizerConfig};
pub use error::PipelineError;
pub use payload::{FrameRequest, PayloadError};
pub use policy::{tier_for, DecisionPolicy, Tier, ACCEPT_THRESHOLD, TENTATIVE_THRESHOLD};
pub use recognizer::{Backends, FrameRecognizer};
pub use scheduler::{FrameScheduler, ScheduleAction, ScheduleDecision, SchedulerStats};
pub use status::{LabelListing, RecognizerStatus};
pub use verdict::{ErrorCode, Outcome, Verdict};
