use crate::core::vision::{LetterInfo, StabilityInfo};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentStatus {
    pub hand_localizer: bool,
    pub classifier: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifierStatus {
    pub available_letters: usize,
    pub labels: Vec<String>,
    pub stability_info: Option<StabilityInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceStats {
    pub frame_counter: u64,
    pub frame_skip_rate: u64,
    pub cache_duration_ms: u64,
    pub effective_fps: f64,
    pub cache_valid: bool,
    pub cache_age_ms: Option<u64>,
    pub classifications: u64,
    pub cache_hits: u64,
    pub skipped_frames: u64,
    /// Frames handed to the detector, whatever their outcome.
    pub processed_frames: u64,
    pub timeouts: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecognizerStatus {
    pub success: bool,
    pub components: ComponentStatus,
    pub classifier: ClassifierStatus,
    pub performance: PerformanceStats,
    pub timestamp: DateTime<Utc>,
}

/// Letters the loaded classifier can produce, with catalog metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelListing {
    pub success: bool,
    pub gestures: Vec<LetterInfo>,
    pub total: usize,
}
