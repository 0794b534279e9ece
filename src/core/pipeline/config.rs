use crate::core::vision::catalog;
use crate::core::vision::LocalizerOptions;
use log::info;
use std::collections::HashSet;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
    #[error("classifier exposes no labels")]
    EmptyLabelSet,
    #[error("label {0:?} appears more than once")]
    DuplicateLabel(String),
    #[error("label {0:?} is not part of the letter catalog")]
    UnknownLabel(String),
    #[error("classifier exposes {actual} labels, expected {expected}")]
    LabelCount { expected: usize, actual: usize },
}

#[derive(Debug, Clone)]
pub struct RecognizerConfig {
    /// Full classification runs on every Nth frame.
    pub frame_skip_rate: u64,
    /// Validity window of the single-slot result cache.
    pub cache_duration: Duration,
    /// Skipped frames reuse the last verdict only while it is younger than this.
    pub stale_result_window: Duration,
    pub localizer: LocalizerOptions,
    /// Labels below this confidence are discarded before the decision tiers.
    pub min_classifier_confidence: f64,
    pub top_k: usize,
    /// `None` runs detector and classifier inline on the calling thread.
    pub inference_timeout: Option<Duration>,
    pub expected_label_count: Option<usize>,
    pub max_frame_size: (u32, u32),
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            frame_skip_rate: 3,
            cache_duration: Duration::from_millis(100),
            stale_result_window: Duration::from_millis(500),
            localizer: LocalizerOptions::default(),
            min_classifier_confidence: 0.3,
            top_k: 3,
            inference_timeout: Some(Duration::from_millis(2000)),
            expected_label_count: None,
            max_frame_size: (640, 480),
        }
    }
}

impl RecognizerConfig {
    /// Fewer classifier runs for battery-constrained devices.
    pub fn for_low_power() -> Self {
        Self {
            frame_skip_rate: 5,
            cache_duration: Duration::from_millis(200),
            stale_result_window: Duration::from_millis(800),
            max_frame_size: (480, 360),
            ..Default::default()
        }
    }

    /// Reads `.env` (if present) and then the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        let config = Self::from_lookup(|key| std::env::var(key).ok())?;
        info!(
            "⚙️ Recognizer config: skip_rate={} cache={}ms timeout={:?}",
            config.frame_skip_rate,
            config.cache_duration.as_millis(),
            config.inference_timeout
        );
        Ok(config)
    }

    /// Builds a config from an arbitrary key lookup; unset keys keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(rate) = parse_var::<u64, _>(&lookup, "FRAME_SKIP_RATE")? {
            config.frame_skip_rate = rate;
        }
        if let Some(secs) = parse_var::<f64, _>(&lookup, "CACHE_DURATION")? {
            config.cache_duration = seconds("CACHE_DURATION", secs)?;
        }
        if let Some(ms) = parse_var::<u64, _>(&lookup, "STALE_RESULT_MS")? {
            config.stale_result_window = Duration::from_millis(ms);
        }
        if let Some(v) = parse_var::<f32, _>(&lookup, "MIN_DETECTION_CONFIDENCE")? {
            config.localizer.min_detection_confidence = v;
        }
        if let Some(v) = parse_var::<f32, _>(&lookup, "MIN_TRACKING_CONFIDENCE")? {
            config.localizer.min_tracking_confidence = v;
        }
        if let Some(v) = parse_var::<usize, _>(&lookup, "MAX_NUM_HANDS")? {
            config.localizer.max_num_hands = v;
        }
        if let Some(v) = parse_var::<f64, _>(&lookup, "MIN_CLASSIFIER_CONFIDENCE")? {
            config.min_classifier_confidence = v;
        }
        if let Some(v) = parse_var::<usize, _>(&lookup, "TOP_K")? {
            config.top_k = v;
        }
        if let Some(ms) = parse_var::<u64, _>(&lookup, "INFERENCE_TIMEOUT_MS")? {
            config.inference_timeout = (ms > 0).then(|| Duration::from_millis(ms));
        }
        if let Some(count) = parse_var::<usize, _>(&lookup, "EXPECTED_LABEL_COUNT")? {
            config.expected_label_count = Some(count);
        }
        if let Some(w) = parse_var::<u32, _>(&lookup, "MAX_FRAME_WIDTH")? {
            config.max_frame_size.0 = w;
        }
        if let Some(h) = parse_var::<u32, _>(&lookup, "MAX_FRAME_HEIGHT")? {
            config.max_frame_size.1 = h;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_skip_rate == 0 {
            return Err(invalid("FRAME_SKIP_RATE", self.frame_skip_rate, "must be at least 1"));
        }
        check_unit("MIN_DETECTION_CONFIDENCE", self.localizer.min_detection_confidence as f64)?;
        check_unit("MIN_TRACKING_CONFIDENCE", self.localizer.min_tracking_confidence as f64)?;
        check_unit("MIN_CLASSIFIER_CONFIDENCE", self.min_classifier_confidence)?;
        if self.localizer.max_num_hands == 0 {
            return Err(invalid("MAX_NUM_HANDS", 0, "must be at least 1"));
        }
        if self.top_k == 0 {
            return Err(invalid("TOP_K", 0, "must be at least 1"));
        }
        let (w, h) = self.max_frame_size;
        if w == 0 || h == 0 {
            return Err(invalid("MAX_FRAME_WIDTH", format!("{}x{}", w, h), "frame bounds must be non-zero"));
        }
        Ok(())
    }

    /// Startup check of the classifier's label set against the letter catalog.
    pub fn validate_labels(&self, labels: &[String]) -> Result<(), ConfigError> {
        if labels.is_empty() {
            return Err(ConfigError::EmptyLabelSet);
        }

        let mut seen = HashSet::with_capacity(labels.len());
        for label in labels {
            if !catalog::is_known_letter(label) {
                return Err(ConfigError::UnknownLabel(label.clone()));
            }
            if !seen.insert(label.as_str()) {
                return Err(ConfigError::DuplicateLabel(label.clone()));
            }
        }

        if let Some(expected) = self.expected_label_count {
            if expected != labels.len() {
                return Err(ConfigError::LabelCount {
                    expected,
                    actual: labels.len(),
                });
            }
        }
        Ok(())
    }

    /// Classifier invocations per second at a 30 fps input.
    pub fn effective_fps(&self) -> f64 {
        30.0 / self.frame_skip_rate.max(1) as f64
    }
}

fn parse_var<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| invalid(key, &raw, e)),
    }
}

fn seconds(key: &'static str, secs: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(secs).map_err(|e| invalid(key, secs, e))
}

fn check_unit(key: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(key, value, "must be within [0, 1]"))
    }
}

fn invalid(key: &'static str, value: impl Display, reason: impl Display) -> ConfigError {
    ConfigError::InvalidValue {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
