use super::catalog;
use super::error::VisionError;
use super::frame::Frame;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: Option<String>,
    pub confidence: f64,
}

impl Prediction {
    pub fn new(label: Option<&str>, confidence: f64) -> Self {
        Self {
            label: label.map(str::to_string),
            confidence,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedLabel {
    pub letter: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StabilityInfo {
    pub stable: bool,
    pub message: String,
}

impl Default for StabilityInfo {
    fn default() -> Self {
        Self {
            stable: true,
            message: "Trained model, high precision".to_string(),
        }
    }
}

/// Image classifier capability.
pub trait Classifier: Send + Sync {
    /// Whether the model and its label mapping finished loading.
    fn is_ready(&self) -> bool;

    fn predict(&self, region: &Frame) -> Result<Prediction, VisionError>;

    fn top_k(&self, region: &Frame, k: usize) -> Result<Vec<RankedLabel>, VisionError>;

    fn available_labels(&self) -> Vec<String>;

    fn stability_info(&self) -> StabilityInfo {
        StabilityInfo::default()
    }
}

type PredictionPattern = Box<dyn Fn(&Frame) -> Prediction + Send + Sync>;

/// Scripted classifier; `predict_calls` doubles as an invocation spy.
pub struct MockClassifier {
    pattern: PredictionPattern,
    labels: Vec<String>,
    latency: Option<Duration>,
    ready: bool,
    predict_calls: AtomicUsize,
}

impl MockClassifier {
    /// Always answers `(label, confidence)` over the full A–Z alphabet.
    pub fn with_prediction(label: Option<&str>, confidence: f64) -> Self {
        let prediction = Prediction::new(label, confidence);
        Self::with_pattern(move |_| prediction.clone())
    }

    pub fn with_pattern<F>(pattern: F) -> Self
    where
        F: Fn(&Frame) -> Prediction + Send + Sync + 'static,
    {
        Self {
            pattern: Box::new(pattern),
            labels: catalog::alphabet(),
            latency: None,
            ready: true,
            predict_calls: AtomicUsize::new(0),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            ready: false,
            labels: Vec::new(),
            ..Self::with_prediction(None, 0.0)
        }
    }

    pub fn labels(mut self, labels: Vec<String>) -> Self {
        self.labels = labels;
        self
    }

    /// Sleeps this long inside every `predict`.
    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn predict_calls(&self) -> usize {
        self.predict_calls.load(Ordering::SeqCst)
    }
}

impl Classifier for MockClassifier {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn predict(&self, region: &Frame) -> Result<Prediction, VisionError> {
        self.predict_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            std::thread::sleep(latency);
        }
        Ok((self.pattern)(region))
    }

    /// Scripted label first, remaining probability mass halved down the label list.
    fn top_k(&self, region: &Frame, k: usize) -> Result<Vec<RankedLabel>, VisionError> {
        let prediction = (self.pattern)(region);
        let mut ranked = Vec::with_capacity(k);
        let mut remaining = 1.0 - prediction.confidence.clamp(0.0, 1.0);

        if let Some(label) = &prediction.label {
            ranked.push(RankedLabel {
                letter: label.clone(),
                confidence: prediction.confidence,
            });
        }
        for label in &self.labels {
            if ranked.len() >= k {
                break;
            }
            if prediction.label.as_deref() == Some(label.as_str()) {
                continue;
            }
            remaining /= 2.0;
            ranked.push(RankedLabel {
                letter: label.clone(),
                confidence: remaining,
            });
        }
        ranked.truncate(k);
        Ok(ranked)
    }

    fn available_labels(&self) -> Vec<String> {
        self.labels.clone()
    }
}
