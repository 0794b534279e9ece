use crate::core::vision::{BoundingBox, LandmarkSet, RankedLabel, RegionSize, StabilityInfo};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Accepted,
    Tentative,
    Rejected,
    NoHands,
    InvalidLandmarks,
    Processing,
    Error,
}

/// Stable reason codes carried on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NoData,
    NoImage,
    ImageProcessingFailed,
    NoHandsDetected,
    InvalidLandmarks,
    ComponentsNotAvailable,
    AslRecognitionError,
    InferenceTimeout,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NoData => "no_data",
            ErrorCode::NoImage => "no_image",
            ErrorCode::ImageProcessingFailed => "image_processing_failed",
            ErrorCode::NoHandsDetected => "no_hands_detected",
            ErrorCode::InvalidLandmarks => "invalid_landmarks",
            ErrorCode::ComponentsNotAvailable => "components_not_available",
            ErrorCode::AslRecognitionError => "asl_recognition_error",
            ErrorCode::InferenceTimeout => "inference_timeout",
            ErrorCode::InternalError => "internal_error",
        }
    }
}

/// Complete outcome of one classification request.
///
/// Every request path, including failures, produces one of these.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    pub success: bool,
    pub outcome: Outcome,
    pub message: String,
    #[serde(rename = "letter")]
    pub label: Option<String>,
    /// Set only for accepted letters.
    pub gesture: Option<String>,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub hands_detected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub landmarks: Option<Vec<LandmarkSet>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hand_region_size: Option<RegionSize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub top_predictions: Vec<RankedLabel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stability_info: Option<StabilityInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
    pub frame_processed: bool,
    pub frame_skipped: bool,
    pub from_cache: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_number: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_age_ms: Option<u64>,
    pub timestamp: DateTime<Utc>,
}

impl Verdict {
    /// Bare verdict; the named constructors below fill in the rest.
    pub fn base(outcome: Outcome, message: impl Into<String>) -> Self {
        Self {
            success: false,
            outcome,
            message: message.into(),
            label: None,
            gesture: None,
            confidence: 0.0,
            description: None,
            category: None,
            hands_detected: false,
            error: None,
            bounding_box: None,
            landmarks: None,
            hand_region_size: None,
            top_predictions: Vec::new(),
            stability_info: None,
            suggestions: Vec::new(),
            frame_processed: false,
            frame_skipped: false,
            from_cache: false,
            frame_number: None,
            cache_age_ms: None,
            timestamp: Utc::now(),
        }
    }

    fn failure(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            error: Some(code),
            ..Self::base(Outcome::Error, message)
        }
    }

    pub fn unavailable() -> Self {
        Self::failure(
            ErrorCode::ComponentsNotAvailable,
            "Recognition components are not available",
        )
    }

    /// Malformed or absent request payload.
    pub fn transport_error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::failure(code, message)
    }

    pub fn no_hands() -> Self {
        Self {
            error: Some(ErrorCode::NoHandsDetected),
            suggestions: no_hands_suggestions(),
            frame_processed: true,
            ..Self::base(Outcome::NoHands, "No hands detected")
        }
    }

    pub fn invalid_landmarks(hands_detected: bool) -> Self {
        Self {
            error: Some(ErrorCode::InvalidLandmarks),
            hands_detected,
            frame_processed: true,
            ..Self::base(Outcome::InvalidLandmarks, "Could not extract valid hand landmarks")
        }
    }

    pub fn recognition_error(detail: impl std::fmt::Display) -> Self {
        Self {
            hands_detected: true,
            ..Self::failure(
                ErrorCode::AslRecognitionError,
                format!("Letter recognition failed: {}", detail),
            )
        }
    }

    pub fn inference_timeout(timeout_ms: u128) -> Self {
        Self::failure(
            ErrorCode::InferenceTimeout,
            format!("Recognition did not finish within {}ms", timeout_ms),
        )
    }

    pub fn inference_backlog(in_flight: usize) -> Self {
        Self::failure(
            ErrorCode::InferenceTimeout,
            format!("Recognition is busy ({} frames already in flight)", in_flight),
        )
    }

    pub fn internal_error(detail: impl std::fmt::Display) -> Self {
        Self::failure(ErrorCode::InternalError, format!("Internal error: {}", detail))
    }

    /// Neutral placeholder for a skipped frame with no fresh prior verdict.
    pub fn processing(frame_number: u64) -> Self {
        Self {
            frame_skipped: true,
            frame_number: Some(frame_number),
            ..Self::base(Outcome::Processing, "Processing frame...")
        }
    }

    pub fn with_cache(mut self, age_ms: u64) -> Self {
        self.from_cache = true;
        self.frame_skipped = false;
        self.cache_age_ms = Some(age_ms);
        self
    }

    pub fn skipped(mut self, frame_number: u64) -> Self {
        self.frame_skipped = true;
        self.from_cache = false;
        self.cache_age_ms = None;
        self.frame_number = Some(frame_number);
        self
    }

    /// Status code a transport should answer with.
    pub fn http_status(&self) -> u16 {
        match self.error {
            None | Some(ErrorCode::NoHandsDetected) | Some(ErrorCode::InvalidLandmarks) => 200,
            Some(ErrorCode::NoData) | Some(ErrorCode::NoImage) | Some(ErrorCode::ImageProcessingFailed) => 400,
            Some(ErrorCode::ComponentsNotAvailable) => 503,
            Some(ErrorCode::AslRecognitionError)
            | Some(ErrorCode::InferenceTimeout)
            | Some(ErrorCode::InternalError) => 500,
        }
    }
}

fn no_hands_suggestions() -> Vec<String> {
    vec![
        "Place your hand in front of the camera".to_string(),
        "Make sure your hand is fully visible".to_string(),
        "Use good lighting".to_string(),
        "Keep your hand 30-60 cm from the camera".to_string(),
    ]
}
