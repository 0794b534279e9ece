//! Transport-neutral request handlers speaking the JSON wire contract.
//!
//! Each handler returns the status code and body an HTTP layer would send.

use crate::core::exchange::{ExchangeError, ExchangeState, GesturePoll, ReplyPoll};
use crate::core::pipeline::{payload, FrameRecognizer, PipelineError, Verdict};
use log::{error, warn};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireResponse {
    pub status: u16,
    pub body: String,
}

impl WireResponse {
    pub fn json<T: Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => Self { status, body },
            Err(e) => {
                error!("❌ Failed to serialize response: {}", e);
                Self {
                    status: 500,
                    body: json!({"success": false, "error": "internal_error"}).to_string(),
                }
            }
        }
    }

    pub fn verdict(verdict: &Verdict) -> Self {
        Self::json(verdict.http_status(), verdict)
    }
}

/// Main classification endpoint: `{"image": "<base64>"}`.
pub fn classify(recognizer: &FrameRecognizer, body: Option<&str>) -> WireResponse {
    WireResponse::verdict(&recognizer.recognize_payload(body))
}

/// Direct classification that bypasses scheduling and the exchange.
pub fn classify_once(recognizer: &FrameRecognizer, body: Option<&str>) -> WireResponse {
    if !recognizer.is_available() {
        return WireResponse::verdict(&Verdict::unavailable());
    }
    let verdict = match payload::decode_request(body, recognizer.config().max_frame_size) {
        Ok(frame) => recognizer.classify_once(frame),
        Err(e) => PipelineError::from(e).to_verdict(),
    };
    WireResponse::verdict(&verdict)
}

pub fn labels(recognizer: &FrameRecognizer) -> WireResponse {
    match recognizer.labels() {
        Some(listing) => WireResponse::json(200, &listing),
        None => WireResponse::json(
            503,
            &json!({
                "success": false,
                "error": "components_not_available",
                "message": "Classifier is not available",
            }),
        ),
    }
}

pub fn status(recognizer: &FrameRecognizer) -> WireResponse {
    WireResponse::json(200, &recognizer.status())
}

/// Instructor-side poll of the learner slot.
pub fn latest_gesture(exchange: &ExchangeState) -> WireResponse {
    WireResponse::json(200, &GesturePoll::from(exchange.latest_learner()))
}

#[derive(Debug, Default, Deserialize)]
struct ReplyRequest {
    gesture: Option<String>,
    letter: Option<String>,
    description: Option<String>,
    category: Option<String>,
}

/// Instructor reply write: `{"gesture"|"letter": X, "description"?, "category"?}`.
pub fn send_reply(exchange: &ExchangeState, body: Option<&str>) -> WireResponse {
    let request = match body.map(serde_json::from_str::<ReplyRequest>).transpose() {
        Ok(request) => request.unwrap_or_default(),
        Err(e) => {
            warn!("⚠️ Malformed reply body: {}", e);
            ReplyRequest::default()
        }
    };

    let present = |value: &String| !value.trim().is_empty();
    let label = request
        .gesture
        .filter(present)
        .or(request.letter.filter(present))
        .unwrap_or_default();
    match exchange.send_reply(&label, request.description, request.category) {
        Ok(reply) => WireResponse::json(
            200,
            &json!({
                "success": true,
                "message": format!("Reply {} sent", reply.label),
                "gesture": reply,
            }),
        ),
        Err(e @ ExchangeError::MissingLabel) => {
            WireResponse::json(400, &json!({"success": false, "error": e.to_string()}))
        }
    }
}

/// Learner-side poll of the reply slot.
pub fn latest_reply(exchange: &ExchangeState) -> WireResponse {
    WireResponse::json(200, &ReplyPoll::from(exchange.latest_reply()))
}
