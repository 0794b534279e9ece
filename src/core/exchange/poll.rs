use super::state::{GestureStatus, InstructorReply, LearnerGesture};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Instructor-side view of the learner slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GesturePoll {
    pub success: bool,
    pub gesture: Option<String>,
    pub confidence: f64,
    pub timestamp: Option<DateTime<Utc>>,
    pub description: String,
    pub category: Option<String>,
    pub status: Option<GestureStatus>,
    pub has_gesture: bool,
}

impl From<Option<LearnerGesture>> for GesturePoll {
    fn from(slot: Option<LearnerGesture>) -> Self {
        match slot {
            Some(g) => Self {
                success: true,
                gesture: g.label,
                confidence: g.confidence,
                timestamp: Some(g.timestamp),
                description: g.description,
                category: Some(g.category),
                status: Some(g.status),
                has_gesture: true,
            },
            None => Self {
                success: true,
                gesture: None,
                confidence: 0.0,
                timestamp: None,
                description: "Waiting for learner signs...".to_string(),
                category: None,
                status: None,
                has_gesture: false,
            },
        }
    }
}

/// Learner-side view of the reply slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplyPoll {
    pub success: bool,
    pub gesture: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub has_response: bool,
}

impl From<Option<InstructorReply>> for ReplyPoll {
    fn from(slot: Option<InstructorReply>) -> Self {
        match slot {
            Some(r) => Self {
                success: true,
                gesture: Some(r.label),
                timestamp: Some(r.timestamp),
                description: Some(r.description),
                category: Some(r.category),
                has_response: true,
            },
            None => Self {
                success: true,
                gesture: None,
                timestamp: None,
                description: None,
                category: None,
                has_response: false,
            },
        }
    }
}
