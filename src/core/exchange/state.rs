use crate::core::pipeline::Verdict;
use crate::core::vision::{catalog, ASL_CATEGORY};
use chrono::{DateTime, Utc};
use log::{debug, info};
use parking_lot::Mutex;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExchangeError {
    #[error("letter required")]
    MissingLabel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureStatus {
    Recognized,
    NotRecognized,
}

/// Most recent learner-side classification as seen by the instructor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LearnerGesture {
    pub label: Option<String>,
    pub confidence: f64,
    pub timestamp: DateTime<Utc>,
    pub description: String,
    pub category: String,
    pub status: GestureStatus,
}

impl LearnerGesture {
    pub fn from_verdict(verdict: &Verdict) -> Self {
        match (&verdict.label, verdict.success) {
            (Some(label), true) => {
                let info = catalog::describe(label);
                Self {
                    label: Some(label.clone()),
                    confidence: verdict.confidence,
                    timestamp: verdict.timestamp,
                    description: verdict.description.clone().unwrap_or(info.description),
                    category: verdict.category.clone().unwrap_or(info.category),
                    status: GestureStatus::Recognized,
                }
            }
            _ => Self {
                label: None,
                confidence: verdict.confidence,
                timestamp: verdict.timestamp,
                description: verdict.message.clone(),
                category: "unknown".to_string(),
                status: GestureStatus::NotRecognized,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstructorReply {
    pub label: String,
    pub timestamp: DateTime<Utc>,
    pub description: String,
    pub category: String,
}

/// Two independent last-write-wins slots shared by the learner and instructor roles.
///
/// Each slot has its own lock. Nothing is queued: a slow poller only ever
/// observes the latest value.
#[derive(Default)]
pub struct ExchangeState {
    learner: Mutex<Option<LearnerGesture>>,
    reply: Mutex<Option<InstructorReply>>,
}

impl ExchangeState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish_learner(&self, gesture: LearnerGesture) {
        debug!(
            "📤 Learner gesture {:?} ({:?}, {:.2})",
            gesture.label, gesture.status, gesture.confidence
        );
        *self.learner.lock() = Some(gesture);
    }

    /// Publishes the learner-side view of `verdict` and returns it.
    pub fn record_learner(&self, verdict: &Verdict) -> LearnerGesture {
        let gesture = LearnerGesture::from_verdict(verdict);
        self.publish_learner(gesture.clone());
        gesture
    }

    pub fn latest_learner(&self) -> Option<LearnerGesture> {
        self.learner.lock().clone()
    }

    /// Stores an instructor reply. Missing description/category fall back to the letter catalog.
    pub fn send_reply(
        &self,
        label: &str,
        description: Option<String>,
        category: Option<String>,
    ) -> Result<InstructorReply, ExchangeError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(ExchangeError::MissingLabel);
        }

        let info = catalog::describe(label);
        let reply = InstructorReply {
            label: label.to_string(),
            timestamp: Utc::now(),
            description: description.filter(|d| !d.trim().is_empty()).unwrap_or(info.description),
            category: category
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| ASL_CATEGORY.to_string()),
        };
        info!("📨 Instructor reply: {}", reply.label);
        *self.reply.lock() = Some(reply.clone());
        Ok(reply)
    }

    pub fn latest_reply(&self) -> Option<InstructorReply> {
        self.reply.lock().clone()
    }

    pub fn clear(&self) {
        *self.learner.lock() = None;
        *self.reply.lock() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pipeline::DecisionPolicy;
    use crate::core::vision::StabilityInfo;
    use std::sync::Arc;
    use std::thread;

    fn accepted(letter: &str) -> Verdict {
        DecisionPolicy::default().decide(Some(letter), 0.9, Vec::new(), &StabilityInfo::default())
    }

    #[test]
    fn test_empty_slots() {
        let state = ExchangeState::new();
        assert!(state.latest_learner().is_none());
        assert!(state.latest_reply().is_none());
    }

    #[test]
    fn test_recognized_and_not_recognized() {
        let state = ExchangeState::new();

        let gesture = state.record_learner(&accepted("L"));
        assert_eq!(gesture.status, GestureStatus::Recognized);
        assert_eq!(gesture.label.as_deref(), Some("L"));
        assert_eq!(gesture.category, ASL_CATEGORY);

        let rejected = Verdict::no_hands();
        let gesture = state.record_learner(&rejected);
        assert_eq!(gesture.status, GestureStatus::NotRecognized);
        assert!(gesture.label.is_none());
        assert_eq!(gesture.description, rejected.message);
        assert_eq!(state.latest_learner(), Some(gesture));
    }

    #[test]
    fn test_reads_are_idempotent() {
        let state = ExchangeState::new();
        state.record_learner(&accepted("Y"));
        assert_eq!(state.latest_learner(), state.latest_learner());

        state.send_reply("Y", None, None).unwrap();
        assert_eq!(state.latest_reply(), state.latest_reply());
    }

    #[test]
    fn test_reply_defaults_and_validation() {
        let state = ExchangeState::new();
        assert_eq!(state.send_reply("  ", None, None), Err(ExchangeError::MissingLabel));
        assert!(state.latest_reply().is_none());

        let reply = state.send_reply("H", None, Some(String::new())).unwrap();
        assert_eq!(reply.description, "Letter H of the ASL alphabet");
        assert_eq!(reply.category, ASL_CATEGORY);

        let custom = state
            .send_reply("I", Some("Pinky up".to_string()), Some("practice".to_string()))
            .unwrap();
        assert_eq!(state.latest_reply(), Some(custom));
    }

    #[test]
    fn test_last_write_wins_under_concurrency() {
        let state = Arc::new(ExchangeState::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let state = Arc::clone(&state);
                thread::spawn(move || {
                    let letter = ((b'A' + i as u8) as char).to_string();
                    state.send_reply(&letter, None, None).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let reply = state.latest_reply().unwrap();
        assert!(('A'..='H').any(|c| reply.label == c.to_string()));
        assert_eq!(reply.description, catalog::describe(&reply.label).description);
    }

    #[test]
    fn test_slots_are_independent() {
        let state = ExchangeState::new();
        state.send_reply("B", None, None).unwrap();
        assert!(state.latest_learner().is_none());
        state.clear();
        assert!(state.latest_reply().is_none());
    }
}
