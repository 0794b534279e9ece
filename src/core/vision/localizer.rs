use super::error::VisionError;
use super::frame::Frame;
use super::landmarks::{Landmark, LANDMARK_COUNT};
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HandPresence {
    pub present: bool,
    pub count: usize,
}

/// Construction options handed to concrete hand-landmark backends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalizerOptions {
    pub max_num_hands: usize,
    pub min_detection_confidence: f32,
    pub min_tracking_confidence: f32,
}

impl Default for LocalizerOptions {
    fn default() -> Self {
        Self {
            max_num_hands: 1,
            min_detection_confidence: 0.5,
            min_tracking_confidence: 0.5,
        }
    }
}

/// Hand-landmark detector capability.
///
/// Landmarks are returned raw; the pipeline validates them into
/// `LandmarkSet`s so a malformed detector answer is observable.
pub trait HandLocalizer: Send + Sync {
    fn is_ready(&self) -> bool {
        true
    }

    fn detect(&self, frame: &Frame) -> Result<HandPresence, VisionError>;

    /// Every detected hand, in detector order. `None` when nothing was found.
    fn all_landmarks(&self, frame: &Frame) -> Result<Option<Vec<Vec<Landmark>>>, VisionError>;

    /// First detected hand only.
    fn landmarks(&self, frame: &Frame) -> Result<Option<Vec<Landmark>>, VisionError> {
        Ok(self
            .all_landmarks(frame)?
            .and_then(|hands| hands.into_iter().next()))
    }
}

type HandPattern = Box<dyn Fn(&Frame) -> Vec<Vec<Landmark>> + Send + Sync>;

/// Scripted localizer for tests and demo builds.
pub struct MockHandLocalizer {
    hands_for: Option<HandPattern>,
    ready: bool,
    detect_calls: AtomicUsize,
}

impl MockHandLocalizer {
    /// Never sees a hand.
    pub fn new() -> Self {
        Self {
            hands_for: None,
            ready: true,
            detect_calls: AtomicUsize::new(0),
        }
    }

    /// Sees the same hand in every frame.
    pub fn with_hand(points: Vec<Landmark>) -> Self {
        Self::with_pattern(move |_| vec![points.clone()])
    }

    pub fn with_pattern<F>(pattern: F) -> Self
    where
        F: Fn(&Frame) -> Vec<Vec<Landmark>> + Send + Sync + 'static,
    {
        Self {
            hands_for: Some(Box::new(pattern)),
            ready: true,
            detect_calls: AtomicUsize::new(0),
        }
    }

    /// Reports itself as failed to initialise.
    pub fn unavailable() -> Self {
        Self {
            ready: false,
            ..Self::new()
        }
    }

    /// 21 points on a small diagonal around (`cx`, `cy`).
    pub fn synthetic_hand(cx: f32, cy: f32, spread: f32) -> Vec<Landmark> {
        (0..LANDMARK_COUNT)
            .map(|i| {
                let t = i as f32 / (LANDMARK_COUNT - 1) as f32 - 0.5;
                Landmark::new(cx + spread * t, cy + spread * t, -0.02 * t)
            })
            .collect()
    }

    pub fn detect_calls(&self) -> usize {
        self.detect_calls.load(Ordering::SeqCst)
    }

    fn hands(&self, frame: &Frame) -> Vec<Vec<Landmark>> {
        self.hands_for
            .as_ref()
            .map(|pattern| pattern(frame))
            .unwrap_or_default()
    }
}

impl Default for MockHandLocalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl HandLocalizer for MockHandLocalizer {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn detect(&self, frame: &Frame) -> Result<HandPresence, VisionError> {
        self.detect_calls.fetch_add(1, Ordering::SeqCst);
        let count = self.hands(frame).len();
        Ok(HandPresence {
            present: count > 0,
            count,
        })
    }

    fn all_landmarks(&self, frame: &Frame) -> Result<Option<Vec<Vec<Landmark>>>, VisionError> {
        let hands = self.hands(frame);
        Ok(if hands.is_empty() { None } else { Some(hands) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_mock_sees_nothing() {
        let localizer = MockHandLocalizer::new();
        let frame = Frame::solid(8, 8, 0);
        let presence = localizer.detect(&frame).unwrap();
        assert!(!presence.present);
        assert_eq!(presence.count, 0);
        assert!(localizer.landmarks(&frame).unwrap().is_none());
        assert_eq!(localizer.detect_calls(), 1);
    }

    #[test]
    fn test_pattern_mock_keys_on_frame_content() {
        let localizer = MockHandLocalizer::with_pattern(|frame| {
            if frame.data[0] > 100 {
                vec![MockHandLocalizer::synthetic_hand(0.5, 0.5, 0.2)]
            } else {
                Vec::new()
            }
        });

        assert!(!localizer.detect(&Frame::solid(8, 8, 10)).unwrap().present);
        let bright = Frame::solid(8, 8, 200);
        assert!(localizer.detect(&bright).unwrap().present);
        assert_eq!(localizer.landmarks(&bright).unwrap().unwrap().len(), LANDMARK_COUNT);
    }

    #[test]
    fn test_synthetic_hand_is_centered() {
        let hand = MockHandLocalizer::synthetic_hand(0.5, 0.4, 0.2);
        assert_eq!(hand.len(), LANDMARK_COUNT);
        assert!((hand[10].x - 0.5).abs() < 1e-6);
        assert!((hand[0].y - 0.3).abs() < 1e-6);
    }
}
