use super::error::VisionError;
use serde::Serialize;

/// Number of keypoints a hand detector reports per hand.
pub const LANDMARK_COUNT: usize = 21;

/// One hand keypoint. `x`/`y` are normalized to the frame, `z` is relative depth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Exactly 21 validated landmarks with `x`/`y` clamped into `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LandmarkSet(Vec<Landmark>);

impl LandmarkSet {
    pub fn from_points(points: Vec<Landmark>) -> Result<Self, VisionError> {
        if points.len() != LANDMARK_COUNT {
            return Err(VisionError::LandmarkCount(points.len()));
        }

        let mut normalized = Vec::with_capacity(LANDMARK_COUNT);
        for (index, point) in points.into_iter().enumerate() {
            if !(point.x.is_finite() && point.y.is_finite() && point.z.is_finite()) {
                return Err(VisionError::NonFiniteLandmark(index));
            }
            normalized.push(Landmark {
                x: point.x.clamp(0.0, 1.0),
                y: point.y.clamp(0.0, 1.0),
                z: point.z,
            });
        }

        Ok(Self(normalized))
    }

    pub fn points(&self) -> &[Landmark] {
        &self.0
    }
}

impl TryFrom<Vec<Landmark>> for LandmarkSet {
    type Error = VisionError;

    fn try_from(points: Vec<Landmark>) -> Result<Self, Self::Error> {
        Self::from_points(points)
    }
}

/// Validates every detected hand, dropping malformed ones, keeping at most `max_hands`.
pub fn normalize_hands(hands: Vec<Vec<Landmark>>, max_hands: usize) -> Vec<LandmarkSet> {
    hands
        .into_iter()
        .filter_map(|points| LandmarkSet::from_points(points).ok())
        .take(max_hands)
        .collect()
}
