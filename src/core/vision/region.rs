use super::frame::Frame;
use super::landmarks::Landmark;
use serde::Serialize;
use std::borrow::Cow;

/// Fraction of the hand's own width/height added on each side of the crop.
pub const REGION_MARGIN: f64 = 0.2;

/// Inclusive pixel bounds, always inside `[0, width) x [0, height)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoundingBox {
    min_x: u32,
    max_x: u32,
    min_y: u32,
    max_y: u32,
    width: u32,
    height: u32,
}

impl BoundingBox {
    /// Margin-padded box around `points`, clamped to a `frame_width`x`frame_height` frame.
    pub fn around(points: &[Landmark], frame_width: u32, frame_height: u32, margin: f64) -> Option<Self> {
        if points.is_empty() || frame_width == 0 || frame_height == 0 {
            return None;
        }

        let to_px = |v: f32, extent: u32| -> u32 {
            let px = (v as f64 * extent as f64) as i64;
            px.clamp(0, extent as i64 - 1) as u32
        };

        let (mut min_x, mut max_x) = (u32::MAX, 0u32);
        let (mut min_y, mut max_y) = (u32::MAX, 0u32);
        for point in points {
            let x = to_px(point.x, frame_width);
            let y = to_px(point.y, frame_height);
            min_x = min_x.min(x);
            max_x = max_x.max(x);
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }

        let margin_x = ((max_x - min_x) as f64 * margin) as u32;
        let margin_y = ((max_y - min_y) as f64 * margin) as u32;

        let min_x = min_x.saturating_sub(margin_x);
        let max_x = max_x.saturating_add(margin_x).min(frame_width - 1);
        let min_y = min_y.saturating_sub(margin_y);
        let max_y = max_y.saturating_add(margin_y).min(frame_height - 1);

        Some(Self {
            min_x,
            max_x,
            min_y,
            max_y,
            width: max_x - min_x + 1,
            height: max_y - min_y + 1,
        })
    }

    pub fn min_x(&self) -> u32 {
        self.min_x
    }

    pub fn max_x(&self) -> u32 {
        self.max_x
    }

    pub fn min_y(&self) -> u32 {
        self.min_y
    }

    pub fn max_y(&self) -> u32 {
        self.max_y
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegionSize {
    pub width: u32,
    pub height: u32,
}

/// Pixels handed to the classifier. Borrowed when the whole frame is used.
#[derive(Debug)]
pub struct Region<'a> {
    pub image: Cow<'a, Frame>,
    pub bounds: Option<BoundingBox>,
}

impl Region<'_> {
    pub fn size(&self) -> RegionSize {
        RegionSize {
            width: self.image.width,
            height: self.image.height,
        }
    }

    pub fn is_full_frame(&self) -> bool {
        self.bounds.is_none()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RegionExtractor {
    margin: f64,
}

impl RegionExtractor {
    pub fn new() -> Self {
        Self {
            margin: REGION_MARGIN,
        }
    }

    /// Crops the signing hand out of `frame`.
    ///
    /// Fails open: with no landmarks or a malformed frame the original frame is
    /// returned untouched so the classifier still receives something.
    pub fn extract<'a>(&self, frame: &'a Frame, landmarks: &[Landmark]) -> Region<'a> {
        if !frame.is_well_formed() {
            return Region {
                image: Cow::Borrowed(frame),
                bounds: None,
            };
        }

        match BoundingBox::around(landmarks, frame.width, frame.height, self.margin) {
            Some(bounds) => Region {
                image: Cow::Owned(frame.crop(bounds.min_x, bounds.min_y, bounds.max_x, bounds.max_y)),
                bounds: Some(bounds),
            },
            None => Region {
                image: Cow::Borrowed(frame),
                bounds: None,
            },
        }
    }
}

impl Default for RegionExtractor {
    fn default() -> Self {
        Self::new()
    }
}
