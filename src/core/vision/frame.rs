use super::error::VisionError;
use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};

/// Decoded camera frame (RGBA, row-major).
///
/// Frames are owned by the request that produced them and never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Frame {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, VisionError> {
        if width == 0 || height == 0 {
            return Err(VisionError::EmptyFrame);
        }
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(VisionError::BufferSize {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Uniformly filled frame; every channel including alpha set to `fill`.
    pub fn solid(width: u32, height: u32, fill: u8) -> Self {
        Self {
            width,
            height,
            data: vec![fill; width as usize * height as usize * 4],
        }
    }

    pub fn from_dynamic(image: DynamicImage) -> Self {
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self {
            width,
            height,
            data: rgba.into_raw(),
        }
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// True when the buffer matches the declared dimensions and is non-empty.
    pub fn is_well_formed(&self) -> bool {
        self.pixel_count() > 0 && self.data.len() == self.pixel_count() * 4
    }

    /// Single intensity channel using integer BT.601 weights.
    pub fn to_luma(&self) -> Vec<u8> {
        self.data
            .chunks_exact(4)
            .map(|rgba| {
                ((rgba[0] as u32 * 299 + rgba[1] as u32 * 587 + rgba[2] as u32 * 114) / 1000) as u8
            })
            .collect()
    }

    pub fn resize_to(&self, target_width: u32, target_height: u32) -> Result<Frame, VisionError> {
        let img = RgbaImage::from_raw(self.width, self.height, self.data.clone()).ok_or(
            VisionError::BufferSize {
                width: self.width,
                height: self.height,
                expected: self.pixel_count() * 4,
                actual: self.data.len(),
            },
        )?;
        let resized =
            image::imageops::resize(&img, target_width, target_height, FilterType::Lanczos3);

        Ok(Frame {
            width: target_width,
            height: target_height,
            data: resized.into_raw(),
        })
    }

    /// Downscales to exactly `max_width`x`max_height` when either side is larger.
    pub fn fit_within(self, max_width: u32, max_height: u32) -> Result<Frame, VisionError> {
        if self.width > max_width || self.height > max_height {
            self.resize_to(max_width, max_height)
        } else {
            Ok(self)
        }
    }

    /// Copies the inclusive pixel rectangle out of the frame. Bounds are clamped.
    pub fn crop(&self, min_x: u32, min_y: u32, max_x: u32, max_y: u32) -> Frame {
        let max_x = max_x.min(self.width.saturating_sub(1));
        let max_y = max_y.min(self.height.saturating_sub(1));
        let min_x = min_x.min(max_x);
        let min_y = min_y.min(max_y);

        let crop_w = (max_x - min_x + 1) as usize;
        let crop_h = (max_y - min_y + 1) as usize;
        let stride = self.width as usize * 4;

        let mut data = Vec::with_capacity(crop_w * crop_h * 4);
        for y in min_y as usize..=max_y as usize {
            let row_start = y * stride + min_x as usize * 4;
            data.extend_from_slice(&self.data[row_start..row_start + crop_w * 4]);
        }

        Frame {
            width: crop_w as u32,
            height: crop_h as u32,
            data,
        }
    }
}

/// Planar YUV420 (I420) frame as delivered by mobile camera APIs.
#[derive(Debug)]
pub struct RawFrame {
    pub width: u32,
    pub height: u32,
    pub y_plane: Vec<u8>,
    pub u_plane: Vec<u8>,
    pub v_plane: Vec<u8>,
}

impl RawFrame {
    pub fn to_rgba(&self) -> Result<Frame, VisionError> {
        if self.width == 0 || self.height == 0 {
            return Err(VisionError::EmptyFrame);
        }
        let luma_len = self.width as usize * self.height as usize;
        let chroma_w = ((self.width + 1) / 2) as usize;
        let chroma_len = chroma_w * ((self.height + 1) / 2) as usize;
        for (plane, actual, expected) in [
            ("y", self.y_plane.len(), luma_len),
            ("u", self.u_plane.len(), chroma_len),
            ("v", self.v_plane.len(), chroma_len),
        ] {
            if actual < expected {
                return Err(VisionError::PlaneSize {
                    plane,
                    expected,
                    actual,
                });
            }
        }

        let mut rgba_data = vec![0u8; luma_len * 4];

        for y in 0..self.height as usize {
            for x in 0..self.width as usize {
                let y_idx = y * self.width as usize + x;
                let uv_idx = (y / 2) * chroma_w + x / 2;

                let y_val = self.y_plane[y_idx] as f32;
                let u_val = self.u_plane[uv_idx] as f32 - 128.0;
                let v_val = self.v_plane[uv_idx] as f32 - 128.0;

                let r = (y_val + 1.402 * v_val).clamp(0.0, 255.0) as u8;
                let g = (y_val - 0.344136 * u_val - 0.714136 * v_val).clamp(0.0, 255.0) as u8;
                let b = (y_val + 1.772 * u_val).clamp(0.0, 255.0) as u8;

                let rgba_idx = y_idx * 4;
                rgba_data[rgba_idx] = r;
                rgba_data[rgba_idx + 1] = g;
                rgba_data[rgba_idx + 2] = b;
                rgba_data[rgba_idx + 3] = 255;
            }
        }

        Frame::new(self.width, self.height, rgba_data)
    }
}
