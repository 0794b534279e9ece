use super::frame::Frame;
use sha2::{Digest, Sha256};

/// Side length of the grayscale thumbnail the digest is computed over.
pub const SIGNATURE_SIDE: u32 = 32;

/// Near-duplicate fingerprint of a frame.
///
/// `Unavailable` never matches anything, including itself, so a frame that
/// could not be fingerprinted always misses the cache.
#[derive(Debug, Clone, Copy)]
pub enum Signature {
    Digest([u8; 32]),
    Unavailable,
}

impl Signature {
    pub fn matches(&self, other: &Signature) -> bool {
        match (self, other) {
            (Signature::Digest(a), Signature::Digest(b)) => a == b,
            _ => false,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Signature::Digest(_))
    }
}

pub struct NearDuplicateFilter {
    sample_size: (u32, u32),
}

impl NearDuplicateFilter {
    pub fn new() -> Self {
        Self {
            sample_size: (SIGNATURE_SIDE, SIGNATURE_SIDE),
        }
    }

    /// SHA-256 over the block-averaged intensity thumbnail.
    pub fn signature(&self, frame: &Frame) -> Signature {
        if !frame.is_well_formed() {
            return Signature::Unavailable;
        }

        let thumbnail = Self::downsample_luma(frame, self.sample_size.0, self.sample_size.1);
        let digest: [u8; 32] = Sha256::digest(&thumbnail).into();
        Signature::Digest(digest)
    }

    /// Averages luma blocks into a `target_w`x`target_h` buffer.
    /// Frames smaller than the target repeat source pixels.
    fn downsample_luma(frame: &Frame, target_w: u32, target_h: u32) -> Vec<u8> {
        let luma = frame.to_luma();
        let w = frame.width as usize;
        let h = frame.height as usize;
        let tw = target_w as usize;
        let th = target_h as usize;

        let mut result = Vec::with_capacity(tw * th);

        for by in 0..th {
            let y_start = by * h / th;
            let y_end = ((by + 1) * h / th).max(y_start + 1).min(h);

            for bx in 0..tw {
                let x_start = bx * w / tw;
                let x_end = ((bx + 1) * w / tw).max(x_start + 1).min(w);

                let mut block_sum = 0u32;
                let mut count = 0u32;

                for py in y_start..y_end {
                    let row_offset = py * w;
                    for px in x_start..x_end {
                        block_sum += luma[row_offset + px] as u32;
                        count += 1;
                    }
                }

                let avg = if count > 0 { (block_sum / count) as u8 } else { 0 };
                result.push(avg);
            }
        }

        result
    }
}

impl Default for NearDuplicateFilter {
    fn default() -> Self {
        Self::new()
    }
}
