//! Request body to [`Frame`] decoding.

use super::verdict::ErrorCode;
use crate::core::vision::{Frame, VisionError};
use base64::{engine::general_purpose, Engine as _};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

static MEDIA_PREFIX: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^data:[^;,]*(?:;[^,]*)?,").ok());

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("no data received")]
    NoData,
    #[error("no image provided")]
    NoImage,
    #[error("request body is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("image is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("image could not be decoded: {0}")]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Frame(#[from] VisionError),
}

impl PayloadError {
    pub fn code(&self) -> ErrorCode {
        match self {
            PayloadError::NoData | PayloadError::Json(_) => ErrorCode::NoData,
            PayloadError::NoImage => ErrorCode::NoImage,
            PayloadError::Base64(_) | PayloadError::Image(_) | PayloadError::Frame(_) => {
                ErrorCode::ImageProcessingFailed
            }
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FrameRequest {
    pub image: Option<String>,
}

pub fn parse_request(body: Option<&str>) -> Result<FrameRequest, PayloadError> {
    let body = body.map(str::trim).filter(|b| !b.is_empty()).ok_or(PayloadError::NoData)?;
    let value: serde_json::Value = serde_json::from_str(body)?;
    if !value.as_object().map_or(false, |map| !map.is_empty()) {
        return Err(PayloadError::NoData);
    }
    Ok(serde_json::from_value(value)?)
}

/// Drops a leading `data:<media-type>[;params],` marker if present.
pub fn strip_media_prefix(encoded: &str) -> &str {
    match MEDIA_PREFIX.as_ref().and_then(|re| re.find(encoded)) {
        Some(prefix) => &encoded[prefix.end()..],
        None => encoded,
    }
}

/// Decodes a base64 still image and bounds it to `max_size`.
pub fn decode_image(encoded: &str, max_size: (u32, u32)) -> Result<Frame, PayloadError> {
    let payload = strip_media_prefix(encoded.trim());
    let bytes = general_purpose::STANDARD.decode(payload.trim())?;
    let image = image::load_from_memory(&bytes)?;
    Ok(Frame::from_dynamic(image).fit_within(max_size.0, max_size.1)?)
}

/// Full body handling: JSON envelope, image presence, decoding.
pub fn decode_request(body: Option<&str>, max_size: (u32, u32)) -> Result<Frame, PayloadError> {
    let request = parse_request(body)?;
    let image = request
        .image
        .as_deref()
        .filter(|img| !img.trim().is_empty())
        .ok_or(PayloadError::NoImage)?;
    decode_image(image, max_size)
}
