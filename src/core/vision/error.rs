use thiserror::Error;

#[derive(Debug, Error)]
pub enum VisionError {
    #[error("frame buffer holds {actual} bytes, expected {expected} for {width}x{height} RGBA")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("frame has zero area")]
    EmptyFrame,
    #[error("YUV plane `{plane}` holds {actual} bytes, expected at least {expected}")]
    PlaneSize {
        plane: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("hand reported present but no landmarks were returned")]
    MissingLandmarks,
    #[error("expected 21 landmarks, got {0}")]
    LandmarkCount(usize),
    #[error("landmark {0} has a non-finite coordinate")]
    NonFiniteLandmark(usize),
    #[error("hand localizer failed: {0}")]
    Localizer(String),
    #[error("classifier failed: {0}")]
    Classifier(String),
}
