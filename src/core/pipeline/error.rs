use super::config::ConfigError;
use super::payload::PayloadError;
use super::verdict::Verdict;
use crate::core::vision::VisionError;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("vision error: {0}")]
    Vision(#[from] VisionError),

    #[error("payload error: {0}")]
    Payload(#[from] PayloadError),

    #[error("inference did not finish within {0:?}")]
    InferenceTimeout(Duration),

    #[error("inference backlog full with {0} jobs in flight")]
    Backlogged(usize),

    #[error("inference abandoned after its caller timed out")]
    Abandoned,

    #[error("inference worker stopped before answering")]
    WorkerLost,

    #[error("failed to start inference pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl PipelineError {
    /// Request-level rendering; every failure becomes a well-formed verdict.
    pub fn to_verdict(&self) -> Verdict {
        match self {
            PipelineError::Vision(
                VisionError::MissingLandmarks
                | VisionError::LandmarkCount(_)
                | VisionError::NonFiniteLandmark(_),
            ) => Verdict::invalid_landmarks(true),
            PipelineError::Vision(e) => Verdict::recognition_error(e),
            PipelineError::Payload(e) => Verdict::transport_error(e.code(), e.to_string()),
            PipelineError::InferenceTimeout(timeout) => Verdict::inference_timeout(timeout.as_millis()),
            PipelineError::Backlogged(in_flight) => Verdict::inference_backlog(*in_flight),
            PipelineError::Config(_)
            | PipelineError::Abandoned
            | PipelineError::WorkerLost
            | PipelineError::ThreadPool(_) => Verdict::internal_error(self),
        }
    }
}
