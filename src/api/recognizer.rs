//! Letter recognizer handle

use super::endpoints::{self, WireResponse};
use super::exchange::SignExchange;
use crate::core::pipeline::{Backends, FrameRecognizer, PipelineError, RecognizerConfig};
use crate::core::vision::RawFrame;
use flutter_rust_bridge::frb;
use log::info;

/// Frame-by-frame letter recognizer.
///
/// ```dart
/// final verdict = recognizer.classify(body: jsonEncode({"image": b64}));
/// final live = await recognizer.recognizeCameraFrame(frame: yuv);
/// final stats = recognizer.status;
/// ```
#[frb(opaque)]
pub struct SignRecognizer {
    inner: FrameRecognizer,
}

impl SignRecognizer {
    /// Native hosts inject their detector and classifier backends here.
    #[frb(ignore)]
    pub fn new(config: RecognizerConfig, backends: Backends, exchange: &SignExchange) -> Result<Self, PipelineError> {
        crate::init_logging();
        info!("🤟 SignRecognizer: creating (skip_rate={})", config.frame_skip_rate);
        Ok(Self {
            inner: FrameRecognizer::new(config, backends, exchange.state())?,
        })
    }

    /// Same as [`SignRecognizer::new`] with knobs read from the environment.
    #[frb(ignore)]
    pub fn from_env(backends: Backends, exchange: &SignExchange) -> Result<Self, PipelineError> {
        Self::new(RecognizerConfig::from_env()?, backends, exchange)
    }

    #[frb(sync)]
    pub fn classify(&self, body: String) -> WireResponse {
        endpoints::classify(&self.inner, Some(&body))
    }

    #[frb(sync)]
    pub fn classify_once(&self, body: String) -> WireResponse {
        endpoints::classify_once(&self.inner, Some(&body))
    }

    /// Camera-native YUV420 input.
    #[frb]
    pub fn recognize_camera_frame(&self, frame: RawFrame) -> WireResponse {
        WireResponse::verdict(&self.inner.recognize_raw(&frame))
    }

    #[frb(sync, getter)]
    pub fn labels(&self) -> WireResponse {
        endpoints::labels(&self.inner)
    }

    #[frb(sync, getter)]
    pub fn status(&self) -> WireResponse {
        endpoints::status(&self.inner)
    }

    #[frb(sync, getter)]
    pub fn is_available(&self) -> bool {
        self.inner.is_available()
    }

    #[frb(sync)]
    pub fn reset(&self) {
        self.inner.reset()
    }

    #[frb(ignore)]
    pub fn recognizer(&self) -> &FrameRecognizer {
        &self.inner
    }
}

impl Drop for SignRecognizer {
    fn drop(&mut self) {
        info!("🗑️ SignRecognizer: released");
    }
}
