//! Learner / instructor polling exchange

use super::endpoints::{self, WireResponse};
use crate::core::exchange::ExchangeState;
use flutter_rust_bridge::frb;
use log::info;
use std::sync::Arc;

/// Shared between the recognizer (learner side) and the instructor UI.
///
/// ```dart
/// final exchange = SignExchange.create();
/// final poll = exchange.latestGesture;
/// exchange.sendReply(body: jsonEncode({"letter": "B"}));
/// ```
#[frb(opaque)]
pub struct SignExchange {
    state: Arc<ExchangeState>,
}

impl SignExchange {
    #[frb(sync)]
    pub fn create() -> Self {
        info!("🔁 SignExchange: created");
        Self {
            state: Arc::new(ExchangeState::new()),
        }
    }

    #[frb(sync, getter)]
    pub fn latest_gesture(&self) -> WireResponse {
        endpoints::latest_gesture(&self.state)
    }

    #[frb(sync)]
    pub fn send_reply(&self, body: String) -> WireResponse {
        endpoints::send_reply(&self.state, Some(&body))
    }

    #[frb(sync, getter)]
    pub fn latest_reply(&self) -> WireResponse {
        endpoints::latest_reply(&self.state)
    }

    #[frb(sync)]
    pub fn clear(&self) {
        self.state.clear()
    }

    #[frb(ignore)]
    pub fn state(&self) -> Arc<ExchangeState> {
        Arc::clone(&self.state)
    }
}

impl Drop for SignExchange {
    fn drop(&mut self) {
        info!("🗑️ SignExchange: released");
    }
}
