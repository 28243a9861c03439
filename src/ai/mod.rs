//! Generative-AI gateway module.
//!
//! This module provides:
//! * [`AiGateway`] — async trait implemented by all gateway backends.
//! * [`GeminiGateway`] — Generative Language REST implementation.
//! * [`DisabledGateway`] — fail-fast stub used when no API key exists.
//! * [`TextStream`] — cancellable lazy fragment sequence for streaming.
//! * [`PromptBuilder`] / [`GrievanceDetails`] — bilingual feature prompts.
//! * [`Forecast`] / [`ForecastRow`] — structured trend forecasting.
//! * [`AiError`] — error variants for gateway operations.

pub mod forecast;
pub mod gateway;
pub mod gemini;
pub mod prompts;
pub mod stream;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use forecast::{fetch_forecast, forecast_schema, next_year, Forecast, ForecastRow};
pub use gateway::{AiError, AiGateway, DisabledGateway};
pub use gemini::GeminiGateway;
pub use prompts::{GrievanceDetails, PromptBuilder};
pub use stream::TextStream;

use std::sync::Arc;

use crate::config::AiConfig;

/// Build the gateway from config: the REST client when a key can be
/// resolved, otherwise the fail-fast disabled stub.
pub fn build_gateway(config: &AiConfig) -> Arc<dyn AiGateway> {
    if !config.enabled {
        log::info!("AI features disabled in settings");
        return Arc::new(DisabledGateway);
    }
    match config.resolve_api_key() {
        Some(key) => Arc::new(GeminiGateway::new(config, key)),
        None => {
            log::warn!("no API key configured; AI features disabled");
            Arc::new(DisabledGateway)
        }
    }
}
