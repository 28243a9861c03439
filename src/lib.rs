//! Gram Sahayak — a citizen-facing MGNREGA district dashboard with an AI
//! guide: data Q&A, plain-language explanations, letter drafting, speech
//! playback, voice input and trend forecasting.
//!
//! # Architecture
//!
//! ```text
//! egui frame loop (app)
//!   ├─ DistrictDataService ── static dataset
//!   ├─ Conversation per chat surface (streaming aggregator)
//!   ├─ AudioPlaybackEngine ── rodio output
//!   └─ mpsc commands ──▶ assistant orchestrator (tokio)
//!                          └─ AiGateway (Gemini REST) ──▶ mpsc events
//! ```

pub mod ai;
pub mod app;
pub mod assistant;
pub mod audio;
pub mod config;
pub mod data;
pub mod i18n;
pub mod location;
pub mod speech;
