//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::i18n::Language;

use super::AppPaths;

// ---------------------------------------------------------------------------
// AiConfig
// ---------------------------------------------------------------------------

/// Settings for the generative-AI gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// Whether AI features are active at all.  Even when `true` the gateway
    /// degrades to a disabled stub if no API key can be resolved.
    pub enabled: bool,
    /// Base URL of the Generative Language REST endpoint.
    pub base_url: String,
    /// API key — `None` means fall back to the `GEMINI_API_KEY` environment
    /// variable.
    pub api_key: Option<String>,
    /// Text model identifier (completion, streaming, structured output).
    pub model: String,
    /// Speech-synthesis model identifier.
    pub tts_model: String,
    /// Prebuilt TTS voice name.
    pub tts_voice: String,
    /// Sampling temperature (0.0 – 1.0).  Lower = more deterministic.
    pub temperature: f32,
    /// Maximum seconds to wait for a gateway response before timing out.
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://generativelanguage.googleapis.com".into(),
            api_key: None,
            model: "gemini-2.5-flash".into(),
            tts_model: "gemini-2.5-flash-preview-tts".into(),
            tts_voice: "Kore".into(),
            temperature: 0.4,
            timeout_secs: 30,
        }
    }
}

impl AiConfig {
    /// Effective API key: the configured value when non-empty, otherwise
    /// the `GEMINI_API_KEY` environment variable when non-empty.
    pub fn resolve_api_key(&self) -> Option<String> {
        if let Some(key) = self.api_key.as_deref() {
            if !key.is_empty() {
                return Some(key.to_string());
            }
        }
        std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
    }
}

// ---------------------------------------------------------------------------
// UiConfig
// ---------------------------------------------------------------------------

/// Dashboard window and language settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Interface and AI output language.
    pub language: Language,
    /// Last saved window position `(x, y)` in screen pixels.  `None` means
    /// let the OS / window manager pick a position on first launch.
    pub window_position: Option<(f32, f32)>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            language: Language::default(),
            window_position: None,
        }
    }
}

// ---------------------------------------------------------------------------
// AudioConfig
// ---------------------------------------------------------------------------

/// Settings for speech playback and voice-input capture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Sample rate of synthesized speech payloads in Hz (fixed by the TTS
    /// model; 24 000 for the current voices).
    pub playback_sample_rate: u32,
    /// Minimum voice-input recording length in seconds before a
    /// transcription is attempted.
    pub min_recording_secs: f32,
    /// Maximum voice-input recording length in seconds; recording stops
    /// automatically.
    pub max_recording_secs: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            playback_sample_rate: 24_000,
            min_recording_secs: 0.5,
            max_recording_secs: 30.0,
        }
    }
}

// ---------------------------------------------------------------------------
// LocationConfig
// ---------------------------------------------------------------------------

/// Optional home coordinates used once at startup to pick the initial
/// district.  Both fields must be present for the lookup to run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationConfig {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use gram_sahayak::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Generative-AI gateway settings.
    pub ai: AiConfig,
    /// Window and language settings.
    pub ui: UiConfig,
    /// Speech playback / capture settings.
    pub audio: AudioConfig,
    /// Optional home coordinates.
    pub location: LocationConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
