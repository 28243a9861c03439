//! Audio subsystem — speech playback and microphone capture.
//!
//! # Playback path
//!
//! ```text
//! AiGateway::synthesize_speech → PCM bytes → pcm16_to_clip → AudioClip
//!     → AudioPlaybackEngine (state machine) → AudioOutput (rodio sink)
//! ```
//!
//! # Voice-input path
//!
//! ```text
//! MicCapture (cpal callback, downmix) → sample sink → resample to 16 kHz
//!     → WAV encode → AiGateway::transcribe
//! ```

pub mod capture;
pub mod decode;
pub mod output;
pub mod playback;
pub mod resample;

pub use capture::{CaptureError, MicCapture, MicStreamHandle, SampleSink};
pub use decode::pcm16_to_clip;
pub use output::{AudioClip, AudioOutput, PlaybackError, RodioOutput};
pub use playback::{AudioPlaybackEngine, PlaybackState, SynthesisRequest};
pub use resample::{downmix_mono, resample};
