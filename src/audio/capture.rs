//! Microphone capture via `cpal`, used for voice questions.
//!
//! [`MicCapture`] wraps the cpal host/device/stream lifecycle.  The stream
//! callback downmixes to mono on the audio thread and appends directly
//! into a shared sample buffer; the recorder drains that buffer when the
//! user releases the microphone button.  The returned [`MicStreamHandle`]
//! is a RAII guard — dropping it stops the underlying cpal stream.

use std::sync::{Arc, Mutex};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use thiserror::Error;

use super::resample::downmix_mono;

/// Shared accumulation buffer the capture callback appends into.
pub type SampleSink = Arc<Mutex<Vec<f32>>>;

// ---------------------------------------------------------------------------
// CaptureError
// ---------------------------------------------------------------------------

/// Errors that can occur while setting up or running microphone capture.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no input device found on the default audio host")]
    NoDevice,

    #[error("failed to query default input config: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build input stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start audio stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
}

// ---------------------------------------------------------------------------
// MicStreamHandle
// ---------------------------------------------------------------------------

/// RAII guard that keeps the cpal stream alive.
///
/// Dropping this value stops the underlying hardware stream.
pub struct MicStreamHandle {
    _stream: cpal::Stream,
}

// ---------------------------------------------------------------------------
// MicCapture
// ---------------------------------------------------------------------------

/// Microphone wrapper for the voice-question recorder.
pub struct MicCapture {
    device: cpal::Device,
    config: cpal::StreamConfig,
    /// Native sample rate reported by the device (Hz).
    sample_rate: u32,
    /// Number of interleaved channels reported by the device.
    channels: u16,
}

impl MicCapture {
    /// Open the system default input device.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::NoDevice`] when no input device is
    /// available — the caller then simply hides the voice-input control.
    pub fn new() -> Result<Self, CaptureError> {
        let host = cpal::default_host();
        let device = host.default_input_device().ok_or(CaptureError::NoDevice)?;

        let supported = device.default_input_config()?;
        let channels = supported.channels();
        let sample_rate = supported.sample_rate().0;
        let config: cpal::StreamConfig = supported.into();

        Ok(Self {
            device,
            config,
            sample_rate,
            channels,
        })
    }

    /// Native sample rate of the capture stream in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Start recording into `sink`.
    ///
    /// The cpal callback runs on a dedicated audio thread; each hardware
    /// buffer is downmixed to mono and appended under a brief lock.  Lock
    /// poisoning is ignored so the audio thread never panics.
    pub fn start(&self, sink: SampleSink) -> Result<MicStreamHandle, CaptureError> {
        let channels = self.channels;

        let stream = self.device.build_input_stream(
            &self.config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                let mono = downmix_mono(data, channels);
                if let Ok(mut buffer) = sink.lock() {
                    buffer.extend_from_slice(&mono);
                }
            },
            |err: cpal::StreamError| {
                log::error!("cpal stream error: {err}");
            },
            None, // no timeout
        )?;

        stream.play()?;
        Ok(MicStreamHandle { _stream: stream })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// The shared sink must be cloneable and cross-thread safe.
    #[test]
    fn sample_sink_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SampleSink>();
    }

    #[test]
    fn capture_error_messages_are_descriptive() {
        let err = CaptureError::NoDevice;
        assert!(err.to_string().contains("input device"));
    }
}
