//! Optional voice input — record a question, upload it for transcription.
//!
//! Voice input is a feature-detected capability: [`VoiceRecorder::detect`]
//! returns `None` when no microphone exists, and the dashboard simply does
//! not show the microphone button.  There is no local recognizer; the
//! recording is resampled to 16 kHz mono, WAV-encoded, and sent to the
//! gateway's transcription operation.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use crate::audio::{resample, CaptureError, MicCapture, MicStreamHandle, SampleSink};
use crate::config::AudioConfig;

/// Upload rate for voice recordings (Hz).
pub const UPLOAD_SAMPLE_RATE: u32 = 16_000;

// ---------------------------------------------------------------------------
// VoiceRecorder
// ---------------------------------------------------------------------------

/// Push-to-talk style recorder over the default microphone.
///
/// Exactly one recording can be active; `start` while recording is a
/// no-op.  Samples accumulate in a shared buffer the cpal callback feeds.
pub struct VoiceRecorder {
    capture: MicCapture,
    sink: SampleSink,
    handle: Option<MicStreamHandle>,
    started: Option<Instant>,
    min_secs: f32,
    max_secs: f32,
}

impl VoiceRecorder {
    /// Feature detection: `Some` when a default input device exists.
    pub fn detect(config: &AudioConfig) -> Option<Self> {
        match MicCapture::new() {
            Ok(capture) => Some(Self {
                capture,
                sink: Arc::new(Mutex::new(Vec::new())),
                handle: None,
                started: None,
                min_secs: config.min_recording_secs,
                max_secs: config.max_recording_secs,
            }),
            Err(e) => {
                log::info!("voice input unavailable: {e}");
                None
            }
        }
    }

    pub fn is_recording(&self) -> bool {
        self.handle.is_some()
    }

    /// Seconds since recording started, `0.0` when idle.
    pub fn elapsed_secs(&self) -> f32 {
        self.started
            .map(|t| t.elapsed().as_secs_f32())
            .unwrap_or(0.0)
    }

    /// `true` once the recording has exceeded the configured maximum and
    /// should be stopped automatically.
    pub fn overrun(&self) -> bool {
        self.is_recording() && self.elapsed_secs() > self.max_secs
    }

    /// Begin recording.  No-op when already recording.
    pub fn start(&mut self) -> Result<(), CaptureError> {
        if self.handle.is_some() {
            return Ok(());
        }
        if let Ok(mut buffer) = self.sink.lock() {
            buffer.clear();
        }
        self.handle = Some(self.capture.start(Arc::clone(&self.sink))?);
        self.started = Some(Instant::now());
        Ok(())
    }

    /// Stop recording and return the samples resampled to 16 kHz mono.
    ///
    /// Returns `None` when nothing was recording or the take is shorter
    /// than the configured minimum (accidental taps produce no upload).
    pub fn stop(&mut self) -> Option<Vec<f32>> {
        let handle = self.handle.take()?;
        drop(handle); // stops the cpal stream
        self.started = None;

        let samples = match self.sink.lock() {
            Ok(mut buffer) => std::mem::take(&mut *buffer),
            Err(_) => return None,
        };

        let native_rate = self.capture.sample_rate();
        let min_samples = (self.min_secs * native_rate as f32) as usize;
        if samples.len() < min_samples {
            log::info!(
                "voice recording too short ({} samples, need {min_samples})",
                samples.len()
            );
            return None;
        }

        Some(resample(&samples, native_rate, UPLOAD_SAMPLE_RATE))
    }
}

// ---------------------------------------------------------------------------
// WAV encoding
// ---------------------------------------------------------------------------

/// Encode mono `f32` samples as a 16-bit PCM WAV file.
///
/// Samples are clamped to `[-1.0, 1.0]` before quantization.
pub fn encode_wav_pcm16(samples: &[f32], sample_rate: u32) -> Vec<u8> {
    let data_len = (samples.len() * 2) as u32;
    let byte_rate = sample_rate * 2; // mono, 16-bit
    let mut wav = Vec::with_capacity(44 + data_len as usize);

    // RIFF chunk
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_len).to_le_bytes());
    wav.extend_from_slice(b"WAVE");

    // fmt chunk: PCM, mono, 16-bit
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // audio format: PCM
    wav.extend_from_slice(&1u16.to_le_bytes()); // channels
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&2u16.to_le_bytes()); // block align
    wav.extend_from_slice(&16u16.to_le_bytes()); // bits per sample

    // data chunk
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_len.to_le_bytes());
    for &sample in samples {
        let quantized = (sample.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16;
        wav.extend_from_slice(&quantized.to_le_bytes());
    }

    wav
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wav_header_layout() {
        let wav = encode_wav_pcm16(&[0.0; 160], UPLOAD_SAMPLE_RATE);

        assert_eq!(wav.len(), 44 + 320);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(&wav[12..16], b"fmt ");
        assert_eq!(&wav[36..40], b"data");

        // Declared sizes match the payload.
        let riff_len = u32::from_le_bytes(wav[4..8].try_into().unwrap());
        assert_eq!(riff_len, 36 + 320);
        let data_len = u32::from_le_bytes(wav[40..44].try_into().unwrap());
        assert_eq!(data_len, 320);

        // Mono, 16-bit, 16 kHz.
        assert_eq!(u16::from_le_bytes(wav[22..24].try_into().unwrap()), 1);
        assert_eq!(
            u32::from_le_bytes(wav[24..28].try_into().unwrap()),
            UPLOAD_SAMPLE_RATE
        );
        assert_eq!(u16::from_le_bytes(wav[34..36].try_into().unwrap()), 16);
    }

    #[test]
    fn samples_are_clamped_before_quantization() {
        let wav = encode_wav_pcm16(&[2.0, -2.0], 16_000);
        let first = i16::from_le_bytes(wav[44..46].try_into().unwrap());
        let second = i16::from_le_bytes(wav[46..48].try_into().unwrap());
        assert_eq!(first, i16::MAX);
        assert_eq!(second, -i16::MAX);
    }

    #[test]
    fn empty_recording_encodes_header_only() {
        let wav = encode_wav_pcm16(&[], 16_000);
        assert_eq!(wav.len(), 44);
        let data_len = u32::from_le_bytes(wav[40..44].try_into().unwrap());
        assert_eq!(data_len, 0);
    }
}
