//! Audio output port and the `rodio` speaker implementation.
//!
//! The playback engine talks to the speaker through the [`AudioOutput`]
//! trait so its state machine can be tested against a fake.  The real
//! implementation owns the process-wide output device: starting a new
//! clip synchronously releases whatever was playing before.

use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;

// ---------------------------------------------------------------------------
// AudioClip
// ---------------------------------------------------------------------------

/// A decoded mono speech clip.
///
/// Samples are `f32` in `[-1.0, 1.0]`.  Cheap to clone — the sample data
/// is shared behind an `Arc`.
#[derive(Debug, Clone)]
pub struct AudioClip {
    samples: Arc<Vec<f32>>,
    sample_rate: u32,
}

impl AudioClip {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples: Arc::new(samples),
            sample_rate,
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Total playback length.
    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.samples.len() as f64 / self.sample_rate as f64)
    }
}

// ---------------------------------------------------------------------------
// PlaybackError
// ---------------------------------------------------------------------------

/// Errors from the speaker device.
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("no audio output device available")]
    NoDevice,

    #[error("failed to open audio output: {0}")]
    Stream(String),
}

// ---------------------------------------------------------------------------
// AudioOutput
// ---------------------------------------------------------------------------

/// Port to the speaker device.
///
/// Implementations must guarantee at most one active source: `play`
/// releases any prior source before starting the new one.
pub trait AudioOutput {
    /// Start playing `clip` from `offset`.  Replaces any current source.
    fn play(&mut self, clip: &AudioClip, offset: Duration) -> Result<(), PlaybackError>;

    /// Stop output and return the playback position reached (including the
    /// offset the clip was started from), clamped to the clip length.
    fn pause(&mut self) -> Duration;

    /// Stop output and discard position.  Must be safe in every state.
    fn stop(&mut self);

    /// `true` when no source is playing (idle or natural end).
    fn finished(&self) -> bool;
}

// ---------------------------------------------------------------------------
// RodioOutput
// ---------------------------------------------------------------------------

/// Speaker output backed by a `rodio` sink.
///
/// The `OutputStream` must stay alive for audio to keep flowing, so it is
/// held for the lifetime of this struct.  A fresh `Sink` is created per
/// `play` call; the old one is stopped first.
pub struct RodioOutput {
    _stream: rodio::OutputStream,
    handle: rodio::OutputStreamHandle,
    sink: Option<rodio::Sink>,
    /// Offset the current source was started from.
    base_offset: Duration,
    /// Wall-clock start of the current source.
    started: Option<Instant>,
    /// Length of the clip currently loaded, for position clamping.
    clip_duration: Duration,
}

impl RodioOutput {
    /// Open the default output device.
    pub fn new() -> Result<Self, PlaybackError> {
        let (stream, handle) = rodio::OutputStream::try_default()
            .map_err(|e| PlaybackError::Stream(e.to_string()))?;

        Ok(Self {
            _stream: stream,
            handle,
            sink: None,
            base_offset: Duration::ZERO,
            started: None,
            clip_duration: Duration::ZERO,
        })
    }

    /// Current position within the clip, clamped to its length.
    fn position(&self) -> Duration {
        let elapsed = self
            .started
            .map(|t| t.elapsed())
            .unwrap_or(Duration::ZERO);
        (self.base_offset + elapsed).min(self.clip_duration)
    }
}

impl AudioOutput for RodioOutput {
    fn play(&mut self, clip: &AudioClip, offset: Duration) -> Result<(), PlaybackError> {
        // Release the device before starting the new source.
        self.stop();

        let sink = rodio::Sink::try_new(&self.handle)
            .map_err(|e| PlaybackError::Stream(e.to_string()))?;

        let source = rodio::buffer::SamplesBuffer::new(
            1,
            clip.sample_rate(),
            clip.samples().to_vec(),
        );
        // Seeking is a skip from the front of the buffered samples.
        let source = rodio::Source::skip_duration(source, offset);
        sink.append(source);

        self.sink = Some(sink);
        self.base_offset = offset;
        self.started = Some(Instant::now());
        self.clip_duration = clip.duration();
        Ok(())
    }

    fn pause(&mut self) -> Duration {
        let position = self.position();
        self.stop();
        position
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.started = None;
        self.base_offset = Duration::ZERO;
    }

    fn finished(&self) -> bool {
        self.sink.as_ref().map_or(true, |sink| sink.empty())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_duration_math() {
        let clip = AudioClip::new(vec![0.0; 12_000], 24_000);
        assert_eq!(clip.duration(), Duration::from_millis(500));
    }

    #[test]
    fn zero_rate_clip_has_zero_duration() {
        let clip = AudioClip::new(vec![0.0; 100], 0);
        assert_eq!(clip.duration(), Duration::ZERO);
    }

    #[test]
    fn clip_clone_shares_samples() {
        let clip = AudioClip::new(vec![0.25; 8], 24_000);
        let copy = clip.clone();
        assert!(std::ptr::eq(clip.samples().as_ptr(), copy.samples().as_ptr()));
    }
}
