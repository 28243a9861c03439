//! Speech playback engine — play / pause / resume / replay state machine.
//!
//! At most one clip plays at a time across the whole application.  The
//! engine caches the single most recently synthesized clip so replaying
//! the same text never refetches; requesting different text discards it.
//!
//! The state machine transitions are:
//!
//! ```text
//! Stopped ──toggle(text), cache miss──▶ Loading
//! Stopped ──toggle(text), cache hit───▶ Playing        (from offset 0)
//! Loading ──synthesis ok──────────────▶ Playing        (clip cached)
//! Loading ──synthesis failed──────────▶ Stopped
//! Playing ──toggle(same text)─────────▶ Paused         (offset recorded)
//! Paused  ──toggle(same text)─────────▶ Playing        (resume at offset)
//! Playing | Paused ──toggle(other)────▶ Loading|Playing (old clip dropped)
//! Playing ──natural end───────────────▶ Stopped        (clip retained)
//! any state ──stop()──────────────────▶ Stopped
//! ```
//!
//! Synthesis is asynchronous and owned by the caller: [`toggle`] returns a
//! [`SynthesisRequest`] when audio must be fetched, and the result comes
//! back through [`on_synthesis`].  Every request carries a sequence
//! number; a stale request completing after `stop()` or after a newer
//! request is discarded and cannot resurrect playback.
//!
//! [`toggle`]: AudioPlaybackEngine::toggle
//! [`on_synthesis`]: AudioPlaybackEngine::on_synthesis

use std::time::Duration;

use super::output::{AudioClip, AudioOutput};

// ---------------------------------------------------------------------------
// PlaybackState
// ---------------------------------------------------------------------------

/// States of the speech playback engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// Nothing is playing.  A cached clip may still exist for replay.
    Stopped,
    /// Synthesis is in flight for the session's text.
    Loading,
    /// The session's clip is playing.
    Playing,
    /// Playback is paused; the resume offset is recorded.
    Paused,
}

impl Default for PlaybackState {
    fn default() -> Self {
        PlaybackState::Stopped
    }
}

// ---------------------------------------------------------------------------
// PlaybackSession / SynthesisRequest
// ---------------------------------------------------------------------------

/// The single live playback session.
///
/// Invariant: `clip` is present whenever `state` is `Playing` or `Paused`;
/// `elapsed_offset` is meaningful only when `state` is `Paused`.
#[derive(Default)]
struct PlaybackSession {
    text: String,
    clip: Option<AudioClip>,
    state: PlaybackState,
    elapsed_offset: Duration,
}

/// A synthesis fetch the caller must perform.  Feed the outcome back via
/// [`AudioPlaybackEngine::on_synthesis`] with the same `seq`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisRequest {
    pub seq: u64,
    pub text: String,
}

// ---------------------------------------------------------------------------
// AudioPlaybackEngine
// ---------------------------------------------------------------------------

/// Play/pause/resume/replay controller over an [`AudioOutput`] port.
pub struct AudioPlaybackEngine<O: AudioOutput> {
    output: O,
    session: PlaybackSession,
    /// Monotonic request counter.  Bumped by every new fetch and by
    /// `stop()`, which is what invalidates stale in-flight synthesis.
    seq: u64,
}

impl<O: AudioOutput> AudioPlaybackEngine<O> {
    pub fn new(output: O) -> Self {
        Self {
            output,
            session: PlaybackSession::default(),
            seq: 0,
        }
    }

    /// Engine state for the current session.
    pub fn state(&self) -> PlaybackState {
        self.session.state
    }

    /// State as seen by a control bound to `text`: the session state when
    /// the session is for that text, `Stopped` otherwise.  Lets several
    /// speaker buttons share one engine without cross-talk.
    pub fn state_for(&self, text: &str) -> PlaybackState {
        if self.session.text == text {
            self.session.state
        } else {
            PlaybackState::Stopped
        }
    }

    /// Single entry point for every speaker control.
    ///
    /// Returns `Some(request)` when the caller must synthesize audio; the
    /// engine is then `Loading` until [`on_synthesis`] delivers the
    /// outcome.  Rapid repeated calls with identical text while loading
    /// are no-ops, so one control can never start two fetches.
    ///
    /// [`on_synthesis`]: Self::on_synthesis
    pub fn toggle(&mut self, text: &str) -> Option<SynthesisRequest> {
        let same_text = self.session.text == text;

        match self.session.state {
            PlaybackState::Playing if same_text => {
                self.session.elapsed_offset = self.output.pause();
                self.session.state = PlaybackState::Paused;
                None
            }

            PlaybackState::Paused if same_text => {
                let offset = self.session.elapsed_offset;
                self.start_playback(offset);
                None
            }

            PlaybackState::Loading if same_text => None,

            // Stopped, or a request for different text from any state.
            _ => {
                // Stopping first releases the device and, for a text
                // switch, makes sure no old source keeps playing.
                self.output.stop();

                if same_text && self.session.clip.is_some() {
                    // Cache hit: replay from the start without refetching.
                    self.start_playback(Duration::ZERO);
                    return None;
                }

                // Cache miss (or different text): retire the old session
                // and fetch.  The old clip is discarded with it.
                self.seq += 1;
                self.session = PlaybackSession {
                    text: text.to_string(),
                    clip: None,
                    state: PlaybackState::Loading,
                    elapsed_offset: Duration::ZERO,
                };
                Some(SynthesisRequest {
                    seq: self.seq,
                    text: text.to_string(),
                })
            }
        }
    }

    /// Deliver the outcome of a [`SynthesisRequest`].
    ///
    /// A result whose `seq` does not match the engine's current counter is
    /// stale — the user stopped playback or asked for different text while
    /// the fetch was in flight — and is discarded without touching state.
    pub fn on_synthesis(&mut self, seq: u64, result: Option<AudioClip>) {
        if seq != self.seq || self.session.state != PlaybackState::Loading {
            log::debug!("discarding stale synthesis result (seq {seq})");
            return;
        }

        match result {
            Some(clip) => {
                self.session.clip = Some(clip);
                self.start_playback(Duration::ZERO);
            }
            None => {
                log::warn!("speech synthesis failed for current session");
                self.session.state = PlaybackState::Stopped;
            }
        }
    }

    /// Advance the Playing → Stopped transition on natural end.  Call once
    /// per frame; the cached clip is retained so the user can replay.
    pub fn poll(&mut self) {
        if self.session.state == PlaybackState::Playing && self.output.finished() {
            self.session.state = PlaybackState::Stopped;
            self.session.elapsed_offset = Duration::ZERO;
        }
    }

    /// Stop playback and invalidate any in-flight synthesis.  Safe to call
    /// in every state; used on surface teardown and context switches.
    pub fn stop(&mut self) {
        self.output.stop();
        self.seq += 1;
        self.session.state = PlaybackState::Stopped;
        self.session.elapsed_offset = Duration::ZERO;
    }

    /// Start (or restart) output for the cached clip at `offset`.
    fn start_playback(&mut self, offset: Duration) {
        let Some(clip) = self.session.clip.clone() else {
            // No clip despite a playable state: treat as failed synthesis.
            self.session.state = PlaybackState::Stopped;
            return;
        };

        match self.output.play(&clip, offset) {
            Ok(()) => self.session.state = PlaybackState::Playing,
            Err(e) => {
                log::warn!("audio output failed: {e}");
                self.session.state = PlaybackState::Stopped;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::output::PlaybackError;

    // -----------------------------------------------------------------------
    // FakeOutput
    // -----------------------------------------------------------------------

    /// Records every port call so transitions can be asserted exactly.
    #[derive(Default)]
    struct FakeOutput {
        /// Position reported by the next `pause()` call.
        position: Duration,
        /// Value reported by `finished()`.
        idle: bool,
        /// `(samples_len, offset)` per play call.
        plays: Vec<(usize, Duration)>,
        stops: usize,
        fail_next_play: bool,
        active: bool,
    }

    impl AudioOutput for FakeOutput {
        fn play(&mut self, clip: &AudioClip, offset: Duration) -> Result<(), PlaybackError> {
            if self.fail_next_play {
                return Err(PlaybackError::NoDevice);
            }
            self.plays.push((clip.samples().len(), offset));
            self.active = true;
            self.idle = false;
            Ok(())
        }

        fn pause(&mut self) -> Duration {
            self.active = false;
            self.position
        }

        fn stop(&mut self) {
            self.stops += 1;
            self.active = false;
        }

        fn finished(&self) -> bool {
            self.idle
        }
    }

    fn clip(len: usize) -> AudioClip {
        AudioClip::new(vec![0.1; len], 24_000)
    }

    fn engine() -> AudioPlaybackEngine<FakeOutput> {
        AudioPlaybackEngine::new(FakeOutput::default())
    }

    // -----------------------------------------------------------------------
    // Fetch and cache behaviour
    // -----------------------------------------------------------------------

    #[test]
    fn first_toggle_requests_synthesis() {
        let mut engine = engine();
        let request = engine.toggle("hello").expect("fetch expected");
        assert_eq!(request.text, "hello");
        assert_eq!(engine.state(), PlaybackState::Loading);
    }

    #[test]
    fn repeated_toggle_while_loading_is_noop() {
        let mut engine = engine();
        let first = engine.toggle("hello");
        assert!(first.is_some());
        // Rapid second click with identical text: no second fetch.
        assert!(engine.toggle("hello").is_none());
        assert_eq!(engine.state(), PlaybackState::Loading);
    }

    #[test]
    fn synthesis_success_starts_playback_from_zero() {
        let mut engine = engine();
        let request = engine.toggle("hello").unwrap();
        engine.on_synthesis(request.seq, Some(clip(240)));

        assert_eq!(engine.state(), PlaybackState::Playing);
        assert_eq!(engine.output.plays, vec![(240, Duration::ZERO)]);
    }

    #[test]
    fn synthesis_failure_returns_to_stopped() {
        let mut engine = engine();
        let request = engine.toggle("hello").unwrap();
        engine.on_synthesis(request.seq, None);

        assert_eq!(engine.state(), PlaybackState::Stopped);
        assert!(engine.output.plays.is_empty());
    }

    #[test]
    fn replay_after_natural_end_hits_cache() {
        let mut engine = engine();
        let request = engine.toggle("hello").unwrap();
        engine.on_synthesis(request.seq, Some(clip(240)));

        engine.output.idle = true;
        engine.poll();
        assert_eq!(engine.state(), PlaybackState::Stopped);

        // Same text again: plays directly, no new fetch.
        assert!(engine.toggle("hello").is_none());
        assert_eq!(engine.state(), PlaybackState::Playing);
        assert_eq!(engine.output.plays.len(), 2);
        assert_eq!(engine.output.plays[1].1, Duration::ZERO);
    }

    #[test]
    fn different_text_discards_cache_and_refetches() {
        let mut engine = engine();
        let first = engine.toggle("one").unwrap();
        engine.on_synthesis(first.seq, Some(clip(100)));
        assert_eq!(engine.state(), PlaybackState::Playing);

        let second = engine.toggle("two").expect("new text needs a fetch");
        assert_eq!(second.text, "two");
        assert_eq!(engine.state(), PlaybackState::Loading);
        // The old source was released before the switch.
        assert!(engine.output.stops >= 1);
    }

    // -----------------------------------------------------------------------
    // Pause / resume
    // -----------------------------------------------------------------------

    #[test]
    fn toggle_while_playing_pauses_and_resumes_at_offset() {
        let mut engine = engine();
        let request = engine.toggle("hello").unwrap();
        engine.on_synthesis(request.seq, Some(clip(48_000)));

        engine.output.position = Duration::from_secs(3);
        assert!(engine.toggle("hello").is_none());
        assert_eq!(engine.state(), PlaybackState::Paused);

        assert!(engine.toggle("hello").is_none());
        assert_eq!(engine.state(), PlaybackState::Playing);
        // Resumed from the recorded offset, not from zero.
        let (_, resume_offset) = *engine.output.plays.last().unwrap();
        assert_eq!(resume_offset, Duration::from_secs(3));
        assert!(resume_offset > Duration::ZERO);
    }

    #[test]
    fn pause_then_different_text_starts_fresh() {
        let mut engine = engine();
        let request = engine.toggle("one").unwrap();
        engine.on_synthesis(request.seq, Some(clip(100)));
        engine.output.position = Duration::from_millis(500);
        engine.toggle("one"); // pause

        let second = engine.toggle("two").expect("fetch for new text");
        assert_eq!(second.text, "two");
        assert_eq!(engine.state(), PlaybackState::Loading);
    }

    // -----------------------------------------------------------------------
    // Stale results and stop()
    // -----------------------------------------------------------------------

    #[test]
    fn switching_text_invalidates_inflight_fetch() {
        let mut engine = engine();
        let first = engine.toggle("one").unwrap();
        let second = engine.toggle("two").unwrap();
        assert_ne!(first.seq, second.seq);

        // The stale result for "one" lands after the switch: discarded.
        engine.on_synthesis(first.seq, Some(clip(100)));
        assert_eq!(engine.state(), PlaybackState::Loading);
        assert!(engine.output.plays.is_empty());

        // The current request still completes normally.
        engine.on_synthesis(second.seq, Some(clip(200)));
        assert_eq!(engine.state(), PlaybackState::Playing);
        assert_eq!(engine.output.plays, vec![(200, Duration::ZERO)]);
    }

    #[test]
    fn stale_result_after_stop_does_not_resurrect_playback() {
        let mut engine = engine();
        let request = engine.toggle("hello").unwrap();
        engine.stop();

        engine.on_synthesis(request.seq, Some(clip(100)));
        assert_eq!(engine.state(), PlaybackState::Stopped);
        assert!(engine.output.plays.is_empty());
    }

    #[test]
    fn stop_is_safe_in_every_state() {
        let mut engine = engine();
        engine.stop(); // Stopped

        let request = engine.toggle("hello").unwrap();
        engine.stop(); // Loading

        let request2 = engine.toggle("hello").unwrap();
        assert_ne!(request.seq, request2.seq);
        engine.on_synthesis(request2.seq, Some(clip(100)));
        engine.stop(); // Playing

        let _ = engine.toggle("hello"); // cache hit → Playing
        engine.toggle("hello"); // → Paused
        engine.stop(); // Paused
        assert_eq!(engine.state(), PlaybackState::Stopped);
    }

    #[test]
    fn at_most_one_source_active_across_text_switch() {
        let mut engine = engine();
        let first = engine.toggle("one").unwrap();
        engine.on_synthesis(first.seq, Some(clip(100)));
        assert!(engine.output.active);

        let second = engine.toggle("two").unwrap();
        // Old source released synchronously, before the new fetch resolves.
        assert!(!engine.output.active);

        engine.on_synthesis(second.seq, Some(clip(200)));
        assert!(engine.output.active);
        assert_eq!(engine.output.plays.len(), 2);
    }

    // -----------------------------------------------------------------------
    // Misc
    // -----------------------------------------------------------------------

    #[test]
    fn state_for_reports_stopped_for_other_text() {
        let mut engine = engine();
        let request = engine.toggle("mine").unwrap();
        engine.on_synthesis(request.seq, Some(clip(100)));

        assert_eq!(engine.state_for("mine"), PlaybackState::Playing);
        assert_eq!(engine.state_for("other"), PlaybackState::Stopped);
    }

    #[test]
    fn output_error_on_play_degrades_to_stopped() {
        let mut engine = engine();
        let request = engine.toggle("hello").unwrap();
        engine.output.fail_next_play = true;
        engine.on_synthesis(request.seq, Some(clip(100)));
        assert_eq!(engine.state(), PlaybackState::Stopped);
    }

    #[test]
    fn natural_end_resets_offset() {
        let mut engine = engine();
        let request = engine.toggle("hello").unwrap();
        engine.on_synthesis(request.seq, Some(clip(100)));

        engine.output.position = Duration::from_secs(2);
        engine.toggle("hello"); // pause at 2 s
        engine.toggle("hello"); // resume
        engine.output.idle = true;
        engine.poll();

        assert_eq!(engine.state(), PlaybackState::Stopped);
        // Replay starts from zero, not the stale pause offset.
        engine.toggle("hello");
        let (_, offset) = *engine.output.plays.last().unwrap();
        assert_eq!(offset, Duration::ZERO);
    }
}
