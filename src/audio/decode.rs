//! Decoding of synthesized-speech payloads.
//!
//! The TTS endpoint returns raw little-endian 16-bit PCM at a fixed rate
//! (24 kHz mono for the current voices).  [`pcm16_to_clip`] converts that
//! into the `f32` [`AudioClip`] the playback sink consumes.

use super::output::AudioClip;

/// Convert raw little-endian 16-bit PCM into a mono [`AudioClip`].
///
/// A trailing odd byte (truncated sample) is dropped.  An empty payload
/// yields an empty clip; the playback engine treats that as a synthesis
/// failure upstream, so no special case is needed here.
pub fn pcm16_to_clip(pcm: &[u8], sample_rate: u32) -> AudioClip {
    let samples: Vec<f32> = pcm
        .chunks_exact(2)
        .map(|pair| {
            let value = i16::from_le_bytes([pair[0], pair[1]]);
            f32::from(value) / f32::from(i16::MAX)
        })
        .collect();

    AudioClip::new(samples, sample_rate)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_little_endian_pairs() {
        // 0x0000 = 0, 0x7fff = i16::MAX → 1.0, 0x8001 = -i16::MAX → -1.0
        let pcm = [0x00, 0x00, 0xff, 0x7f, 0x01, 0x80];
        let clip = pcm16_to_clip(&pcm, 24_000);

        assert_eq!(clip.samples().len(), 3);
        assert!((clip.samples()[0] - 0.0).abs() < 1e-6);
        assert!((clip.samples()[1] - 1.0).abs() < 1e-6);
        assert!((clip.samples()[2] + 1.0).abs() < 1e-6);
    }

    #[test]
    fn trailing_odd_byte_is_dropped() {
        let pcm = [0x00, 0x00, 0x12];
        let clip = pcm16_to_clip(&pcm, 24_000);
        assert_eq!(clip.samples().len(), 1);
    }

    #[test]
    fn empty_payload_yields_empty_clip() {
        let clip = pcm16_to_clip(&[], 24_000);
        assert!(clip.samples().is_empty());
        assert_eq!(clip.duration(), std::time::Duration::ZERO);
    }

    #[test]
    fn duration_follows_sample_rate() {
        // 24 000 samples @ 24 kHz = 1 second
        let pcm = vec![0u8; 24_000 * 2];
        let clip = pcm16_to_clip(&pcm, 24_000);
        assert_eq!(clip.duration(), std::time::Duration::from_secs(1));
    }
}
