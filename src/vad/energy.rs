//! Energy-based voice activity detection.
//!
//! Root-mean-square amplitude is enough to tell speech from the silence
//! between utterances; no model needed.

/// RMS energy of an audio chunk, in 0.0..=1.0 for normalized samples.
pub fn level(chunk: &[f32]) -> f32 {
    if chunk.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = chunk.iter().map(|s| s * s).sum();
    (sum_sq / chunk.len() as f32).sqrt()
}

/// Whether a chunk's energy crosses the speech threshold.
pub fn is_speech(chunk: &[f32], threshold: f32) -> bool {
    level(chunk) >= threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silence_has_zero_level() {
        assert_eq!(level(&[]), 0.0);
        assert_eq!(level(&[0.0; 160]), 0.0);
    }

    #[test]
    fn constant_tone_level_matches_amplitude() {
        let chunk = [0.5f32; 160];
        assert!((level(&chunk) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn threshold_separates_speech_from_noise_floor() {
        let quiet = [0.001f32; 160];
        let loud = [0.1f32; 160];
        assert!(!is_speech(&quiet, 0.01));
        assert!(is_speech(&loud, 0.01));
    }
}
