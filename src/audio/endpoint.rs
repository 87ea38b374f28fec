//! Utterance endpointing.
//!
//! Consumes fixed-size audio chunks and decides where one utterance begins
//! and ends: recording starts on the first chunk whose energy crosses the
//! speech threshold and stops after a run of trailing silence (or at the
//! hard length cap).

use crate::vad::energy;

use super::{CHUNK_SAMPLES, TARGET_SAMPLE_RATE};

/// RMS level above which a chunk counts as speech.
const SPEECH_THRESHOLD: f32 = 0.01;

/// Trailing silent chunks that end an utterance (10 * 80 ms = 800 ms).
const END_SILENCE_CHUNKS: usize = 10;

/// Hard cap on utterance length.
const MAX_UTTERANCE_SECS: usize = 30;

/// Accumulates one utterance from a stream of audio chunks.
pub struct Endpointer {
    started: bool,
    silent_run: usize,
    samples: Vec<f32>,
    max_samples: usize,
}

impl Endpointer {
    pub fn new() -> Self {
        Self {
            started: false,
            silent_run: 0,
            samples: Vec::with_capacity(CHUNK_SAMPLES * 32),
            max_samples: MAX_UTTERANCE_SECS * TARGET_SAMPLE_RATE as usize,
        }
    }

    /// Feed one chunk. Returns the finished utterance once the trailing
    /// silence window (or the length cap) is reached, `None` until then.
    /// Chunks before speech onset are discarded.
    pub fn push_chunk(&mut self, chunk: &[f32]) -> Option<Vec<f32>> {
        let speech = energy::is_speech(chunk, SPEECH_THRESHOLD);

        if !self.started {
            if !speech {
                return None;
            }
            self.started = true;
        }

        self.samples.extend_from_slice(chunk);
        self.silent_run = if speech { 0 } else { self.silent_run + 1 };

        if self.silent_run >= END_SILENCE_CHUNKS || self.samples.len() >= self.max_samples {
            self.started = false;
            self.silent_run = 0;
            return Some(std::mem::take(&mut self.samples));
        }
        None
    }
}

impl Default for Endpointer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn speech_chunk() -> Vec<f32> {
        vec![0.2; CHUNK_SAMPLES]
    }

    fn silent_chunk() -> Vec<f32> {
        vec![0.0; CHUNK_SAMPLES]
    }

    #[test]
    fn leading_silence_is_discarded() {
        let mut ep = Endpointer::new();
        for _ in 0..20 {
            assert!(ep.push_chunk(&silent_chunk()).is_none());
        }
        assert!(ep.samples.is_empty());
    }

    #[test]
    fn utterance_ends_after_trailing_silence() {
        let mut ep = Endpointer::new();
        for _ in 0..5 {
            assert!(ep.push_chunk(&speech_chunk()).is_none());
        }
        let mut result = None;
        for _ in 0..END_SILENCE_CHUNKS {
            result = ep.push_chunk(&silent_chunk());
        }
        let utterance = result.expect("utterance should close after silence window");
        // 5 speech chunks plus the trailing silence.
        assert_eq!(utterance.len(), (5 + END_SILENCE_CHUNKS) * CHUNK_SAMPLES);
    }

    #[test]
    fn silence_run_resets_on_resumed_speech() {
        let mut ep = Endpointer::new();
        assert!(ep.push_chunk(&speech_chunk()).is_none());
        for _ in 0..(END_SILENCE_CHUNKS - 1) {
            assert!(ep.push_chunk(&silent_chunk()).is_none());
        }
        // Speaker resumed; the window starts over.
        assert!(ep.push_chunk(&speech_chunk()).is_none());
        for i in 0..END_SILENCE_CHUNKS {
            let out = ep.push_chunk(&silent_chunk());
            if i < END_SILENCE_CHUNKS - 1 {
                assert!(out.is_none());
            } else {
                assert!(out.is_some());
            }
        }
    }

    #[test]
    fn length_cap_closes_a_runaway_utterance() {
        let mut ep = Endpointer::new();
        let chunks_to_cap = ep.max_samples / CHUNK_SAMPLES;
        let mut result = None;
        for _ in 0..chunks_to_cap {
            result = ep.push_chunk(&speech_chunk());
        }
        assert!(result.is_some());
    }

    #[test]
    fn endpointer_is_reusable_after_an_utterance() {
        let mut ep = Endpointer::new();
        ep.push_chunk(&speech_chunk());
        for _ in 0..END_SILENCE_CHUNKS {
            ep.push_chunk(&silent_chunk());
        }
        // Second utterance on the same endpointer.
        assert!(ep.push_chunk(&silent_chunk()).is_none());
        assert!(ep.push_chunk(&speech_chunk()).is_none());
        let mut result = None;
        for _ in 0..END_SILENCE_CHUNKS {
            result = ep.push_chunk(&silent_chunk());
        }
        assert!(result.is_some());
    }
}
