//! Microphone capture and utterance segmentation.

pub mod capture;
pub mod endpoint;
pub mod ring_buffer;

pub use capture::UtteranceRecorder;

/// Sample rate the rest of the pipeline expects.
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

/// Chunk size in samples (80 ms at 16 kHz).
pub const CHUNK_SAMPLES: usize = 1280;
