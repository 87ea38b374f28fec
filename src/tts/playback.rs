//! Audio playback via rodio.
//!
//! Plays f32 PCM through the default output device. `play` blocks until the
//! sink reports completion, so a turn cannot overlap its own playback.

use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, Sink};

pub struct AudioPlayer {
    _stream: OutputStream,
    sink: Sink,
}

impl AudioPlayer {
    /// Open the default audio output device.
    pub fn new() -> anyhow::Result<Self> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| anyhow::anyhow!("Failed to open audio output: {}", e))?;
        let sink = Sink::try_new(&stream_handle)
            .map_err(|e| anyhow::anyhow!("Failed to create audio sink: {}", e))?;

        Ok(Self {
            _stream: stream,
            sink,
        })
    }

    /// Play mono samples at the given rate, blocking until playback finishes.
    /// An empty clip is a silent no-op.
    pub fn play(&self, samples: &[f32], sample_rate: u32) -> anyhow::Result<()> {
        if samples.is_empty() {
            return Ok(());
        }
        let source = SamplesBuffer::new(1, sample_rate, samples.to_vec());
        self.sink.append(source);
        self.sink.sleep_until_end();
        Ok(())
    }

    /// Set playback volume (0.0 = silent, 1.0 = full volume).
    pub fn set_volume(&self, volume: f32) {
        self.sink.set_volume(volume.clamp(0.0, 1.0));
    }
}
