//! Microphone capture via cpal.
//!
//! Opens the default (or named) input device at its native rate, down-mixes
//! to mono, resamples to 16 kHz, and feeds the ring buffer consumed by
//! `UtteranceRecorder::listen`.

use anyhow::{anyhow, Context};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Stream, StreamConfig};
use tracing::{error, info};

use super::endpoint::Endpointer;
use super::ring_buffer::{sample_channel, SampleConsumer, SampleProducer};
use super::{CHUNK_SAMPLES, TARGET_SAMPLE_RATE};

/// Poll interval while waiting for new audio.
const POLL_MS: u64 = 20;

/// Blocking microphone front-end: owns the capture stream and hands back one
/// complete utterance at a time.
pub struct UtteranceRecorder {
    // Dropping the stream stops capture, so it must live as long as we do.
    _stream: Stream,
    consumer: SampleConsumer,
}

impl UtteranceRecorder {
    /// Open the input device and start capturing.
    pub fn start(device_name: Option<&str>) -> anyhow::Result<Self> {
        let (producer, consumer) = sample_channel();
        let stream = open_input_stream(producer, device_name)?;
        Ok(Self {
            _stream: stream,
            consumer,
        })
    }

    /// Wait for the speaker to say something, then return the utterance as
    /// 16 kHz mono samples. Audio buffered before the call (e.g. our own
    /// playback picked up by the microphone) is discarded first.
    pub async fn listen(&mut self) -> Vec<f32> {
        self.consumer.discard_all();
        let mut endpointer = Endpointer::new();
        let mut chunk = vec![0.0f32; CHUNK_SAMPLES];
        loop {
            if self.consumer.available() < CHUNK_SAMPLES {
                tokio::time::sleep(std::time::Duration::from_millis(POLL_MS)).await;
                continue;
            }
            let read = self.consumer.pop_slice(&mut chunk);
            if let Some(utterance) = endpointer.push_chunk(&chunk[..read]) {
                return utterance;
            }
        }
    }
}

fn open_input_stream(
    mut producer: SampleProducer,
    device_name: Option<&str>,
) -> anyhow::Result<Stream> {
    let host = cpal::default_host();

    let device = match device_name {
        Some(name) => host
            .input_devices()
            .context("Failed to enumerate input devices")?
            .find(|d| d.name().map(|n| n == name).unwrap_or(false))
            .ok_or_else(|| anyhow!("Input device not found: {name}"))?,
        None => host
            .default_input_device()
            .ok_or_else(|| anyhow!("No default input device available"))?,
    };

    info!(
        device = %device.name().unwrap_or_else(|_| "unknown".into()),
        "Selected input device"
    );

    let default_config = device
        .default_input_config()
        .context("Failed to get default input config")?;
    let native_rate = default_config.sample_rate().0;
    let channels = default_config.channels();

    let stream_config = StreamConfig {
        channels,
        sample_rate: cpal::SampleRate(native_rate),
        buffer_size: cpal::BufferSize::Default,
    };

    info!(native_rate, channels, "Capturing (resampled to {} Hz mono)", TARGET_SAMPLE_RATE);

    let stream = device
        .build_input_stream(
            &stream_config,
            move |data: &[f32], _info: &cpal::InputCallbackInfo| {
                let mono = downmix(data, channels);
                let resampled = resample(&mono, native_rate, TARGET_SAMPLE_RATE);
                producer.push_slice(&resampled);
            },
            move |err| {
                error!("Audio input stream error: {}", err);
            },
            None,
        )
        .context("Failed to build input stream")?;

    stream.play().context("Failed to start input stream")?;
    info!("Audio capture started");

    Ok(stream)
}

/// Average interleaved channels down to mono.
fn downmix(samples: &[f32], channels: u16) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }
    let ch = channels as usize;
    samples
        .chunks_exact(ch)
        .map(|frame| frame.iter().sum::<f32>() / ch as f32)
        .collect()
}

/// Linear interpolation resampler for mono f32 samples.
fn resample(input: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate {
        return input.to_vec();
    }
    let ratio = from_rate as f64 / to_rate as f64;
    let out_len = (input.len() as f64 / ratio).floor() as usize;
    (0..out_len)
        .map(|i| {
            let pos = i as f64 * ratio;
            let idx = pos.floor() as usize;
            let frac = (pos - idx as f64) as f32;
            let a = input.get(idx).copied().unwrap_or(0.0);
            let b = input.get(idx + 1).copied().unwrap_or(a);
            a + frac * (b - a)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downmix_averages_stereo_frames() {
        let stereo = [1.0, 0.0, 0.5, 0.5, -1.0, 1.0];
        assert_eq!(downmix(&stereo, 2), vec![0.5, 0.5, 0.0]);
    }

    #[test]
    fn downmix_passes_mono_through() {
        let mono = [0.1, 0.2, 0.3];
        assert_eq!(downmix(&mono, 1), mono.to_vec());
    }

    #[test]
    fn resample_is_identity_at_equal_rates() {
        let input = [0.1, 0.2, 0.3];
        assert_eq!(resample(&input, 16_000, 16_000), input.to_vec());
    }

    #[test]
    fn resample_halves_length_at_double_rate() {
        let input: Vec<f32> = (0..32_000).map(|i| (i % 100) as f32 / 100.0).collect();
        let out = resample(&input, 32_000, 16_000);
        assert_eq!(out.len(), 16_000);
    }

    #[test]
    fn resample_interpolates_between_neighbors() {
        // 2:1 upsampling of a ramp inserts midpoints.
        let out = resample(&[0.0, 1.0], 8_000, 16_000);
        assert_eq!(out.len(), 4);
        assert!((out[1] - 0.5).abs() < 1e-6);
    }
}
