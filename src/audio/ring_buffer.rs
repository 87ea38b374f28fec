//! Lock-free SPSC buffer carrying samples from the cpal callback thread.

use ringbuf::{
    traits::{Consumer, Observer, Producer, Split},
    HeapRb,
};

/// Default capacity: ~30 seconds of 16 kHz mono audio.
const DEFAULT_CAPACITY: usize = 480_000;

/// Producer half, owned by the cpal audio callback.
pub struct SampleProducer {
    inner: ringbuf::HeapProd<f32>,
}

/// Consumer half, owned by the turn loop.
pub struct SampleConsumer {
    inner: ringbuf::HeapCons<f32>,
}

/// Create a matched producer/consumer pair.
pub fn sample_channel() -> (SampleProducer, SampleConsumer) {
    let rb = HeapRb::<f32>::new(DEFAULT_CAPACITY);
    let (prod, cons) = rb.split();
    (SampleProducer { inner: prod }, SampleConsumer { inner: cons })
}

impl SampleProducer {
    /// Push samples, returning how many were written. A full buffer drops the
    /// overflow; the consumer will catch up between utterances.
    pub fn push_slice(&mut self, samples: &[f32]) -> usize {
        self.inner.push_slice(samples)
    }
}

impl SampleConsumer {
    /// Number of samples ready to read.
    pub fn available(&self) -> usize {
        self.inner.occupied_len()
    }

    /// Pop up to `buf.len()` samples into `buf`, returning the count read.
    pub fn pop_slice(&mut self, buf: &mut [f32]) -> usize {
        self.inner.pop_slice(buf)
    }

    /// Throw away everything currently buffered. Used between turns so a new
    /// utterance does not start with audio captured during playback.
    pub fn discard_all(&mut self) {
        let mut scratch = [0.0f32; 1024];
        while self.pop_slice(&mut scratch) == scratch.len() {}
    }
}

// The ringbuf halves are each used from exactly one thread.
unsafe impl Send for SampleProducer {}
unsafe impl Send for SampleConsumer {}
