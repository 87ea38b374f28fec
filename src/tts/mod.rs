//! Text-to-Speech adapters and playback.
//!
//! A common `TtsEngine` trait with cloud implementations:
//! - OpenAI TTS API (raw PCM response)
//! - ElevenLabs TTS API (mp3 response, decoded with symphonia)

pub mod cloud;
pub mod decode;
pub mod playback;

use crate::config::TtsConfig;

/// Synthesized audio: mono f32 samples plus their rate.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl AudioClip {
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Common trait for all TTS engines.
#[allow(async_fn_in_trait)]
pub trait TtsEngine: Send + Sync {
    /// Synthesize text to playable audio. Empty text yields an empty clip.
    async fn synthesize(&self, text: &str) -> anyhow::Result<AudioClip>;

    /// Display name for this engine (e.g. "OpenAI TTS (alloy)").
    fn name(&self) -> String;
}

/// Enum-dispatch wrapper over the TTS backends.
pub enum TtsAdapter {
    OpenAi(cloud::OpenAiTts),
    ElevenLabs(cloud::ElevenLabsTts),
}

impl TtsAdapter {
    pub async fn synthesize(&self, text: &str) -> anyhow::Result<AudioClip> {
        match self {
            Self::OpenAi(e) => e.synthesize(text).await,
            Self::ElevenLabs(e) => e.synthesize(text).await,
        }
    }

    pub fn name(&self) -> String {
        match self {
            Self::OpenAi(e) => e.name(),
            Self::ElevenLabs(e) => e.name(),
        }
    }
}

/// Create a TTS engine from config.
pub fn create_tts_engine(cfg: &TtsConfig) -> anyhow::Result<TtsAdapter> {
    match cfg.adapter.as_str() {
        "openai-tts" => {
            let key = cfg
                .api_key
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("OpenAI TTS requires an API key"))?;
            let voice = cfg.voice.as_deref().unwrap_or("alloy");
            Ok(TtsAdapter::OpenAi(cloud::OpenAiTts::new(key, voice)))
        }
        "elevenlabs" => {
            let key = cfg
                .api_key
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("ElevenLabs TTS requires an API key"))?;
            let voice = cfg.voice.as_deref().unwrap_or("Rachel");
            Ok(TtsAdapter::ElevenLabs(cloud::ElevenLabsTts::new(key, voice)))
        }
        other => anyhow::bail!("Unknown TTS adapter: {}", other),
    }
}
