//! Speech-to-Text adapters.
//!
//! A common `SttEngine` trait with cloud implementations:
//! - OpenAI Whisper API
//! - Custom user-configured endpoint (any Whisper-compatible server)

pub mod cloud;

use crate::config::SttConfig;

/// Common trait for all STT engines.
#[allow(async_fn_in_trait)]
pub trait SttEngine: Send + Sync {
    /// Transcribe 16 kHz mono f32 audio to text.
    async fn transcribe(&self, audio: &[f32]) -> anyhow::Result<String>;
}

/// Enum-dispatch wrapper over the STT backends.
///
/// Avoids dyn-compatibility issues with async trait methods.
pub enum SttAdapter {
    OpenAi(cloud::OpenAiStt),
    Custom(cloud::CustomApiStt),
}

impl SttAdapter {
    pub async fn transcribe(&self, audio: &[f32]) -> anyhow::Result<String> {
        match self {
            Self::OpenAi(e) => e.transcribe(audio).await,
            Self::Custom(e) => e.transcribe(audio).await,
        }
    }
}

/// Outcome of one capture + transcription attempt.
///
/// Both failure variants are normal turn outcomes, not process errors; the
/// dispatcher folds them into its error sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transcript {
    Text(String),
    /// The service answered but produced no usable text for the audio.
    Unintelligible,
    /// The request to the service itself failed.
    ServiceFailed(String),
}

/// Transcribe one utterance, folding service outcomes into a `Transcript`.
pub async fn transcribe_utterance(engine: &SttAdapter, audio: &[f32]) -> Transcript {
    match engine.transcribe(audio).await {
        Ok(text) => {
            let text = text.trim();
            if text.is_empty() {
                Transcript::Unintelligible
            } else {
                Transcript::Text(text.to_string())
            }
        }
        Err(e) => Transcript::ServiceFailed(e.to_string()),
    }
}

/// Create an STT engine from config.
pub fn create_stt_engine(cfg: &SttConfig) -> anyhow::Result<SttAdapter> {
    match cfg.adapter.as_str() {
        "openai-cloud" => {
            let key = cfg
                .api_key
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("OpenAI STT requires an API key"))?;
            Ok(SttAdapter::OpenAi(cloud::OpenAiStt::new(key)))
        }
        "custom-cloud" => {
            let url = cfg
                .endpoint
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("Custom STT requires an endpoint URL"))?;
            Ok(SttAdapter::Custom(cloud::CustomApiStt::new(
                url,
                cfg.api_key.clone(),
            )))
        }
        other => anyhow::bail!("Unknown STT adapter: {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SttConfig;

    #[test]
    fn openai_adapter_requires_api_key() {
        let cfg = SttConfig {
            adapter: "openai-cloud".into(),
            api_key: None,
            endpoint: None,
        };
        assert!(create_stt_engine(&cfg).is_err());
    }

    #[test]
    fn custom_adapter_requires_endpoint() {
        let cfg = SttConfig {
            adapter: "custom-cloud".into(),
            api_key: None,
            endpoint: None,
        };
        assert!(create_stt_engine(&cfg).is_err());
    }

    #[test]
    fn unknown_adapter_is_rejected() {
        let cfg = SttConfig {
            adapter: "telepathy".into(),
            api_key: None,
            endpoint: None,
        };
        assert!(create_stt_engine(&cfg).is_err());
    }
}
