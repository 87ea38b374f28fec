//! Cloud TTS adapters: OpenAI TTS, ElevenLabs TTS.

use tracing::info;

use super::{decode, AudioClip, TtsEngine};

/// OpenAI TTS — REST synthesis returning raw PCM.
///
/// POST `https://api.openai.com/v1/audio/speech` with
/// `{"model": "tts-1", "input": <text>, "voice": <voice>, "response_format": "pcm"}`;
/// the PCM response is 24 kHz 16-bit mono.
pub struct OpenAiTts {
    api_key: String,
    voice: String,
    model: String,
    client: reqwest::Client,
}

/// Sample rate of OpenAI's PCM response format.
const OPENAI_PCM_RATE: u32 = 24_000;

impl OpenAiTts {
    pub fn new(api_key: &str, voice: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            voice: voice.to_string(),
            model: "tts-1".to_string(),
            client: reqwest::Client::new(),
        }
    }
}

impl TtsEngine for OpenAiTts {
    async fn synthesize(&self, text: &str) -> anyhow::Result<AudioClip> {
        if text.trim().is_empty() {
            return Ok(AudioClip {
                samples: Vec::new(),
                sample_rate: OPENAI_PCM_RATE,
            });
        }

        info!(voice = %self.voice, text_len = text.len(), "OpenAI TTS request");

        let body = serde_json::json!({
            "model": self.model,
            "input": text,
            "voice": self.voice,
            "response_format": "pcm",
        });

        let resp = self
            .client
            .post("https://api.openai.com/v1/audio/speech")
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("OpenAI TTS request failed: {}", e))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("OpenAI TTS API error {}: {}", status, body);
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to read OpenAI TTS response: {}", e))?;

        let samples: Vec<f32> = bytes
            .chunks_exact(2)
            .map(|chunk| {
                let sample = i16::from_le_bytes([chunk[0], chunk[1]]);
                sample as f32 / 32768.0
            })
            .collect();

        info!(samples = samples.len(), "OpenAI TTS synthesis complete");
        Ok(AudioClip {
            samples,
            sample_rate: OPENAI_PCM_RATE,
        })
    }

    fn name(&self) -> String {
        format!("OpenAI TTS ({})", self.voice)
    }
}

/// ElevenLabs TTS — REST synthesis returning mp3.
///
/// POST `https://api.elevenlabs.io/v1/text-to-speech/{voice_id}`.
pub struct ElevenLabsTts {
    api_key: String,
    voice_id: String,
    client: reqwest::Client,
}

impl ElevenLabsTts {
    pub fn new(api_key: &str, voice_id: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            voice_id: voice_id.to_string(),
            client: reqwest::Client::new(),
        }
    }
}

impl TtsEngine for ElevenLabsTts {
    async fn synthesize(&self, text: &str) -> anyhow::Result<AudioClip> {
        if text.trim().is_empty() {
            return Ok(AudioClip {
                samples: Vec::new(),
                sample_rate: 44_100,
            });
        }

        info!(voice = %self.voice_id, text_len = text.len(), "ElevenLabs TTS request");

        let url = format!(
            "https://api.elevenlabs.io/v1/text-to-speech/{}",
            self.voice_id
        );

        let body = serde_json::json!({
            "text": text,
            "model_id": "eleven_monolingual_v1",
            "voice_settings": {
                "stability": 0.5,
                "similarity_boost": 0.5,
            }
        });

        let resp = self
            .client
            .post(&url)
            .header("xi-api-key", &self.api_key)
            .header("Accept", "audio/mpeg")
            .json(&body)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("ElevenLabs TTS request failed: {}", e))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("ElevenLabs TTS API error {}: {}", status, body);
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to read ElevenLabs response: {}", e))?;

        let clip = decode::decode_mp3(bytes.to_vec())?;
        info!(samples = clip.samples.len(), "ElevenLabs TTS synthesis complete");
        Ok(clip)
    }

    fn name(&self) -> String {
        format!("ElevenLabs ({})", self.voice_id)
    }
}
