//! Cloud STT adapters (OpenAI Whisper API, custom endpoint).

use reqwest::multipart;
use serde::Deserialize;
use tracing::debug;

use super::SttEngine;

/// Shape of a Whisper-style transcription response.
#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    #[serde(default)]
    text: String,
}

/// Encode f32 samples as 16-bit PCM WAV bytes (mono).
fn encode_wav(audio: &[f32], sample_rate: u32) -> Vec<u8> {
    const BYTES_PER_SAMPLE: u32 = 2;
    const CHANNELS: u16 = 1;

    let data_size = audio.len() as u32 * BYTES_PER_SAMPLE;
    let mut buf = Vec::with_capacity(44 + data_size as usize);

    buf.extend_from_slice(b"RIFF");
    buf.extend_from_slice(&(36 + data_size).to_le_bytes());
    buf.extend_from_slice(b"WAVE");

    buf.extend_from_slice(b"fmt ");
    buf.extend_from_slice(&16u32.to_le_bytes());
    buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
    buf.extend_from_slice(&CHANNELS.to_le_bytes());
    buf.extend_from_slice(&sample_rate.to_le_bytes());
    buf.extend_from_slice(&(sample_rate * BYTES_PER_SAMPLE).to_le_bytes()); // byte rate
    buf.extend_from_slice(&(BYTES_PER_SAMPLE as u16).to_le_bytes()); // block align
    buf.extend_from_slice(&16u16.to_le_bytes()); // bits per sample

    buf.extend_from_slice(b"data");
    buf.extend_from_slice(&data_size.to_le_bytes());
    for &sample in audio {
        let pcm = (sample.clamp(-1.0, 1.0) * 32767.0) as i16;
        buf.extend_from_slice(&pcm.to_le_bytes());
    }

    buf
}

/// POST WAV audio to a Whisper-compatible transcription endpoint.
async fn post_transcription(
    client: &reqwest::Client,
    url: &str,
    api_key: Option<&str>,
    audio: &[f32],
) -> anyhow::Result<String> {
    let wav = encode_wav(audio, 16_000);
    debug!(bytes = wav.len(), url, "Sending audio for transcription");

    let file_part = multipart::Part::bytes(wav)
        .file_name("audio.wav")
        .mime_str("audio/wav")?;
    let form = multipart::Form::new()
        .text("model", "whisper-1")
        .part("file", file_part);

    let mut req = client.post(url).multipart(form);
    if let Some(key) = api_key {
        req = req.bearer_auth(key);
    }

    let resp = req.send().await?;
    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        anyhow::bail!("STT API error {}: {}", status, body);
    }

    let parsed: TranscriptionResponse = resp.json().await?;
    Ok(parsed.text)
}

/// OpenAI Whisper API adapter.
pub struct OpenAiStt {
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiStt {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            client: reqwest::Client::new(),
        }
    }
}

impl SttEngine for OpenAiStt {
    async fn transcribe(&self, audio: &[f32]) -> anyhow::Result<String> {
        post_transcription(
            &self.client,
            "https://api.openai.com/v1/audio/transcriptions",
            Some(&self.api_key),
            audio,
        )
        .await
    }
}

/// User-configured Whisper-compatible endpoint.
pub struct CustomApiStt {
    endpoint: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl CustomApiStt {
    pub fn new(endpoint: &str, api_key: Option<String>) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            api_key,
            client: reqwest::Client::new(),
        }
    }
}

impl SttEngine for CustomApiStt {
    async fn transcribe(&self, audio: &[f32]) -> anyhow::Result<String> {
        post_transcription(&self.client, &self.endpoint, self.api_key.as_deref(), audio).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stt::{transcribe_utterance, SttAdapter, Transcript};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn wav_header_describes_the_payload() {
        let audio = [0.0f32; 160];
        let wav = encode_wav(&audio, 16_000);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(&wav[36..40], b"data");
        // data size field matches two bytes per sample
        assert_eq!(u32::from_le_bytes(wav[40..44].try_into().unwrap()), 320);
        assert_eq!(wav.len(), 44 + 320);
    }

    #[test]
    fn wav_samples_clamp_to_pcm_range() {
        let wav = encode_wav(&[2.0, -2.0], 16_000);
        let first = i16::from_le_bytes(wav[44..46].try_into().unwrap());
        let second = i16::from_le_bytes(wav[46..48].try_into().unwrap());
        assert_eq!(first, 32767);
        assert_eq!(second, -32767);
    }

    #[tokio::test]
    async fn custom_endpoint_returns_recognized_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/audio/transcriptions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"text": "hello there"})),
            )
            .mount(&server)
            .await;

        let engine = SttAdapter::Custom(CustomApiStt::new(
            &format!("{}/v1/audio/transcriptions", server.uri()),
            None,
        ));
        let got = transcribe_utterance(&engine, &[0.0; 1600]).await;
        assert_eq!(got, Transcript::Text("hello there".to_string()));
    }

    #[tokio::test]
    async fn blank_transcription_is_unintelligible() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"text": "  "})))
            .mount(&server)
            .await;

        let engine = SttAdapter::Custom(CustomApiStt::new(&server.uri(), None));
        let got = transcribe_utterance(&engine, &[0.0; 1600]).await;
        assert_eq!(got, Transcript::Unintelligible);
    }

    #[tokio::test]
    async fn service_error_reports_failure_not_panic() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let engine = SttAdapter::Custom(CustomApiStt::new(&server.uri(), None));
        match transcribe_utterance(&engine, &[0.0; 1600]).await {
            Transcript::ServiceFailed(msg) => assert!(msg.contains("500")),
            other => panic!("expected ServiceFailed, got {other:?}"),
        }
    }
}
