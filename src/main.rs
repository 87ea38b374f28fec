//! Voice Agent — a spoken conversational loop.
//!
//! Each turn: capture one utterance from the microphone, transcribe it via a
//! cloud speech service, dispatch it against the intent rules, and speak the
//! reply. The loop runs until the exit intent is heard.

mod agent;
mod audio;
mod config;
mod llm;
mod stt;
mod tts;
mod vad;

use chrono::Local;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use agent::Session;
use audio::UtteranceRecorder;
use config::read_agent_config;
use llm::GenerativeClient;
use stt::Transcript;
use tts::playback::AudioPlayer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (respects RUST_LOG env, defaults to info)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cfg = read_agent_config();
    info!(?cfg, "Configuration loaded");

    let stt_engine = stt::create_stt_engine(&cfg.stt)?;
    let tts_engine = tts::create_tts_engine(&cfg.tts)?;
    let player = AudioPlayer::new()?;
    if let Some(volume) = cfg.tts.volume {
        player.set_volume(volume);
    }
    let generative = GenerativeClient::new(&cfg.llm);
    let mut recorder = UtteranceRecorder::start(cfg.input_device.as_deref())?;

    let mut session = Session::new(&cfg.agent_name);
    let mut rng = rand::thread_rng();
    info!(agent = %session.agent_name(), voice = %tts_engine.name(), "----- Starting up -----");

    while session.is_running() {
        info!("Listening...");
        let samples = recorder.listen().await;

        let text = match stt::transcribe_utterance(&stt_engine, &samples).await {
            Transcript::Text(t) => {
                info!(me = %t, "Heard");
                t
            }
            Transcript::Unintelligible => {
                warn!("Speech service could not understand audio");
                agent::ERROR_SENTINEL.to_string()
            }
            Transcript::ServiceFailed(e) => {
                warn!(error = %e, "Speech service request failed");
                agent::ERROR_SENTINEL.to_string()
            }
        };

        let reply = match session.respond_fixed(&text, Local::now().time(), &mut rng) {
            Some(reply) => reply,
            None => match generative
                .generate(session.last_utterance(), agent::GENERATION_MAX_TOKENS)
                .await
            {
                Ok(continuation) => {
                    agent::strip_prompt_echo(session.last_utterance(), &continuation)
                }
                Err(e) => {
                    warn!(error = %e, "Generative reply failed, asking for clarification");
                    agent::CLARIFICATION.to_string()
                }
            },
        };

        info!(agent = %reply, "Replying");
        if reply.is_empty() {
            debug!("Empty reply, skipping synthesis");
            continue;
        }

        match tts_engine.synthesize(&reply).await {
            Ok(clip) => {
                if let Err(e) = player.play(&clip.samples, clip.sample_rate) {
                    error!(error = %e, "Playback failed, skipping audio for this turn");
                }
            }
            Err(e) => {
                error!(error = %e, "Speech synthesis failed, skipping audio for this turn");
            }
        }
    }

    info!(agent = %session.agent_name(), "----- Closing down -----");
    Ok(())
}
