//! Configuration file reading and data directory paths.

pub mod paths;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use paths::data_dir;

fn default_agent_name() -> String {
    "dave".to_string()
}

fn default_stt_adapter() -> String {
    "openai-cloud".to_string()
}

fn default_tts_adapter() -> String {
    "openai-tts".to_string()
}

fn default_llm_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_llm_model() -> String {
    "gpt-4o-mini".to_string()
}

/// Top-level agent_config.json shape. Every field has a default so a missing
/// or partial file still yields a usable configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Name the wake rule listens for.
    #[serde(default = "default_agent_name")]
    pub agent_name: String,
    /// Input device name; `None` uses the system default microphone.
    #[serde(default)]
    pub input_device: Option<String>,
    #[serde(default)]
    pub stt: SttConfig,
    #[serde(default)]
    pub tts: TtsConfig,
    #[serde(default)]
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SttConfig {
    /// One of: "openai-cloud", "custom-cloud".
    #[serde(default = "default_stt_adapter")]
    pub adapter: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsConfig {
    /// One of: "openai-tts", "elevenlabs".
    #[serde(default = "default_tts_adapter")]
    pub adapter: String,
    #[serde(default)]
    pub voice: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    /// Playback volume, 0.0 to 1.0.
    #[serde(default)]
    pub volume: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            agent_name: default_agent_name(),
            input_device: None,
            stt: SttConfig::default(),
            tts: TtsConfig::default(),
            llm: LlmConfig::default(),
        }
    }
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            adapter: default_stt_adapter(),
            api_key: None,
            endpoint: None,
        }
    }
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            adapter: default_tts_adapter(),
            voice: None,
            api_key: None,
            volume: None,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_llm_base_url(),
            model: default_llm_model(),
            api_key: None,
        }
    }
}

/// Read agent_config.json from the data directory, falling back to defaults.
pub fn read_agent_config() -> AgentConfig {
    read_json_file(&config_path()).unwrap_or_default()
}

/// Path to agent_config.json.
pub fn config_path() -> PathBuf {
    data_dir().join("agent_config.json")
}

/// Read a JSON file and deserialize it. Missing files are silent; unreadable
/// or unparsable files log a warning.
fn read_json_file<T: serde::de::DeserializeOwned>(path: &Path) -> Option<T> {
    match std::fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(val) => Some(val),
            Err(e) => {
                warn!("Failed to parse {}: {}", path.display(), e);
                None
            }
        },
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to read {}: {}", path.display(), e);
            }
            None
        }
    }
}
