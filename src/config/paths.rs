//! Platform data directory for the agent.
//!
//! Windows: %APPDATA%/voice-agent
//! macOS:   ~/Library/Application Support/voice-agent
//! Linux:   $XDG_CONFIG_HOME/voice-agent (default ~/.config/voice-agent)

use std::path::PathBuf;

/// Directory holding agent_config.json.
pub fn data_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("voice-agent")
}
