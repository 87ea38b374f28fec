//! Dialogue session and intent dispatch.
//!
//! One `Session` lives for the whole process. Each turn classifies the
//! recognized utterance against an ordered list of intent rules; the first
//! match wins. Anything that misses every fixed rule goes to the generative
//! fallback, which the caller resolves with the LLM client.

use chrono::NaiveTime;
use rand::seq::SliceRandom;
use rand::Rng;

/// In-band marker meaning "capture produced no usable text".
pub const ERROR_SENTINEL: &str = "ERROR";

/// Fixed greeting for the wake rule.
pub const GREETING: &str = "Hello I am Dave the AI, what can I do for you?";

/// Spoken when a turn's audio could not be transcribed, or when the
/// generative fallback itself fails.
pub const CLARIFICATION: &str = "Sorry, come again?";

/// Token cap for one generative continuation.
pub const GENERATION_MAX_TOKENS: u32 = 50;

const ACKNOWLEDGMENTS: [&str; 6] = [
    "you're welcome!",
    "anytime!",
    "no problem!",
    "cool!",
    "I'm here if you need me!",
    "mention not",
];

const FAREWELLS: [&str; 6] = [
    "Tata",
    "Have a good day",
    "Bye",
    "Goodbye",
    "Hope to meet soon",
    "peace out!",
];

/// Which rule an utterance matched. Ordered by priority, top first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// The agent's name was mentioned.
    Wake,
    /// Literal "time" in the raw (un-lowercased) utterance.
    Time,
    Gratitude,
    Exit,
    /// The utterance is the capture-failure sentinel.
    CaptureError,
    /// No fixed rule matched; defer to the language model.
    Generative,
}

/// Session lifecycle. The exit rule is the only way out of `Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Running,
    Terminated,
}

/// Per-process conversation state. No history beyond the last utterance.
#[derive(Debug)]
pub struct Session {
    /// Lower-cased comparison key for the wake rule.
    agent_name: String,
    last_utterance: String,
    state: SessionState,
}

impl Session {
    pub fn new(agent_name: &str) -> Self {
        Self {
            agent_name: agent_name.to_lowercase(),
            last_utterance: String::new(),
            state: SessionState::Running,
        }
    }

    pub fn agent_name(&self) -> &str {
        &self.agent_name
    }

    /// The most recent utterance observed by `respond_fixed`. This is the
    /// prompt the generative fallback should see.
    pub fn last_utterance(&self) -> &str {
        &self.last_utterance
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    /// Run the fixed intent rules against one utterance.
    ///
    /// Returns the reply for the five fixed branches, or `None` when the
    /// generative fallback should produce it. The exit rule flips the session
    /// to `Terminated`; the caller still speaks the farewell before stopping.
    pub fn respond_fixed(
        &mut self,
        utterance: &str,
        now: NaiveTime,
        rng: &mut impl Rng,
    ) -> Option<String> {
        self.last_utterance = utterance.to_string();
        match classify(&self.agent_name, utterance) {
            Intent::Wake => Some(GREETING.to_string()),
            Intent::Time => Some(now.format("%H:%M").to_string()),
            Intent::Gratitude => Some(pick(&ACKNOWLEDGMENTS, rng)),
            Intent::Exit => {
                self.state = SessionState::Terminated;
                Some(pick(&FAREWELLS, rng))
            }
            Intent::CaptureError => Some(CLARIFICATION.to_string()),
            Intent::Generative => None,
        }
    }
}

/// Classify an utterance. First match wins; the order here is the contract.
///
/// `agent_name` must already be lower-cased. Matching is case-insensitive
/// substring containment, except the time rule which checks the raw text.
pub fn classify(agent_name: &str, utterance: &str) -> Intent {
    let lowered = utterance.to_lowercase();
    if lowered.contains(agent_name) {
        return Intent::Wake;
    }
    if utterance.contains("time") {
        return Intent::Time;
    }
    if ["thank", "thanks"].iter().any(|t| lowered.contains(t)) {
        return Intent::Gratitude;
    }
    if ["exit", "close"].iter().any(|t| lowered.contains(t)) {
        return Intent::Exit;
    }
    if utterance == ERROR_SENTINEL {
        return Intent::CaptureError;
    }
    Intent::Generative
}

/// Drop an echoed prompt prefix from a model continuation and trim the rest.
///
/// Completion-style models echo the prompt back; chat models usually do not.
/// Stripping only when the prefix is actually present handles both.
pub fn strip_prompt_echo(prompt: &str, completion: &str) -> String {
    completion
        .strip_prefix(prompt)
        .unwrap_or(completion)
        .trim()
        .to_string()
}

fn pick(set: &[&str], rng: &mut impl Rng) -> String {
    set.choose(rng)
        .map(|s| s.to_string())
        .unwrap_or_default()
}
