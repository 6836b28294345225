//! Group chat types

use crate::error::{GroupChatError, GroupChatResult};
use std::collections::HashSet;

pub const PATIENT: &str = "patient";
pub const EMOTION_ANALYSIS: &str = "emotion_analysis";
pub const THERAPY_RECOMMENDATION: &str = "therapy_recommendation";

/// Seed message template; `{input}` is replaced with the raw user text
pub const DEFAULT_SEED_TEMPLATE: &str = "I have been feeling {input}. Can you help?";

/// A fixed conversational role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub name: String,
    /// Static instruction text sent as the system prompt
    pub role_prompt: String,
    /// Turns by this participant never appear in the displayed response
    pub excluded_from_output: bool,
}

impl Participant {
    pub fn new(name: impl Into<String>, role_prompt: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role_prompt: role_prompt.into(),
            excluded_from_output: false,
        }
    }

    pub fn excluded(mut self) -> Self {
        self.excluded_from_output = true;
        self
    }
}

/// One message produced within a conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub speaker: String,
    pub text: String,
}

impl Turn {
    pub fn new(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            text: text.into(),
        }
    }

    /// True when the turn carries text worth showing
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

/// Ordered, per-run sequence of turns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

/// Scheduler lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChatState {
    #[default]
    Idle,
    Running,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupChatConfig {
    /// Total turns per run, seed message included
    pub max_rounds: usize,
    pub seed_template: String,
}

impl Default for GroupChatConfig {
    fn default() -> Self {
        Self {
            max_rounds: 3,
            seed_template: DEFAULT_SEED_TEMPLATE.to_string(),
        }
    }
}

impl GroupChatConfig {
    pub fn seed_message(&self, input: &str) -> String {
        self.seed_template.replace("{input}", input)
    }
}

/// The initiating participant plus the cyclic list of speakers
#[derive(Debug, Clone)]
pub struct Roster {
    initiator: Participant,
    speakers: Vec<Participant>,
}

impl Roster {
    pub fn new(initiator: Participant, speakers: Vec<Participant>) -> GroupChatResult<Self> {
        if speakers.is_empty() {
            return Err(GroupChatError::InvalidRoster(
                "at least one speaker is required".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for participant in std::iter::once(&initiator).chain(speakers.iter()) {
            if participant.name.trim().is_empty() {
                return Err(GroupChatError::InvalidRoster(
                    "participant names must not be empty".to_string(),
                ));
            }
            if !seen.insert(participant.name.as_str()) {
                return Err(GroupChatError::InvalidRoster(format!(
                    "duplicate participant '{}'",
                    participant.name
                )));
            }
        }

        Ok(Self { initiator, speakers })
    }

    /// Patient opens, emotion analysis then therapy recommendation respond
    pub fn mental_health() -> Self {
        Self {
            initiator: Participant::new(PATIENT, include_str!("prompts/patient.md").trim())
                .excluded(),
            speakers: vec![
                Participant::new(
                    EMOTION_ANALYSIS,
                    include_str!("prompts/emotion_analysis.md").trim(),
                ),
                Participant::new(
                    THERAPY_RECOMMENDATION,
                    include_str!("prompts/therapy_recommendation.md").trim(),
                ),
            ],
        }
    }

    pub fn initiator(&self) -> &Participant {
        &self.initiator
    }

    pub fn speakers(&self) -> &[Participant] {
        &self.speakers
    }

    pub fn get(&self, name: &str) -> Option<&Participant> {
        std::iter::once(&self.initiator)
            .chain(self.speakers.iter())
            .find(|p| p.name == name)
    }

    /// Whether turns by `name` are dropped from the displayed response.
    /// The initiator is always excluded.
    pub fn is_excluded(&self, name: &str) -> bool {
        name == self.initiator.name
            || self.get(name).map(|p| p.excluded_from_output).unwrap_or(false)
    }
}
