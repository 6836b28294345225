//! Round-robin turn scheduler

use super::types::{ChatState, Conversation, GroupChatConfig, Participant, Roster, Turn};
use crate::ai::CompletionProvider;
use crate::error::{GroupChatError, GroupChatResult};

/// One group chat run: a conversation, its lifecycle state, and a cursor into
/// the roster's speaker list
pub struct GroupChat {
    roster: Roster,
    config: GroupChatConfig,
    conversation: Conversation,
    state: ChatState,
    cursor: usize,
}

impl GroupChat {
    pub fn new(roster: Roster, config: GroupChatConfig) -> Self {
        Self {
            roster,
            config,
            conversation: Conversation::new(),
            state: ChatState::Idle,
            cursor: 0,
        }
    }

    pub fn state(&self) -> ChatState {
        self.state
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn into_conversation(self) -> Conversation {
        self.conversation
    }

    /// Clear the conversation and seed it with the initiator's message
    pub fn start(&mut self, input: &str) {
        self.conversation.clear();
        self.cursor = 0;

        let seed = Turn::new(
            self.roster.initiator().name.clone(),
            self.config.seed_message(input),
        );
        log::debug!("[GROUP_CHAT] Seed from {}: {}", seed.speaker, seed.text);
        self.conversation.push(seed);

        self.state = if self.rounds_exhausted() {
            ChatState::Done
        } else {
            ChatState::Running
        };
        log::info!(
            "[GROUP_CHAT] Started with {} speakers, max {} rounds",
            self.roster.speakers().len(),
            self.config.max_rounds
        );
    }

    /// The participant the cursor points at
    pub fn next_speaker(&self) -> &Participant {
        let speakers = self.roster.speakers();
        &speakers[self.cursor % speakers.len()]
    }

    /// Run one scheduling step. Returns the appended turn, or `None` when the
    /// chat is not running.
    pub async fn step(
        &mut self,
        provider: &dyn CompletionProvider,
    ) -> GroupChatResult<Option<Turn>> {
        if self.state != ChatState::Running {
            return Ok(None);
        }

        let speaker = self.next_speaker().clone();
        log::debug!(
            "[GROUP_CHAT] Turn {} → {}",
            self.conversation.len(),
            speaker.name
        );

        let result = provider
            .complete(&speaker.role_prompt, self.conversation.turns(), &speaker.name)
            .await;
        let text = match result {
            Ok(text) => text,
            Err(e) => {
                self.abort(&e.to_string());
                return Err(e.into());
            }
        };

        let turn = Turn::new(speaker.name, text);
        if let Err(e) = self.append(turn.clone()) {
            self.abort(&e.to_string());
            return Err(e);
        }

        self.cursor = (self.cursor + 1) % self.roster.speakers().len();
        if self.rounds_exhausted() {
            log::info!(
                "[GROUP_CHAT] Done after {} turns",
                self.conversation.len()
            );
            self.state = ChatState::Done;
        }

        Ok(Some(turn))
    }

    /// Start a run for `input` and drive it until the round cap
    pub async fn run(
        &mut self,
        input: &str,
        provider: &dyn CompletionProvider,
    ) -> GroupChatResult<&Conversation> {
        self.start(input);
        while self.state == ChatState::Running {
            self.step(provider).await?;
        }

        if self.conversation.is_empty() {
            return Err(GroupChatError::EmptyConversation);
        }
        Ok(&self.conversation)
    }

    fn append(&mut self, turn: Turn) -> GroupChatResult<()> {
        if self.roster.get(&turn.speaker).is_none() {
            return Err(GroupChatError::MalformedTurn(format!(
                "unknown speaker '{}'",
                turn.speaker
            )));
        }
        self.conversation.push(turn);
        Ok(())
    }

    /// Drop partial turns and fall back to idle
    fn abort(&mut self, reason: &str) {
        log::warn!(
            "[GROUP_CHAT] Aborting run after {} turns: {}",
            self.conversation.len(),
            reason
        );
        self.conversation.clear();
        self.cursor = 0;
        self.state = ChatState::Idle;
    }

    fn rounds_exhausted(&self) -> bool {
        self.conversation.len() >= self.config.max_rounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::testing::{Reply, ScriptedProvider};
    use crate::group_chat::types::{EMOTION_ANALYSIS, PATIENT, THERAPY_RECOMMENDATION};

    fn chat(max_rounds: usize) -> GroupChat {
        GroupChat::new(
            Roster::mental_health(),
            GroupChatConfig {
                max_rounds,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_start_seeds_conversation() {
        let mut chat = chat(3);
        assert_eq!(chat.state(), ChatState::Idle);

        chat.start("anxious and tired");
        assert_eq!(chat.state(), ChatState::Running);
        assert_eq!(chat.conversation().len(), 1);
        let seed = &chat.conversation().turns()[0];
        assert_eq!(seed.speaker, PATIENT);
        assert_eq!(seed.text, "I have been feeling anxious and tired. Can you help?");
        assert_eq!(chat.next_speaker().name, EMOTION_ANALYSIS);
    }

    #[tokio::test]
    async fn test_default_run_produces_two_agent_turns() {
        let provider = ScriptedProvider::new(vec![
            Reply::text("You seem anxious."),
            Reply::text("Try deep breathing."),
        ]);
        let mut chat = chat(3);

        let conversation = chat.run("anxious and tired", &provider).await.unwrap();
        let speakers: Vec<&str> = conversation.turns().iter().map(|t| t.speaker.as_str()).collect();
        assert_eq!(speakers, vec![PATIENT, EMOTION_ANALYSIS, THERAPY_RECOMMENDATION]);
        assert_eq!(chat.state(), ChatState::Done);
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_each_call_sees_full_history() {
        let provider = ScriptedProvider::new(vec![Reply::text("one"), Reply::text("two")]);
        let mut chat = chat(3);
        chat.run("sad", &provider).await.unwrap();

        let calls = provider.calls();
        assert_eq!(calls[0].speaker, EMOTION_ANALYSIS);
        assert_eq!(calls[0].context_len, 1);
        assert!(calls[0].role_prompt.starts_with("You analyze"));
        assert_eq!(calls[1].speaker, THERAPY_RECOMMENDATION);
        assert_eq!(calls[1].context_len, 2);
    }

    #[tokio::test]
    async fn test_round_robin_cycles_speakers() {
        let provider = ScriptedProvider::repeating("ok");
        let mut chat = chat(6);

        let conversation = chat.run("restless", &provider).await.unwrap();
        let speakers: Vec<&str> = conversation.turns().iter().map(|t| t.speaker.as_str()).collect();
        assert_eq!(
            speakers,
            vec![
                PATIENT,
                EMOTION_ANALYSIS,
                THERAPY_RECOMMENDATION,
                EMOTION_ANALYSIS,
                THERAPY_RECOMMENDATION,
                EMOTION_ANALYSIS,
            ]
        );
        assert!(conversation.len() <= 6);
    }

    #[tokio::test]
    async fn test_single_round_is_seed_only() {
        let provider = ScriptedProvider::repeating("unused");
        let mut chat = chat(1);

        let conversation = chat.run("fine", &provider).await.unwrap();
        assert_eq!(conversation.len(), 1);
        assert_eq!(chat.state(), ChatState::Done);
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_provider_failure_discards_partial_turns() {
        let provider = ScriptedProvider::new(vec![Reply::text("partial"), Reply::fail()]);
        let mut chat = chat(3);

        let result = chat.run("overwhelmed", &provider).await;
        assert!(matches!(result, Err(GroupChatError::Provider(_))));
        assert_eq!(chat.state(), ChatState::Idle);
        assert!(chat.conversation().is_empty());
    }

    #[tokio::test]
    async fn test_step_is_noop_when_not_running() {
        let provider = ScriptedProvider::repeating("ok");
        let mut chat = chat(3);
        assert!(chat.step(&provider).await.unwrap().is_none());

        chat.run("ok", &provider).await.unwrap();
        assert!(chat.step(&provider).await.unwrap().is_none());
        assert_eq!(chat.conversation().len(), 3);
    }

    #[test]
    fn test_append_rejects_unknown_speaker() {
        let mut chat = chat(3);
        chat.start("lost");
        let result = chat.append(Turn::new("stranger", "hi"));
        assert!(matches!(result, Err(GroupChatError::MalformedTurn(_))));
        assert_eq!(chat.conversation().len(), 1);
    }

    #[tokio::test]
    async fn test_restart_clears_previous_run() {
        let provider = ScriptedProvider::repeating("reply");
        let mut chat = chat(3);
        chat.run("first", &provider).await.unwrap();
        chat.run("second", &provider).await.unwrap();

        let conversation = chat.conversation();
        assert_eq!(conversation.len(), 3);
        assert!(conversation.turns()[0].text.contains("second"));
        assert!(!conversation.turns().iter().any(|t| t.text.contains("first")));
    }
}
