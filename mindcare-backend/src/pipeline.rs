//! Submission pipeline: user text in, display text out

use crate::ai::CompletionProvider;
use crate::error::GroupChatResult;
use crate::group_chat::{Conversation, GroupChat, GroupChatConfig, Roster, extract_response};
use std::sync::Arc;

pub const ERROR_PREFIX: &str = "⚠️ Error: ";

/// Shared across requests. Holds no conversation state; every submission
/// gets its own [`GroupChat`].
#[derive(Clone)]
pub struct ChatPipeline {
    provider: Arc<dyn CompletionProvider>,
    roster: Roster,
    config: GroupChatConfig,
}

impl ChatPipeline {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        roster: Roster,
        config: GroupChatConfig,
    ) -> Self {
        Self {
            provider,
            roster,
            config,
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Run the group chat for `user_text` and return the raw conversation
    pub async fn run(&self, user_text: &str) -> GroupChatResult<Conversation> {
        let mut chat = GroupChat::new(self.roster.clone(), self.config.clone());
        chat.run(user_text, self.provider.as_ref()).await?;
        Ok(chat.into_conversation())
    }

    /// Run a submission end to end. Never fails: errors come back as an
    /// error-prefixed string.
    pub async fn submit(&self, user_text: &str) -> String {
        log::debug!("[PIPELINE] Submission: {}", user_text);

        match self.run(user_text).await {
            Ok(conversation) => {
                log::info!("[PIPELINE] Conversation finished with {} turns", conversation.len());
                extract_response(conversation.turns(), &self.roster)
            }
            Err(e) => {
                log::error!("[PIPELINE] Submission failed: {}", e);
                format!("{}{}", ERROR_PREFIX, e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::testing::{Reply, ScriptedProvider};
    use crate::error::ProviderError;
    use crate::group_chat::Turn;
    use async_trait::async_trait;
    use std::time::Duration;

    /// Replies with the seed text after a short pause, so concurrent runs
    /// interleave
    struct EchoSeedProvider;

    #[async_trait]
    impl CompletionProvider for EchoSeedProvider {
        async fn complete(
            &self,
            _role_prompt: &str,
            context: &[Turn],
            _speaker: &str,
        ) -> Result<String, ProviderError> {
            tokio::time::sleep(Duration::from_millis(10)).await;
            Ok(context.first().map(|t| t.text.clone()).unwrap_or_default())
        }
    }

    fn pipeline(provider: Arc<ScriptedProvider>) -> ChatPipeline {
        ChatPipeline::new(provider, Roster::mental_health(), GroupChatConfig::default())
    }

    #[tokio::test]
    async fn test_anxious_and_tired_scenario() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Reply::text("You seem anxious and drained."),
            Reply::text("Try box breathing before bed."),
        ]));
        let output = pipeline(provider.clone()).submit("anxious and tired").await;

        assert_eq!(
            output,
            "**emotion_analysis**: You seem anxious and drained.\n---\n**therapy_recommendation**: Try box breathing before bed."
        );

        let calls = provider.calls();
        assert_eq!(
            calls[0].context[0].text,
            "I have been feeling anxious and tired. Can you help?"
        );
        assert_eq!(calls[0].context[0].speaker, "patient");
    }

    #[tokio::test]
    async fn test_provider_failure_on_first_call() {
        let provider = Arc::new(ScriptedProvider::new(vec![Reply::fail()]));
        let output = pipeline(provider).submit("stressed").await;

        assert!(output.starts_with(ERROR_PREFIX));
        assert!(output.contains("connection refused"));
        assert!(!output.contains("**"));
    }

    #[tokio::test]
    async fn test_failure_hides_partial_turns() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Reply::text("partial analysis"),
            Reply::fail(),
        ]));
        let output = pipeline(provider).submit("stressed").await;

        assert!(output.starts_with(ERROR_PREFIX));
        assert!(!output.contains("partial analysis"));
    }

    #[tokio::test]
    async fn test_sequential_submissions_are_isolated() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Reply::text("first analysis"),
            Reply::text("first advice"),
            Reply::text("second analysis"),
            Reply::text("second advice"),
        ]));
        let pipeline = pipeline(provider.clone());

        pipeline.submit("lonely").await;
        let second = pipeline.submit("hopeful").await;

        assert!(!second.contains("first"));
        assert!(second.contains("second analysis"));
        let calls = provider.calls();
        assert_eq!(calls[2].context_len, 1);
        assert!(calls[2].context[0].text.contains("hopeful"));
    }

    #[tokio::test]
    async fn test_output_is_never_empty() {
        let provider = Arc::new(ScriptedProvider::repeating(""));
        let output = pipeline(provider).submit("").await;
        assert_eq!(output, crate::group_chat::NO_RESPONSE);
    }

    #[tokio::test]
    async fn test_concurrent_submissions_are_isolated() {
        let pipeline = ChatPipeline::new(
            Arc::new(EchoSeedProvider),
            Roster::mental_health(),
            GroupChatConfig::default(),
        );

        let (first, second) = tokio::join!(pipeline.submit("AAA"), pipeline.submit("BBB"));

        assert!(first.contains("I have been feeling AAA. Can you help?"));
        assert!(!first.contains("BBB"));
        assert_eq!(first.matches("\n---\n").count(), 1);

        assert!(second.contains("I have been feeling BBB. Can you help?"));
        assert!(!second.contains("AAA"));
        assert_eq!(second.matches("\n---\n").count(), 1);
    }
}
