//! Conversation Orchestrator — one stateless question/answer exchange.
//!
//! Message order sent to the provider: system instruction, caller history,
//! then the composed prompt as the last user turn. The returned history stores
//! the raw user message, not the composed prompt.

use tracing::info;

use crate::chat::composer::compose;
use crate::chat::models::{ConversationTurn, Role};
use crate::chat::prompts::system_instruction;
use crate::config::Config;
use crate::llm_client::{CompletionProvider, LlmError, SamplingParams};
use crate::retrieval::index::DEFAULT_TOP_K;
use crate::startup::ReadyState;

/// Per-process chat settings derived from configuration.
#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub subject: String,
    pub top_k: usize,
    pub sampling: SamplingParams,
    pub max_history_turns: usize,
    pub max_turn_chars: usize,
}

impl From<&Config> for ChatSettings {
    fn from(config: &Config) -> Self {
        Self {
            subject: config.subject_name.clone(),
            top_k: config.retrieval_top_k,
            sampling: SamplingParams::default(),
            max_history_turns: config.max_history_turns,
            max_turn_chars: config.max_turn_chars,
        }
    }
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            subject: "Mathieu".to_string(),
            top_k: DEFAULT_TOP_K,
            sampling: SamplingParams::default(),
            max_history_turns: 40,
            max_turn_chars: 4000,
        }
    }
}

/// Result of a successful exchange.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub reply: String,
    pub history: Vec<ConversationTurn>,
}

/// Runs one exchange. `history` is borrowed, so a provider failure leaves the
/// caller's copy untouched and nothing partial is returned.
pub async fn respond(
    user_message: &str,
    history: &[ConversationTurn],
    knowledge: Option<&ReadyState>,
    llm: &dyn CompletionProvider,
    settings: &ChatSettings,
) -> Result<Exchange, LlmError> {
    let prompt = compose(user_message, knowledge, &settings.subject, settings.top_k).await;

    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ConversationTurn::new(
        Role::System,
        system_instruction(&settings.subject),
    ));
    messages.extend_from_slice(history);
    messages.push(ConversationTurn::new(Role::User, prompt));

    let reply = llm.complete(&messages, &settings.sampling).await?;
    let reply = reply.trim().to_string();

    info!(
        history_turns = history.len(),
        reply_chars = reply.len(),
        "chat exchange completed"
    );

    let mut new_history = Vec::with_capacity(history.len() + 2);
    new_history.extend_from_slice(history);
    new_history.push(ConversationTurn::new(Role::User, user_message));
    new_history.push(ConversationTurn::new(Role::Assistant, reply.clone()));

    Ok(Exchange {
        reply,
        history: new_history,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::prompts::NO_MATCHES_DISCLAIMER;
    use crate::test_support::{ready_state, ScriptedCompletion};

    fn prior_history() -> Vec<ConversationTurn> {
        vec![
            ConversationTurn::new(Role::User, "Where does Mathieu live?"),
            ConversationTurn::new(Role::Assistant, "In Paris."),
        ]
    }

    #[tokio::test]
    async fn test_history_grows_by_exactly_two_turns() {
        let llm = ScriptedCompletion::replying("  He knows Go.  ");
        let history = prior_history();

        let exchange = respond("Does he know Go?", &history, None, &llm, &ChatSettings::default())
            .await
            .unwrap();

        assert_eq!(exchange.reply, "He knows Go.");
        assert_eq!(exchange.history.len(), history.len() + 2);
        assert_eq!(&exchange.history[..history.len()], &history[..]);
        assert_eq!(
            exchange.history[2],
            ConversationTurn::new(Role::User, "Does he know Go?")
        );
        assert_eq!(
            exchange.history[3],
            ConversationTurn::new(Role::Assistant, "He knows Go.")
        );
    }

    #[tokio::test]
    async fn test_message_sequence_layout() {
        let ready = ready_state(&[("What languages does Mathieu know?", "Python, JavaScript, Go.")]).await;
        let llm = ScriptedCompletion::replying("Python, JavaScript and Go.");
        let history = prior_history();

        respond(
            "What programming languages?",
            &history,
            Some(&ready),
            &llm,
            &ChatSettings::default(),
        )
        .await
        .unwrap();

        let sent = llm.last_messages();
        assert_eq!(sent.len(), history.len() + 2);
        assert_eq!(sent[0].role, Role::System);
        assert!(sent[0].content.contains("Mathieu's CV"));
        assert_eq!(&sent[1..3], &history[..]);

        let last = sent.last().unwrap();
        assert_eq!(last.role, Role::User);
        assert!(last
            .content
            .contains("Q: What languages does Mathieu know?\nA: Python, JavaScript, Go."));
        assert!(last.content.ends_with("Question: What programming languages?\nAnswer:"));
    }

    #[tokio::test]
    async fn test_not_ready_still_answers_with_fallback_prompt() {
        let llm = ScriptedCompletion::replying("Hello!");

        let exchange = respond("Hi", &[], None, &llm, &ChatSettings::default())
            .await
            .unwrap();

        assert_eq!(exchange.reply, "Hello!");
        assert!(llm.last_messages()[1].content.contains(NO_MATCHES_DISCLAIMER));
    }

    #[tokio::test]
    async fn test_provider_failure_leaves_history_untouched() {
        let llm = ScriptedCompletion::failing();
        let history = prior_history();
        let before = history.clone();

        let result = respond("Anything?", &history, None, &llm, &ChatSettings::default()).await;

        assert!(result.is_err());
        assert_eq!(history, before);
        assert_eq!(llm.received().len(), 1);
    }

    #[test]
    fn test_settings_from_config() {
        let settings = ChatSettings::from(&Config::for_tests());
        assert_eq!(settings.subject, "Mathieu");
        assert_eq!(settings.top_k, 3);
        assert_eq!(settings.max_history_turns, 4);
        assert_eq!(settings.sampling, SamplingParams::default());
    }
}
