use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One message in a conversation. Serializes in the chat-completions wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub conversation_history: Vec<ConversationTurn>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub response: String,
    pub conversation_history: Vec<ConversationTurn>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_defaults_to_empty() {
        let req: ChatRequest = serde_json::from_str(r#"{"message": "Hi"}"#).unwrap();
        assert_eq!(req.message, "Hi");
        assert!(req.conversation_history.is_empty());
    }

    #[test]
    fn test_request_reads_camel_case_history() {
        let req: ChatRequest = serde_json::from_str(
            r#"{"message": "And Go?", "conversationHistory": [
                {"role": "user", "content": "Rust?"},
                {"role": "assistant", "content": "Yes."}
            ]}"#,
        )
        .unwrap();
        assert_eq!(
            req.conversation_history,
            vec![
                ConversationTurn::new(Role::User, "Rust?"),
                ConversationTurn::new(Role::Assistant, "Yes."),
            ]
        );
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let parsed = serde_json::from_str::<ConversationTurn>(r#"{"role": "tool", "content": "x"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_response_uses_camel_case() {
        let body = serde_json::to_value(ChatResponse {
            response: "ok".to_string(),
            conversation_history: vec![],
        })
        .unwrap();
        assert!(body.get("conversationHistory").is_some());
    }
}
