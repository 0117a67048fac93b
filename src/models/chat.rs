use chrono::Utc;
use serde::{ Serialize, Deserialize };
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub timestamp: i64,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now().timestamp(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Derived from the history: a conversation is only `Active` once its last
/// message is an assistant reply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationStatus {
    AwaitingReply,
    Active,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub messages: Vec<ChatMessage>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Conversation {
    pub fn new(id: String, initial: ChatMessage) -> Self {
        let now = Utc::now().timestamp();
        Self {
            id,
            messages: vec![initial],
            created_at: now,
            updated_at: now,
        }
    }

    pub fn status(&self) -> ConversationStatus {
        match self.messages.last() {
            Some(msg) if msg.role == Role::Assistant => ConversationStatus::Active,
            _ => ConversationStatus::AwaitingReply,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&ChatMessage::assistant("hi")).unwrap();
        assert!(json.contains("\"role\":\"assistant\""));
        assert_eq!(Role::User.to_string(), "user");
    }

    #[test]
    fn status_follows_last_message() {
        let mut conversation = Conversation::new("c1".into(), ChatMessage::user("hi"));
        assert_eq!(conversation.status(), ConversationStatus::AwaitingReply);

        conversation.messages.push(ChatMessage::assistant("hello"));
        assert_eq!(conversation.status(), ConversationStatus::Active);
    }
}
