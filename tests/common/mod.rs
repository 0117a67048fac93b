#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chat_ledger::error::{ChatError, Result};
use chat_ledger::ledger::ids::SequentialIds;
use chat_ledger::ledger::ConversationLedger;
use chat_ledger::llm::chat::ChatClient;
use chat_ledger::models::chat::ChatMessage;
use chat_ledger::service::ConversationService;

pub const TEST_MODEL: &str = "test-model";

/// Completion provider double. Replies are taken from a queue; once it is
/// empty every call answers with `reply to: <last user message>`.
#[derive(Default)]
pub struct ScriptedChatClient {
    replies: Mutex<VecDeque<Result<String>>>,
    calls: Mutex<Vec<Vec<ChatMessage>>>,
    delay: Option<Duration>,
}

impl ScriptedChatClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn push_reply(&self, content: &str) {
        self.replies.lock().unwrap().push_back(Ok(content.to_string()));
    }

    pub fn push_failure(&self, message: &str) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Err(ChatError::Upstream(message.to_string())));
    }

    pub fn calls(&self) -> Vec<Vec<ChatMessage>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatClient for ScriptedChatClient {
    async fn complete(&self, messages: &[ChatMessage], model: &str) -> Result<ChatMessage> {
        assert_eq!(model, TEST_MODEL);
        self.calls.lock().unwrap().push(messages.to_vec());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let scripted = self.replies.lock().unwrap().pop_front();
        match scripted {
            Some(Ok(content)) => Ok(ChatMessage::assistant(content)),
            Some(Err(e)) => Err(e),
            None => {
                let last = messages.last().map(|m| m.content.clone()).unwrap_or_default();
                Ok(ChatMessage::assistant(format!("reply to: {}", last)))
            }
        }
    }

    fn get_model(&self) -> String {
        TEST_MODEL.to_string()
    }

    fn get_base_url(&self) -> Option<String> {
        None
    }
}

pub fn new_ledger() -> Arc<ConversationLedger> {
    Arc::new(ConversationLedger::new(Arc::new(SequentialIds::new())))
}

pub fn make_service(client: Arc<ScriptedChatClient>) -> ConversationService {
    ConversationService::new(new_ledger(), client)
}
