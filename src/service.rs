use crate::error::{ ChatError, Result };
use crate::ledger::ConversationLedger;
use crate::llm::chat::ChatClient;
use crate::models::chat::{ ChatMessage, Conversation, ConversationStatus };

use log::{ error, info, warn };
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationReply {
    pub response: String,
    pub conversation_id: String,
}

/// The create/update/list operations, composing the ledger with a completion
/// provider. Holds no conversation state of its own.
#[derive(Clone)]
pub struct ConversationService {
    ledger: Arc<ConversationLedger>,
    chat_client: Arc<dyn ChatClient>,
    model: String,
}

impl ConversationService {
    pub fn new(ledger: Arc<ConversationLedger>, chat_client: Arc<dyn ChatClient>) -> Self {
        let model = chat_client.get_model();
        Self { ledger, chat_client, model }
    }

    pub fn ledger(&self) -> &Arc<ConversationLedger> {
        &self.ledger
    }

    /// Starts a conversation with `query`. Nothing is stored until the provider
    /// answers; the question and reply then land in the ledger together.
    pub async fn create_conversation(&self, query: &str) -> Result<ConversationReply> {
        let prompt = ChatMessage::user(query);

        let history = [prompt.clone()];
        let reply = self.chat_client.complete(&history, &self.model).await.map_err(|e| {
            error!("Completion failed for new conversation: {}", e);
            e
        })?;

        let response = reply.content.clone();
        let conversation_id = self.ledger.create_with_reply(prompt, reply).await?;
        info!("Conversation {} started", conversation_id);

        Ok(ConversationReply { response, conversation_id })
    }

    /// Continues a conversation. Concurrent calls on the same id are
    /// serialized by the conversation's turn lock. The question and reply are
    /// appended in one write after the provider answers, so a call that fails
    /// or is dropped mid-flight leaves the history as it was.
    pub async fn update_conversation(
        &self,
        conversation_id: &str,
        query: &str
    ) -> Result<ConversationReply> {
        let _turn = self.ledger.begin_turn(conversation_id).await?;
        let conversation = self.ledger.get(conversation_id).await?;
        if conversation.status() != ConversationStatus::Active {
            warn!("Refusing to continue {}: last message is unanswered", conversation_id);
            return Err(ChatError::AwaitingReply(conversation_id.to_string()));
        }
        let mut history = conversation.messages;

        let prompt = ChatMessage::user(query);
        history.push(prompt.clone());

        let reply = self.chat_client.complete(&history, &self.model).await.map_err(|e| {
            error!("Completion failed for conversation {}: {}", conversation_id, e);
            e
        })?;

        let response = reply.content.clone();
        self.ledger.append(conversation_id, vec![prompt, reply]).await?;
        info!("Conversation {} continued ({} messages)", conversation_id, history.len() + 1);

        Ok(ConversationReply {
            response,
            conversation_id: conversation_id.to_string(),
        })
    }

    pub async fn get_conversation(&self, conversation_id: &str) -> Result<Conversation> {
        self.ledger.get(conversation_id).await
    }

    pub async fn get_all_conversations(&self) -> Vec<Conversation> {
        self.ledger.list_all().await
    }
}
