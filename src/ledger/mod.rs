pub mod ids;

use crate::error::{ ChatError, Result };
use crate::models::chat::{ ChatMessage, Conversation };
use chrono::Utc;
use log::{ debug, info, warn };
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{ Mutex, OwnedMutexGuard, RwLock };

use self::ids::IdGenerator;

const MAX_ID_ATTEMPTS: usize = 8;

/// Held for the duration of one update on a conversation.
pub type TurnGuard = OwnedMutexGuard<()>;

struct Entry {
    conversation: Conversation,
    turn: Arc<Mutex<()>>,
}

#[derive(Default)]
struct LedgerState {
    order: Vec<String>,
    entries: HashMap<String, Entry>,
}

/// In-memory store owning every conversation for the life of the process.
///
/// The map itself sits behind one `RwLock`; each entry additionally carries a
/// turn lock so that callers can serialize the read-complete-append cycle of a
/// single conversation without blocking readers or other conversations.
pub struct ConversationLedger {
    state: RwLock<LedgerState>,
    ids: Arc<dyn IdGenerator>,
}

impl ConversationLedger {
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            state: RwLock::new(LedgerState::default()),
            ids,
        }
    }

    pub async fn create(&self, initial: ChatMessage) -> Result<String> {
        self.insert(Conversation::new(String::new(), initial)).await
    }

    /// Inserts a conversation that already holds its first question and answer.
    /// The entry appears in one write, so a caller cancelled before this point
    /// leaves nothing behind.
    pub async fn create_with_reply(
        &self,
        prompt: ChatMessage,
        reply: ChatMessage
    ) -> Result<String> {
        let mut conversation = Conversation::new(String::new(), prompt);
        conversation.messages.push(reply);
        self.insert(conversation).await
    }

    async fn insert(&self, mut conversation: Conversation) -> Result<String> {
        let mut state = self.state.write().await;
        let id = self.fresh_id(&state)?;
        conversation.id = id.clone();

        state.order.push(id.clone());
        state.entries.insert(id.clone(), Entry {
            conversation,
            turn: Arc::new(Mutex::new(())),
        });
        info!("Created conversation {} ({} total)", id, state.order.len());

        Ok(id)
    }

    pub async fn begin_turn(&self, conversation_id: &str) -> Result<TurnGuard> {
        let turn = {
            let state = self.state.read().await;
            state.entries
                .get(conversation_id)
                .map(|entry| Arc::clone(&entry.turn))
                .ok_or_else(|| ChatError::NotFound(conversation_id.to_string()))?
        };

        let guard = Arc::clone(&turn).lock_owned().await;

        // The entry may have been discarded while we waited.
        let state = self.state.read().await;
        match state.entries.get(conversation_id) {
            Some(entry) if Arc::ptr_eq(&entry.turn, &turn) => Ok(guard),
            _ => Err(ChatError::NotFound(conversation_id.to_string())),
        }
    }

    pub async fn append(&self, conversation_id: &str, messages: Vec<ChatMessage>) -> Result<()> {
        let mut state = self.state.write().await;
        let entry = state.entries
            .get_mut(conversation_id)
            .ok_or_else(|| ChatError::NotFound(conversation_id.to_string()))?;

        let added = messages.len();
        entry.conversation.messages.extend(messages);
        entry.conversation.updated_at = Utc::now().timestamp();
        debug!(
            "Appended {} message(s) to {} (now {})",
            added,
            conversation_id,
            entry.conversation.messages.len()
        );
        Ok(())
    }

    pub async fn get(&self, conversation_id: &str) -> Result<Conversation> {
        let state = self.state.read().await;
        state.entries
            .get(conversation_id)
            .map(|entry| entry.conversation.clone())
            .ok_or_else(|| ChatError::NotFound(conversation_id.to_string()))
    }

    /// Every conversation, in creation order.
    pub async fn list_all(&self) -> Vec<Conversation> {
        let state = self.state.read().await;
        state.order
            .iter()
            .filter_map(|id| state.entries.get(id))
            .map(|entry| entry.conversation.clone())
            .collect()
    }

    pub async fn discard(&self, conversation_id: &str) -> Result<()> {
        let mut state = self.state.write().await;
        if state.entries.remove(conversation_id).is_none() {
            return Err(ChatError::NotFound(conversation_id.to_string()));
        }
        state.order.retain(|id| id != conversation_id);
        warn!("Discarded conversation {}", conversation_id);
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn fresh_id(&self, state: &LedgerState) -> Result<String> {
        for attempt in 1..=MAX_ID_ATTEMPTS {
            let candidate = self.ids.next_id();
            if !state.entries.contains_key(&candidate) {
                return Ok(candidate);
            }
            debug!("Id collision on '{}' (attempt {})", candidate, attempt);
        }
        Err(ChatError::IdSpaceExhausted(MAX_ID_ATTEMPTS))
    }
}
