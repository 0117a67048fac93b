pub mod ollama;
pub mod openai;

use async_trait::async_trait;
use log::info;
use reqwest::Client as HttpClient;
use reqwest::header::HeaderMap;
use serde::{ Deserialize, Serialize };
use std::sync::Arc;
use std::time::Duration;
use super::{ LlmConfig, LlmType };
use self::ollama::OllamaClient;
use self::openai::OpenAIChatClient;
use crate::error::{ ChatError, Result };
use crate::models::chat::{ ChatMessage, Role };

/// A completion provider: turns a message history into one assistant reply.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage], model: &str) -> Result<ChatMessage>;

    fn get_model(&self) -> String;
    fn get_base_url(&self) -> Option<String>;
}

/// `{role, content}` pair as both OpenAI-style and Ollama chat endpoints expect it.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub(crate) struct ApiMessage {
    pub role: String,
    pub content: String,
}

impl From<&ChatMessage> for ApiMessage {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            role: msg.role.as_str().to_string(),
            content: msg.content.clone(),
        }
    }
}

pub(crate) fn to_api_messages(messages: &[ChatMessage]) -> Vec<ApiMessage> {
    messages.iter().map(ApiMessage::from).collect()
}

/// Whatever role the provider echoes back, the ledger records an assistant turn.
pub(crate) fn assistant_reply(content: String) -> ChatMessage {
    ChatMessage::new(Role::Assistant, content)
}

pub(crate) fn build_http_client(
    headers: HeaderMap,
    timeout: Option<Duration>
) -> Result<HttpClient> {
    let mut builder = HttpClient::builder().default_headers(headers);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().map_err(|e| ChatError::Configuration(format!("Failed to build HTTP client: {}", e)))
}

pub fn new_client(config: &LlmConfig) -> Result<Arc<dyn ChatClient>> {
    let client: Arc<dyn ChatClient> = match config.llm_type {
        LlmType::Ollama => {
            let specific_client = OllamaClient::from_config(config)?;
            Arc::new(specific_client)
        }
        LlmType::OpenAI | LlmType::Groq | LlmType::XAI => {
            let specific_client = OpenAIChatClient::from_config(config)?;
            Arc::new(specific_client)
        }
    };
    info!(
        "Chat client configured: Type={}, Model={}, BaseURL={:?}",
        config.llm_type,
        client.get_model(),
        client.get_base_url()
    );
    Ok(client)
}
