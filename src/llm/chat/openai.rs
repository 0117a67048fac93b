use async_trait::async_trait;
use log::{ debug, error };
use reqwest::{ Client as HttpClient, header::{ HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION } };
use serde::{ Deserialize, Serialize };
use std::time::Duration;

use super::{ ApiMessage, ChatClient, assistant_reply, build_http_client, to_api_messages };
use crate::error::{ ChatError, Result };
use crate::llm::{ LlmConfig, LlmType };
use crate::models::chat::ChatMessage;

/// Client for any provider speaking the OpenAI chat-completions wire format
/// (OpenAI itself, Groq, xAI).
pub struct OpenAIChatClient {
    http: HttpClient,
    model: String,
    base_url: String,
    temperature: f32,
}

#[derive(Serialize)]
struct OpenAIChatRequest {
    model: String,
    messages: Vec<ApiMessage>,
    temperature: f32,
}

#[derive(Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
}

#[derive(Deserialize)]
struct OpenAIChoice {
    message: ApiMessage,
}

fn defaults_for(llm_type: LlmType) -> (&'static str, &'static str) {
    match llm_type {
        LlmType::Groq => ("https://api.groq.com/openai", "llama-3.1-8b-instant"),
        LlmType::XAI => ("https://api.x.ai", "grok-2-latest"),
        _ => ("https://api.openai.com", "gpt-4o"),
    }
}

impl OpenAIChatClient {
    pub fn new(
        api_key: String,
        model: String,
        base_url: String,
        temperature: f32,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|e| ChatError::Configuration(format!("Invalid API key format: {}", e)))?
        );

        Ok(Self {
            http: build_http_client(headers, timeout)?,
            model,
            base_url,
            temperature,
        })
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let api_key = config.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ChatError::Configuration(
                format!("{} API key is required (set CHAT_API_KEY)", config.llm_type)
            ))?;

        let (default_url, default_model) = defaults_for(config.llm_type);
        Self::new(
            api_key,
            config.completion_model.clone().unwrap_or_else(|| default_model.to_string()),
            config.base_url.clone().unwrap_or_else(|| default_url.to_string()),
            config.temperature,
            config.timeout,
        )
    }

    fn endpoint(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if base.ends_with("/chat/completions") {
            base.to_string()
        } else {
            format!("{}/v1/chat/completions", base)
        }
    }
}

#[async_trait]
impl ChatClient for OpenAIChatClient {
    async fn complete(&self, messages: &[ChatMessage], model: &str) -> Result<ChatMessage> {
        let url = self.endpoint();
        let req = OpenAIChatRequest {
            model: model.to_string(),
            messages: to_api_messages(messages),
            temperature: self.temperature,
        };
        debug!("POST {} with {} message(s)", url, req.messages.len());

        let resp = self.http.post(&url)
            .json(&req)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| {
                error!("Chat completion request to {} failed: {}", url, e);
                ChatError::from(e)
            })?
            .json::<OpenAIResponse>()
            .await?;

        let content = resp.choices
            .into_iter()
            .next()
            .ok_or_else(|| ChatError::Upstream("No choices in completion response".to_string()))?
            .message.content;

        Ok(assistant_reply(content))
    }

    fn get_model(&self) -> String {
        self.model.clone()
    }

    fn get_base_url(&self) -> Option<String> {
        Some(self.base_url.clone())
    }
}
