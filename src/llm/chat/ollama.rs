use reqwest::Client as HttpClient;
use reqwest::header::{ HeaderMap, HeaderValue, CONTENT_TYPE };
use serde::{ Deserialize, Serialize };
use async_trait::async_trait;
use std::time::Duration;
use super::{ ApiMessage, ChatClient, assistant_reply, build_http_client, to_api_messages };
use crate::error::{ ChatError, Result };
use crate::llm::{ LlmConfig, LlmType };
use crate::models::chat::ChatMessage;
use log::{ debug, error };

#[derive(Debug)]
pub struct OllamaClient {
    http: HttpClient,
    base_url: String,
    completion_model: String,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ApiMessage>,
    stream: bool,
    options: ChatOptions,
}

#[derive(Serialize)]
struct ChatOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ApiMessage,
}

impl OllamaClient {
    pub fn new(
        base_url: Option<String>,
        completion_model: Option<String>,
        temperature: f32,
        timeout: Option<Duration>
    ) -> Result<Self> {
        let model = completion_model.unwrap_or_else(|| "llama3".to_string());
        let url = base_url.unwrap_or_else(|| "http://localhost:11434".into());

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(Self {
            http: build_http_client(headers, timeout)?,
            base_url: url,
            completion_model: model,
            temperature,
        })
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        if config.llm_type != LlmType::Ollama {
            return Err(ChatError::Configuration("Invalid config type for OllamaClient".into()));
        }

        Self::new(
            config.base_url.clone(),
            config.completion_model.clone(),
            config.temperature,
            config.timeout
        )
    }
}

#[async_trait]
impl ChatClient for OllamaClient {
    async fn complete(&self, messages: &[ChatMessage], model: &str) -> Result<ChatMessage> {
        let url = format!("{}/api/chat", self.base_url.trim_end_matches('/'));
        let req = ChatRequest {
            model: model.to_string(),
            messages: to_api_messages(messages),
            stream: false,
            options: ChatOptions { temperature: self.temperature },
        };
        debug!("POST {} with {} message(s)", url, req.messages.len());

        let resp = self.http.post(&url)
            .json(&req)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| {
                error!("Ollama chat request to {} failed: {}", url, e);
                ChatError::from(e)
            })?;
        let data = resp.json::<ChatResponse>().await?;
        Ok(assistant_reply(data.message.content))
    }

    fn get_model(&self) -> String {
        self.completion_model.clone()
    }

    fn get_base_url(&self) -> Option<String> {
        Some(self.base_url.clone())
    }
}
