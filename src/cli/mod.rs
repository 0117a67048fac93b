use clap::Parser;
use crate::error::ChatError;
use crate::ledger::ids::IdStrategy;
use crate::llm::{ LlmConfig, LlmType };
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Chat LLM Provider Args ---
    /// Type of LLM provider for chat completion (openai, groq, xai, ollama)
    #[arg(long, env = "CHAT_LLM_TYPE", default_value = "openai")]
    pub chat_llm_type: String,

    /// Base URL for the Chat LLM provider API (e.g., http://localhost:11434 for Ollama)
    #[arg(long, env = "CHAT_BASE_URL")] // No default, let adapters handle defaults if None
    pub chat_base_url: Option<String>,

    /// API Key for the Chat LLM provider. Required for every provider except Ollama.
    #[arg(long, env = "CHAT_API_KEY", default_value = "", hide_env_values = true)]
    pub chat_api_key: String,

    /// Model name for chat completion (e.g., gpt-4o, llama3)
    #[arg(long, env = "CHAT_MODEL")] // No default, rely on adapter defaults if None
    pub chat_model: Option<String>,

    /// Sampling temperature sent with every completion request.
    #[arg(long, env = "CHAT_TEMPERATURE", default_value = "0.7")]
    pub chat_temperature: f32,

    /// Per-request timeout for the completion provider, in seconds. Unset means no timeout.
    #[arg(long, env = "CHAT_TIMEOUT_SECS")]
    pub chat_timeout_secs: Option<u64>,

    // --- General App Args ---
    /// Host address and port for the GraphQL server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:4000")]
    pub server_addr: String,

    /// Conversation id strategy (uuid, sequential)
    #[arg(long, env = "ID_STRATEGY", default_value = "uuid")]
    pub id_strategy: String,
}

impl Args {
    pub fn llm_config(&self) -> Result<LlmConfig, ChatError> {
        let llm_type: LlmType = self.chat_llm_type
            .parse()
            .map_err(|e| ChatError::Configuration(format!("{}", e)))?;

        let api_key = Some(self.chat_api_key.trim().to_string()).filter(|k| !k.is_empty());
        if llm_type.requires_api_key() && api_key.is_none() {
            return Err(
                ChatError::Configuration(
                    format!("CHAT_API_KEY must be set for chat provider '{}'", llm_type)
                )
            );
        }

        Ok(LlmConfig {
            llm_type,
            api_key,
            completion_model: self.chat_model.clone().filter(|m| !m.trim().is_empty()),
            base_url: self.chat_base_url.clone().filter(|u| !u.trim().is_empty()),
            temperature: self.chat_temperature,
            timeout: self.chat_timeout_secs.filter(|s| *s > 0).map(Duration::from_secs),
        })
    }

    pub fn id_strategy(&self) -> Result<IdStrategy, ChatError> {
        self.id_strategy.parse().map_err(|e| ChatError::Configuration(format!("{}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        let mut argv = vec!["chat-ledger"];
        argv.extend_from_slice(args);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn missing_key_for_hosted_provider_is_fatal() {
        let args = parse(&["--chat-llm-type", "openai", "--chat-api-key", "  "]);
        assert!(matches!(args.llm_config(), Err(ChatError::Configuration(_))));
    }

    #[test]
    fn ollama_config_without_key() {
        let args = parse(&[
            "--chat-llm-type",
            "ollama",
            "--chat-api-key",
            "",
            "--chat-timeout-secs",
            "30",
        ]);
        let config = args.llm_config().unwrap();
        assert_eq!(config.llm_type, LlmType::Ollama);
        assert_eq!(config.api_key, None);
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn rejects_unknown_id_strategy() {
        let args = parse(&["--chat-api-key", "sk-test", "--id-strategy", "base36"]);
        assert!(matches!(args.id_strategy(), Err(ChatError::Configuration(_))));
        let args = parse(&["--chat-api-key", "sk-test", "--id-strategy", "sequential"]);
        assert_eq!(args.id_strategy().unwrap(), IdStrategy::Sequential);
    }
}
