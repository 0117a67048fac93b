pub mod cli;
pub mod error;
pub mod ledger;
pub mod llm;
pub mod models;
pub mod server;
pub mod service;

use cli::Args;
use ledger::ConversationLedger;
use ledger::ids::new_generator;
use llm::chat::new_client as new_chat_client;
use log::info;
use server::Server;
use service::ConversationService;
use std::error::Error;
use std::sync::Arc;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    let llm_config = args.llm_config()?;
    let id_strategy = args.id_strategy()?;

    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("Chat LLM Type: {}", llm_config.llm_type);
    info!("Chat Base URL: {}", llm_config.base_url.as_deref().unwrap_or("adapter default"));
    info!("Chat Model: {}", llm_config.completion_model.as_deref().unwrap_or("adapter default"));
    info!("Chat Temperature: {}", llm_config.temperature);
    info!("Chat Timeout: {:?}", llm_config.timeout);
    info!("Id Strategy: {}", id_strategy);
    info!("-------------------------");

    let chat_client = new_chat_client(&llm_config)?;
    let ledger = Arc::new(ConversationLedger::new(new_generator(id_strategy)));
    let service = ConversationService::new(ledger, chat_client);

    info!("Starting server on: {}", args.server_addr);
    let server = Server::new(args.server_addr.clone(), service);
    server.run().await?;

    Ok(())
}
