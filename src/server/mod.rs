pub mod api;
pub mod schema;

use crate::service::ConversationService;
use log::{ info, warn };
use std::error::Error;
use tokio::net::TcpListener;

pub struct Server {
    addr: String,
    service: ConversationService,
}

impl Server {
    pub fn new(addr: String, service: ConversationService) -> Self {
        Self { addr, service }
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let listener = TcpListener::bind(&self.addr).await.map_err(|e|
            format!("Failed to bind server to {}: {}. Try a different address.", self.addr, e)
        )?;
        info!("GraphQL endpoint: http://{}{}", self.addr, api::GRAPHQL_PATH);

        let app = api::create_router(self.service.clone());
        axum::serve(listener, app.into_make_service())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
