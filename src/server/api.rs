use crate::server::schema::{ build_schema, ChatSchema };
use crate::service::ConversationService;
use async_graphql::http::GraphiQLSource;
use async_graphql_axum::GraphQL;
use axum::{
    routing::get,
    Router,
    extract::State,
    response::{ Html, IntoResponse },
    Json,
};
use serde::Serialize;
use tower_http::cors::{ Any, CorsLayer };

pub const GRAPHQL_PATH: &str = "/graphql";

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub conversations: usize,
}

#[derive(Clone)]
struct AppState {
    service: ConversationService,
}

pub fn create_router(service: ConversationService) -> Router {
    let schema: ChatSchema = build_schema(service.clone());
    let app_state = AppState { service };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(GRAPHQL_PATH, get(graphiql_handler).post_service(GraphQL::new(schema)))
        .route("/health", get(health_handler))
        .layer(cors)
        .with_state(app_state)
}

async fn graphiql_handler() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint(GRAPHQL_PATH).finish())
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".into(),
        conversations: state.service.ledger().len().await,
    })
}
