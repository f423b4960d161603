pub mod controllers;
mod error;

pub use controllers::{
    CardController, KnowledgeController, QueryController, TaskController, TaskRegistry,
};
pub use error::ApiError;

use crate::ServerConfig;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

/// Build CORS layer based on security configuration
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION]);

    if config.security.allowed_origins.is_empty() {
        cors.allow_origin(AllowOrigin::any())
    } else {
        let origins: Vec<HeaderValue> =
            config.security.allowed_origins.iter().filter_map(|o| o.parse().ok()).collect();
        cors.allow_origin(origins)
    }
}

/// Create a specialist's task endpoint.
pub fn create_app(config: ServerConfig) -> Router {
    create_app_with_registry(config, Arc::new(TaskRegistry::new()))
}

/// Same as [`create_app`], with a caller-held registry of in-flight tasks.
pub fn create_app_with_registry(config: ServerConfig, registry: Arc<TaskRegistry>) -> Router {
    let card_controller = CardController::new(&config);
    let task_controller = TaskController::new(config.clone(), registry);
    let query_controller = QueryController::new(config.clone());

    let mut app = Router::new()
        .route("/", get(controllers::card::root_status))
        .route("/agent-card", get(controllers::card::get_agent_card))
        .with_state(card_controller)
        .route("/v1/tasks", post(controllers::tasks::create_task))
        .route("/v1/tasks/{task_id}/updates", get(controllers::tasks::task_updates))
        .with_state(task_controller)
        .route("/v1/query", post(controllers::query::query))
        .with_state(query_controller)
        .route("/health", get(health_check));

    if let Some(knowledge_base) = config.knowledge_base.clone() {
        let knowledge_router = Router::new()
            .route("/messages/", post(controllers::knowledge::search_messages))
            .with_state(KnowledgeController::new(knowledge_base));
        app = app.merge(knowledge_router);
    }

    let cors_layer = build_cors_layer(&config);

    app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            // bounds time to first byte; open event streams are unaffected
            .layer(TimeoutLayer::with_status_code(
                axum::http::StatusCode::REQUEST_TIMEOUT,
                config.security.request_timeout,
            ))
            .layer(DefaultBodyLimit::max(config.security.max_body_size))
            .layer(cors_layer)
            .layer(SetResponseHeaderLayer::if_not_present(
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                header::CACHE_CONTROL,
                HeaderValue::from_static("no-cache"),
            )),
    )
}

async fn health_check() -> &'static str {
    "OK"
}
