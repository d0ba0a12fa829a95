use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use super::handlers::{graphql, health};
use crate::transport::MockTransport;

#[derive(Clone)]
pub struct AppState {
    pub transport: Arc<MockTransport>,
}

pub fn create_app(transport: Arc<MockTransport>, cors_origin: Option<&str>) -> Result<Router> {
    let state = AppState { transport };

    let cors = match cors_origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(
                origin
                    .parse::<axum::http::HeaderValue>()
                    .with_context(|| format!("invalid CORS origin {}", origin))?,
            )
            .allow_methods(Any)
            .allow_headers(Any),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };

    let app = Router::new()
        .route("/health", get(health::health_check))
        .route(
            "/graphql",
            get(graphql::graphql_playground).post(graphql::graphql_handler),
        )
        .layer(ServiceBuilder::new().layer(cors))
        .with_state(state);

    Ok(app)
}
