use axum::{
    extract::State,
    response::{Html, IntoResponse, Json},
};
use async_graphql::http::{playground_source, GraphQLPlaygroundConfig};

use crate::server::app::AppState;
use crate::transport::{GraphQlRequest, GraphQlResponse, GraphQlTransport};

/// Executes through the mock transport. Failures are returned as GraphQL
/// error envelopes, so the status is always 200.
pub async fn graphql_handler(
    State(state): State<AppState>,
    Json(request): Json<GraphQlRequest>,
) -> Json<GraphQlResponse> {
    tracing::debug!("GraphQL request received");
    let response = match state.transport.request(request).await {
        Ok(response) => response,
        Err(e) => GraphQlResponse::from_error(&e),
    };
    tracing::debug!("GraphQL request completed");
    Json(response)
}

pub async fn graphql_playground() -> impl IntoResponse {
    Html(playground_source(GraphQLPlaygroundConfig::new("/graphql")))
}
