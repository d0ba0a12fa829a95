use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::server::app::AppState;

/// Liveness plus the mock settings currently in force
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let config = state.transport.config().await;

    Json(json!({
        "status": "healthy",
        "service": "agreement-mock",
        "version": env!("CARGO_PKG_VERSION"),
        "mocks": {
            "useMocks": config.use_mocks,
            "mockDelay": config.mock_delay,
            "errorsEnabled": config.error_config.enabled,
            "errorRate": config.error_config.error_rate,
            "cachedResponses": state.transport.cache().len().await,
        }
    }))
}
