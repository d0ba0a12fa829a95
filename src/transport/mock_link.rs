use std::time::Duration;

use async_graphql::{ServerError, Variables};
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::config::MockConfig;
use crate::errors::mock::{BAD_REQUEST, INTERNAL_ERROR};
use crate::errors::{MockError, MockResult};
use crate::graphql::{build_schema, GraphQLSchema};
use crate::operation::{resolve_operation, Operation};
use crate::store::SharedStore;
use crate::transport::{
    ErrorSimulator, GraphQlRequest, GraphQlResponse, GraphQlTransport, ResponseCache,
};

/// Answers GraphQL requests from the in-memory store.
pub struct MockTransport {
    store: SharedStore,
    schema: GraphQLSchema,
    config: RwLock<MockConfig>,
    simulator: ErrorSimulator,
    cache: ResponseCache,
}

impl MockTransport {
    pub fn new(store: SharedStore, config: MockConfig) -> Self {
        Self {
            schema: build_schema(store.clone()),
            store,
            config: RwLock::new(config.normalized()),
            simulator: ErrorSimulator::new(),
            cache: ResponseCache::new(),
        }
    }

    pub fn with_simulator(mut self, simulator: ErrorSimulator) -> Self {
        self.simulator = simulator;
        self
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    pub fn schema(&self) -> &GraphQLSchema {
        &self.schema
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub async fn config(&self) -> MockConfig {
        self.config.read().await.clone()
    }

    pub async fn set_config(&self, config: MockConfig) {
        *self.config.write().await = config.normalized();
    }

    /// Back to the seed data with an empty cache
    pub async fn reset(&self) {
        self.store.write().await.reset();
        self.cache.clear().await;
        info!("Mock store reset to seed data");
    }

    async fn execute(
        &self,
        request: GraphQlRequest,
        declared_name: Option<String>,
    ) -> MockResult<serde_json::Value> {
        let mut graphql_request = async_graphql::Request::new(request.query);
        if let Some(variables) = request.variables {
            graphql_request = graphql_request.variables(Variables::from_json(variables));
        }
        if let Some(name) = declared_name {
            graphql_request = graphql_request.operation_name(name);
        }

        // Spawned so that a caller dropping the future does not abort a
        // mutation halfway.
        let schema = self.schema.clone();
        let response = tokio::spawn(async move { schema.execute(graphql_request).await })
            .await
            .map_err(|e| MockError::Internal(format!("request handler failed: {}", e)))?;

        if let Some(error) = response.errors.first() {
            return Err(execution_error(error));
        }

        response
            .data
            .into_json()
            .map_err(|e| MockError::Internal(format!("unserializable response: {}", e)))
    }

    async fn after_success(&self, operation: Operation, data: &serde_json::Value, generation: u64) {
        if operation.is_query() {
            self.cache
                .record_if_current(operation, data.clone(), generation)
                .await;
        } else if operation.invalidates_agreements() {
            self.cache.invalidate(&Operation::agreement_derived()).await;
        }
    }
}

#[async_trait]
impl GraphQlTransport for MockTransport {
    async fn request(&self, request: GraphQlRequest) -> MockResult<GraphQlResponse> {
        let resolved = resolve_operation(&request.query, request.operation_name.as_deref())?;
        let operation = resolved.operation;
        let config = self.config().await;
        debug!("Mock request for {}", operation);

        self.simulator.check(operation, &config.error_config)?;

        if config.mock_delay > 0 {
            tokio::time::sleep(Duration::from_millis(config.mock_delay)).await;
        }

        let generation = self.cache.generation().await;
        match self.execute(request, resolved.declared_name).await {
            Ok(data) => {
                let data = keyed_by_field(data, operation, resolved.response_key.as_deref());
                self.after_success(operation, &data, generation).await;
                Ok(GraphQlResponse::from_data(data))
            }
            Err(e) => {
                warn!("{} failed: {} ({})", operation, e, e.error_code());
                Err(e)
            }
        }
    }
}

/// Moves an aliased root field back under the operation's field name.
fn keyed_by_field(
    mut data: serde_json::Value,
    operation: Operation,
    response_key: Option<&str>,
) -> serde_json::Value {
    let field = operation.field_name();
    if let (Some(key), Some(map)) = (response_key, data.as_object_mut()) {
        if key != field {
            if let Some(value) = map.remove(key) {
                map.insert(field.to_string(), value);
            }
        }
    }
    data
}

/// Keeps the resolver's code; schema rejections carry none and have no path.
fn execution_error(error: &ServerError) -> MockError {
    let code = error
        .extensions
        .as_ref()
        .and_then(|extensions| extensions.get("code"))
        .and_then(|value| match value {
            async_graphql::Value::String(code) => Some(code.clone()),
            _ => None,
        });

    let code = match code {
        Some(code) => code,
        None if error.path.is_empty() => BAD_REQUEST.to_string(),
        None => INTERNAL_ERROR.to_string(),
    };

    MockError::Execution {
        code,
        message: error.message.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MockStore;
    use serde_json::json;

    fn transport() -> MockTransport {
        MockTransport::new(
            MockStore::seeded().unwrap().into_shared(),
            MockConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_response_keyed_by_root_field() {
        let response = transport()
            .request(GraphQlRequest::new(
                "query GetAgreement { agreement(id: \"AGR001\") { id status } }",
            ))
            .await
            .unwrap();

        assert_eq!(
            response.data,
            Some(json!({"agreement": {"id": "AGR001", "status": "ACTIVE"}}))
        );
    }

    #[tokio::test]
    async fn test_aliased_root_field_answers_under_field_name() {
        let transport = transport();
        let response = transport
            .request(GraphQlRequest::new("{ list: agreements { total } }"))
            .await
            .unwrap();

        assert_eq!(response.data, Some(json!({"agreements": {"total": 12}})));
        assert_eq!(
            transport.cache().get(Operation::Agreements).await,
            Some(json!({"agreements": {"total": 12}}))
        );
    }

    #[tokio::test]
    async fn test_several_root_fields_leave_store_untouched() {
        let transport = transport();
        transport
            .request(GraphQlRequest::new("{ agreements { total } }"))
            .await
            .unwrap();

        let err = transport
            .request(GraphQlRequest::new(
                r#"mutation {
                    rejectModificationRequest(id: "MR001") { id }
                    createAgreement(input: { clientId: "CLI001", agreementType: "Advisory", startDate: "2025-01-01" }) { id }
                }"#,
            ))
            .await
            .unwrap_err();

        assert_eq!(err.error_code(), "BAD_REQUEST");
        assert_eq!(transport.store().read().await.agreements.len(), 12);
        assert_eq!(
            transport.cache().get(Operation::Agreements).await,
            Some(json!({"agreements": {"total": 12}}))
        );
    }

    #[tokio::test]
    async fn test_not_found_keeps_code() {
        let err = transport()
            .request(GraphQlRequest::new(
                "{ modificationRequest(id: \"MR999\") { id } }",
            ))
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Modification request with id MR999 not found");
    }

    #[tokio::test]
    async fn test_schema_rejection_is_bad_request() {
        let err = transport()
            .request(GraphQlRequest::new("{ agreements(bogus: 1) { total } }"))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_caller_operation_name_not_declared_is_ignored() {
        let request = GraphQlRequest::new("{ clients(limit: 1) { id } }").operation_name("GetClients");
        let response = transport().request(request).await.unwrap();
        assert_eq!(response.field("clients"), Some(&json!([{"id": "CLI001"}])));
    }

    #[tokio::test]
    async fn test_reset_restores_seed_and_clears_cache() {
        let transport = transport();
        transport
            .request(GraphQlRequest::new("mutation { deleteAgreement(id: \"AGR001\") { success } }"))
            .await
            .unwrap();
        transport
            .request(GraphQlRequest::new("{ agreements { total } }"))
            .await
            .unwrap();

        transport.reset().await;

        assert!(transport.cache().is_empty().await);
        assert_eq!(transport.store().read().await.agreements.len(), 12);
    }
}
