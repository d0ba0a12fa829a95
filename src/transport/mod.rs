//! Request/response plumbing between a GraphQL client and the mock.
//!
//! [`GraphQlTransport`] is the seam: [`MockTransport`] answers from the
//! in-memory store, [`HttpTransport`] forwards to a real endpoint. Callers
//! pick one with [`create_transport`] based on [`MockConfig::use_mocks`].

pub mod http_link;
pub mod mock_link;
pub mod response_cache;
pub mod simulation;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::config::MockConfig;
use crate::errors::{MockError, MockResult};
use crate::store::SharedStore;

pub use http_link::HttpTransport;
pub use mock_link::MockTransport;
pub use response_cache::ResponseCache;
pub use simulation::ErrorSimulator;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQlRequest {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
}

impl GraphQlRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn variables(mut self, variables: Value) -> Self {
        self.variables = Some(variables);
        self
    }

    pub fn operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }
}

/// One entry of a GraphQL `errors` array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Map<String, Value>>,
}

impl GraphQlError {
    pub fn code(&self) -> Option<&str> {
        self.extensions.as_ref()?.get("code")?.as_str()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphQlResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<GraphQlError>,
}

impl GraphQlResponse {
    pub fn from_data(data: Value) -> Self {
        Self {
            data: Some(data),
            errors: Vec::new(),
        }
    }

    /// Error envelope: `data` is null and the code sits in `extensions`
    pub fn from_error(error: &MockError) -> Self {
        let mut extensions = Map::new();
        extensions.insert("code".to_string(), json!(error.error_code()));
        if let MockError::NotFound { resource, id } = error {
            extensions.insert("resource".to_string(), json!(resource));
            extensions.insert("id".to_string(), json!(id));
        }

        Self {
            data: None,
            errors: vec![GraphQlError {
                message: error.to_string(),
                extensions: Some(extensions),
            }],
        }
    }

    /// Result of one root field, e.g. `response.field("agreements")`
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.data.as_ref()?.get(name)
    }

    /// First reported error, keeping its code
    pub fn first_error(&self) -> Option<MockError> {
        self.errors.first().map(|error| MockError::Execution {
            code: error
                .code()
                .unwrap_or(crate::errors::mock::INTERNAL_ERROR)
                .to_string(),
            message: error.message.clone(),
        })
    }
}

#[async_trait]
pub trait GraphQlTransport: Send + Sync {
    /// Executes one request. Every request ends in exactly one outcome.
    async fn request(&self, request: GraphQlRequest) -> MockResult<GraphQlResponse>;
}

/// The mock transport over `store` when mocks are enabled, otherwise an HTTP
/// transport posting to `endpoint`.
pub fn create_transport(
    config: MockConfig,
    store: SharedStore,
    endpoint: &str,
) -> MockResult<Arc<dyn GraphQlTransport>> {
    if config.use_mocks {
        Ok(Arc::new(MockTransport::new(store, config)))
    } else {
        Ok(Arc::new(HttpTransport::new(endpoint)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_uses_camel_case_keys() {
        let request = GraphQlRequest::new("{ clients { id } }").operation_name("GetClients");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["operationName"], "GetClients");
        assert!(value.get("variables").is_none());
    }

    #[test]
    fn error_envelope_carries_code() {
        let response = GraphQlResponse::from_error(&MockError::not_found("Agreement", "AGR9"));
        let value = serde_json::to_value(&response).unwrap();

        assert!(value["data"].is_null());
        assert_eq!(value["errors"][0]["extensions"]["code"], "NOT_FOUND");
        assert_eq!(value["errors"][0]["extensions"]["id"], "AGR9");

        let error = response.first_error().unwrap();
        assert!(error.is_not_found());
        assert_eq!(error.to_string(), "Agreement with id AGR9 not found");
    }

    #[test]
    fn errors_without_code_are_internal() {
        let response: GraphQlResponse =
            serde_json::from_value(json!({"data": null, "errors": [{"message": "boom"}]})).unwrap();
        assert_eq!(response.first_error().unwrap().error_code(), "INTERNAL_ERROR");
    }

    #[tokio::test]
    async fn test_create_transport_honours_use_mocks() {
        let store = crate::store::MockStore::seeded().unwrap().into_shared();
        let transport = create_transport(MockConfig::default(), store, "http://unused").unwrap();

        let response = transport
            .request(GraphQlRequest::new("{ clients { id } }"))
            .await
            .unwrap();
        assert_eq!(response.field("clients").unwrap().as_array().unwrap().len(), 5);
    }
}
