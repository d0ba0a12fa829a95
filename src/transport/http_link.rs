use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::errors::{MockError, MockResult};
use crate::transport::{GraphQlRequest, GraphQlResponse, GraphQlTransport};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Forwards requests to a real GraphQL endpoint.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>) -> MockResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| MockError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl GraphQlTransport for HttpTransport {
    async fn request(&self, request: GraphQlRequest) -> MockResult<GraphQlResponse> {
        debug!("POST {} ({:?})", self.endpoint, request.operation_name);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| MockError::Transport(e.to_string()))?;

        let status = response.status();
        // GraphQL servers report failures in the body, often with a 4xx/5xx.
        let envelope: GraphQlResponse = response.json().await.map_err(|e| {
            MockError::Transport(format!("{} returned an unreadable body ({}): {}", self.endpoint, status, e))
        })?;

        if let Some(error) = envelope.first_error() {
            return Err(error);
        }
        if envelope.data.is_none() {
            return Err(MockError::Transport(format!(
                "{} returned no data ({})",
                self.endpoint, status
            )));
        }

        Ok(envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        let transport = HttpTransport::new("http://127.0.0.1:9/graphql").unwrap();
        let err = transport
            .request(GraphQlRequest::new("{ clients { id } }"))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "TRANSPORT_ERROR");
    }
}
