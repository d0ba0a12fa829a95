//! Conversion of domain errors into GraphQL errors
//!
//! Resolvers return `async_graphql::Result`, so service errors are converted
//! with structured `extensions.code` values on the way out.

use async_graphql::{Error as GraphQLError, ErrorExtensions};

use super::MockError;

/// Convert domain errors to GraphQL errors with error codes
pub trait ToGraphQLError {
    /// Convert to GraphQL error with structured extensions
    fn to_graphql_error(&self) -> GraphQLError;
}

impl ToGraphQLError for MockError {
    fn to_graphql_error(&self) -> GraphQLError {
        let code = self.error_code().to_string();
        let message = self.to_string();

        GraphQLError::new(message).extend_with(|_, e| {
            e.set("code", code.as_str());

            if let MockError::NotFound { resource, id } = self {
                e.set("resource", resource.as_str());
                e.set("id", id.as_str());
            }
        })
    }
}

/// Extension trait for Result<T, MockError> to convert errors to GraphQL errors
pub trait ResultExt<T> {
    /// Convert error to GraphQL error
    fn to_graphql_result(self) -> Result<T, GraphQLError>;
}

impl<T> ResultExt<T> for Result<T, MockError> {
    fn to_graphql_result(self) -> Result<T, GraphQLError> {
        self.map_err(|e| e.to_graphql_error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_to_graphql() {
        let err = MockError::not_found("Agreement", "AGR404");
        let graphql_err = err.to_graphql_error();

        assert!(graphql_err.message.contains("AGR404"));
        let extensions = serde_json::to_value(&graphql_err.extensions).unwrap();
        assert_eq!(extensions["code"], "NOT_FOUND");
        assert_eq!(extensions["resource"], "Agreement");
    }

    #[test]
    fn test_result_ext() {
        let result: Result<i32, MockError> = Err(MockError::Simulated("boom".to_string()));
        let graphql_result = result.to_graphql_result();

        assert!(graphql_result.is_err());
    }
}
