//! Error types for the mock GraphQL layer
//!
//! # Error Categories
//!
//! - **Not found**: a by-id lookup missed the fixture store (`NOT_FOUND`)
//! - **Simulated**: failure injected by the error simulation settings (`MOCK_ERROR`)
//! - **Unresolvable operation**: no operation could be derived from a request
//! - **Invalid request**: the schema rejected the document or its variables
//!
//! # GraphQL Integration
//!
//! Errors are converted to GraphQL errors carrying `extensions.code` with the
//! [`ToGraphQLError`] trait.
//!
//! ## Using in Functions
//!
//! ```rust
//! use agreement_mock::errors::{MockError, MockResult};
//!
//! fn find_client(id: &str) -> MockResult<String> {
//!     if id.is_empty() {
//!         return Err(MockError::not_found("Client", id));
//!     }
//!     Ok(id.to_string())
//! }
//! ```

pub mod common;
pub mod mock;

pub use common::{ResultExt, ToGraphQLError};
pub use mock::MockError;

/// Result type alias for resolver and transport operations
pub type MockResult<T> = Result<T, MockError>;
