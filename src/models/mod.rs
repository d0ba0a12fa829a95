pub mod agreement;
pub mod dashboard;
pub mod inputs;
pub mod modification;
pub mod paging;
pub mod reference;

pub use agreement::*;
pub use dashboard::*;
pub use inputs::*;
pub use modification::*;
pub use paging::*;
pub use reference::*;

use async_graphql::SimpleObject;
use serde::{Deserialize, Serialize};

/// Outcome of a delete mutation
#[derive(SimpleObject, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OperationResult {
    pub success: bool,
    pub message: String,
}

impl OperationResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
