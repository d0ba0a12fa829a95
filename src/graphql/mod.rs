pub mod context;
pub mod mutations;
pub mod queries;
pub mod schema;

pub use context::*;
pub use schema::*;
