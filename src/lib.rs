pub mod config;
pub mod errors;
pub mod graphql;
pub mod models;
pub mod operation;
pub mod services;
pub mod store;
pub mod transport;

#[cfg(feature = "server")]
pub mod server;
