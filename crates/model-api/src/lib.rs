//! Model jobs REST API: router, error envelope, and server configuration.

pub mod config;
pub mod error;
pub mod server;
