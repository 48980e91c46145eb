//! # Connector Layer
//!
//! External integrations implementing application interfaces:
//! - Secrets (environment variables, secret files)
//! - Conversation storage (DuckDB, in-memory)
//! - Completion endpoint transport (reqwest)
//! - Invocation triggers (CLI router, HTTP server)

pub mod adapter;
pub mod api;

pub use adapter::*;
pub use api::*;
