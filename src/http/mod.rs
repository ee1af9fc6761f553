//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum router, trace + timeout layers)
//!     → auth.rs (static bearer token, when configured)
//!     → GET /metrics → scrape → exposition text
//! ```

pub mod auth;
pub mod server;

pub use server::{AppState, HttpServer};
