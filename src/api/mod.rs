//! HTTP boundary.
//!
//! Accepts an HL7 ORU upload, screens it against the shared metric table
//! and returns the report as JSON. The router is composable:
//! `app_router()` returns a `Router` that can be mounted on any axum
//! server instance.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use error::ApiError;
pub use router::app_router;
pub use server::{start_server, start_server_on, ApiServer};
pub use types::ApiContext;
