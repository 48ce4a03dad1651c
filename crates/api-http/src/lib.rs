//! HTTP Gateway Layer
//!
//! JSON endpoints for job submission and introspection:
//! `POST /enqueue`, `GET /metrics`, `GET /health`.

pub mod error;
pub mod handler;
pub mod server;
pub mod types;

pub use handler::HttpHandler;
pub use server::{router, HttpServer, HttpServerConfig};
