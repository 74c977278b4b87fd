//! Middleware for semroute pipelines.
//!
//! The chain machinery lives in [`layer`]; the layers here are the ambient
//! stages a versioned service typically mounts around its routes: request
//! correlation, request logging, and deferred advertising of the
//! negotiated version.

mod layer;
mod request_id;
mod tracing_layer;
mod version_header;

pub use layer::{BoxFuture, Middleware, MiddlewareStack, Next};
pub use request_id::{RequestId, RequestIdLayer};
pub use tracing_layer::TracingLayer;
pub use version_header::VersionHeaderLayer;
