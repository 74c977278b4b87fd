//! # semroute core
//!
//! Core library providing semantic-version request negotiation: a
//! pre-sorted table of version-tagged handlers per route, a per-request
//! resolver middleware selecting exactly one of them, and the policy and
//! routing plumbing around both.
//!
//! This crate is not meant to be used directly. Use `semroute` instead.

mod error;
pub mod middleware;
mod negotiate;
mod policy;
mod request;
mod response;
mod router;
mod table;
#[cfg(any(test, feature = "test-utils"))]
mod test_client;

// Public API
pub use error::{ApiError, ConfigError};
pub use middleware::{
    BoxFuture, Middleware, MiddlewareStack, Next, RequestId, RequestIdLayer, TracingLayer,
    VersionHeaderLayer,
};
pub use negotiate::{versioned, ApiVersion, Versioned, VersionedRoute};
pub use policy::{
    VersionConfig, VersionPolicy, DEFAULT_REQUEST_HEADER, DEFAULT_RESPONSE_HEADER,
    DEFAULT_ROUTE_PARAM,
};
pub use request::Request;
pub use response::{IntoResponse, Response};
pub use router::Router;
pub use table::{VersionEntry, VersionHandler, VersionTable};
#[cfg(any(test, feature = "test-utils"))]
pub use test_client::{TestClient, TestRequest, TestResponse};
