//! Deferred advertising of the negotiated version.
//!
//! The resolver always publishes the selected version into the response's
//! extensions. When routes are registered with `advertise(false)`, this
//! layer performs the header write instead, after downstream processing
//! completes — and only when the header has not already been set by
//! anything closer to the handler.

use super::layer::{BoxFuture, Middleware, Next};
use crate::negotiate::ApiVersion;
use crate::request::Request;
use crate::response::Response;
use http::{HeaderName, HeaderValue};

/// Middleware copying the negotiated version into a response header once
/// the delegated handler has completed.
#[derive(Clone)]
pub struct VersionHeaderLayer {
    header: HeaderName,
}

impl VersionHeaderLayer {
    /// Create the layer writing the default `X-Api-Version` header
    pub fn new() -> Self {
        Self {
            header: HeaderName::from_static("x-api-version"),
        }
    }

    /// Create the layer writing a custom header
    pub fn with_header(header: HeaderName) -> Self {
        Self { header }
    }

    /// The header this layer writes
    pub fn header(&self) -> &HeaderName {
        &self.header
    }
}

impl Default for VersionHeaderLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl Middleware for VersionHeaderLayer {
    fn call(&self, req: Request, next: Next) -> BoxFuture<Response> {
        let header = self.header.clone();
        Box::pin(async move {
            let mut response = next(req).await;
            if response.headers().contains_key(&header) {
                return response;
            }
            let value = response
                .extensions()
                .get::<ApiVersion>()
                .and_then(|v| HeaderValue::from_str(v.as_str()).ok());
            if let Some(value) = value {
                response.headers_mut().insert(header, value);
            }
            response
        })
    }

    fn clone_box(&self) -> Box<dyn Middleware> {
        Box::new(self.clone())
    }
}
