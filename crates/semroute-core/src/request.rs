//! Request types for semroute

use http::{request::Parts, Extensions, HeaderMap, Method, Uri};
use std::collections::HashMap;

/// HTTP request wrapper
///
/// Carries the pieces of an incoming request that version negotiation and
/// its handlers need: headers, URI, route captures, and per-request
/// extensions. The body never passes through this crate.
pub struct Request {
    pub(crate) parts: Parts,
    pub(crate) path_params: HashMap<String, String>,
}

impl Request {
    /// Create a new request from parts and the route captures extracted by
    /// the surrounding router.
    pub fn new(parts: Parts, path_params: HashMap<String, String>) -> Self {
        Self { parts, path_params }
    }

    /// Get the HTTP method
    pub fn method(&self) -> &Method {
        &self.parts.method
    }

    /// Get the URI
    pub fn uri(&self) -> &Uri {
        &self.parts.uri
    }

    /// Get the request path
    pub fn path(&self) -> &str {
        self.parts.uri.path()
    }

    /// Get the headers
    pub fn headers(&self) -> &HeaderMap {
        &self.parts.headers
    }

    /// Get a header value as a string, if present and valid UTF-8
    pub fn header(&self, name: impl http::header::AsHeaderName) -> Option<&str> {
        self.parts.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Get request-scoped extensions
    pub fn extensions(&self) -> &Extensions {
        &self.parts.extensions
    }

    /// Get mutable request-scoped extensions
    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.parts.extensions
    }

    /// Get all route captures
    pub fn path_params(&self) -> &HashMap<String, String> {
        &self.path_params
    }

    /// Get a specific route capture
    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.path_params.get(name).map(String::as_str)
    }
}

impl std::fmt::Debug for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.parts.method)
            .field("uri", &self.parts.uri)
            .field("path_params", &self.path_params)
            .finish()
    }
}
