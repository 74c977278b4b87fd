//! Request correlation ids
//!
//! Attaches a fresh v4 id to every request's extensions and echoes it back
//! on the response as `X-Request-Id`.

use super::layer::{BoxFuture, Middleware, Next};
use crate::request::Request;
use crate::response::Response;
use http::{HeaderName, HeaderValue};
use std::sync::Arc;

static X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Correlation id attached by [`RequestIdLayer`].
#[derive(Debug, Clone)]
pub struct RequestId(Arc<str>);

impl RequestId {
    /// The id as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Middleware attaching a correlation id to each request.
#[derive(Clone, Default)]
pub struct RequestIdLayer;

impl RequestIdLayer {
    /// Create the layer
    pub fn new() -> Self {
        Self
    }
}

impl Middleware for RequestIdLayer {
    fn call(&self, mut req: Request, next: Next) -> BoxFuture<Response> {
        let id = RequestId(uuid::Uuid::new_v4().to_string().into());
        req.extensions_mut().insert(id.clone());
        Box::pin(async move {
            let mut response = next(req).await;
            if let Ok(value) = HeaderValue::from_str(id.as_str()) {
                response.headers_mut().insert(X_REQUEST_ID.clone(), value);
            }
            response
        })
    }

    fn clone_box(&self) -> Box<dyn Middleware> {
        Box::new(self.clone())
    }
}
