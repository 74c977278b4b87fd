//! Request logging middleware
//!
//! Emits one structured event per request with method, path, status,
//! duration, the correlation id (when [`RequestIdLayer`] runs outside this
//! layer), and the negotiated API version (when a versioned route resolved
//! one).

use super::layer::{BoxFuture, Middleware, Next};
use super::request_id::RequestId;
use crate::negotiate::ApiVersion;
use crate::request::Request;
use crate::response::Response;
use std::time::Instant;
use tracing::Level;

/// Middleware logging one event per completed request.
#[derive(Clone)]
pub struct TracingLayer {
    level: Level,
}

impl TracingLayer {
    /// Create the layer logging at INFO
    pub fn new() -> Self {
        Self { level: Level::INFO }
    }

    /// Create the layer logging successes at the given level. Failures are
    /// always logged at WARN.
    pub fn with_level(level: Level) -> Self {
        Self { level }
    }
}

impl Default for TracingLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl Middleware for TracingLayer {
    fn call(&self, req: Request, next: Next) -> BoxFuture<Response> {
        let level = self.level;
        let method = req.method().to_string();
        let path = req.path().to_string();
        let request_id = req
            .extensions()
            .get::<RequestId>()
            .map(|id| id.as_str().to_string());

        Box::pin(async move {
            let start = Instant::now();
            let response = next(req).await;
            let status = response.status();
            let duration_ms = start.elapsed().as_millis() as u64;
            let api_version = response
                .extensions()
                .get::<ApiVersion>()
                .map(|v| v.as_str().to_string());

            let request_id = request_id.as_deref().unwrap_or("-");
            let api_version = api_version.as_deref().unwrap_or("-");

            if status.is_client_error() || status.is_server_error() {
                tracing::warn!(
                    method = %method,
                    path = %path,
                    request_id,
                    api_version,
                    status = status.as_u16(),
                    duration_ms,
                    "request failed"
                );
            } else {
                match level {
                    Level::TRACE => tracing::trace!(
                        method = %method,
                        path = %path,
                        request_id,
                        api_version,
                        status = status.as_u16(),
                        duration_ms,
                        "request completed"
                    ),
                    Level::DEBUG => tracing::debug!(
                        method = %method,
                        path = %path,
                        request_id,
                        api_version,
                        status = status.as_u16(),
                        duration_ms,
                        "request completed"
                    ),
                    _ => tracing::info!(
                        method = %method,
                        path = %path,
                        request_id,
                        api_version,
                        status = status.as_u16(),
                        duration_ms,
                        "request completed"
                    ),
                }
            }

            response
        })
    }

    fn clone_box(&self) -> Box<dyn Middleware> {
        Box::new(self.clone())
    }
}
