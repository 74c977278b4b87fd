//! Per-request version negotiation.
//!
//! [`versioned()`] collects version-tagged handlers and per-route options;
//! [`Versioned::build`] layers the options over the process-wide
//! [`VersionConfig`], validates everything, and produces a
//! [`VersionedRoute`] — the middleware that, per request, extracts the
//! requested expression, selects exactly one handler from the table, and
//! delegates to it.

use crate::error::{ApiError, ConfigError};
use crate::middleware::{BoxFuture, Middleware, Next};
use crate::policy::{VersionConfig, VersionOptions, VersionPolicy};
use crate::request::Request;
use crate::response::{IntoResponse, Response};
use crate::table::{VersionHandler, VersionTable};
use http::HeaderValue;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// The version selected for a request.
///
/// The resolver inserts this into the request's extensions before
/// delegating (readable by the handler and anything downstream) and into
/// the response's extensions afterwards (readable by outer middleware such
/// as [`VersionHeaderLayer`](crate::middleware::VersionHeaderLayer)).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiVersion(Arc<str>);

impl ApiVersion {
    pub(crate) fn new(tag: Arc<str>) -> Self {
        Self(tag)
    }

    /// The selected version string, exactly as registered
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Start building a versioned handler set.
pub fn versioned() -> Versioned {
    Versioned::new()
}

/// Builder collecting version-tagged handlers and per-route options.
///
/// # Example
///
/// ```rust,ignore
/// let route = versioned()
///     .on("1.0.0", |req: Request, _next: Next| async move { "v1" })
///     .on("2.0.0", |req: Request, _next: Next| async move { "v2" })
///     .fallback_latest(true)
///     .build(&config)?;
/// ```
#[derive(Default)]
pub struct Versioned {
    handlers: HashMap<String, VersionHandler>,
    options: VersionOptions,
}

impl Versioned {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under an exact semantic version.
    ///
    /// Registering the same version twice replaces the earlier handler.
    pub fn on<F, Fut, R>(mut self, version: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse,
    {
        let handler: VersionHandler = Arc::new(move |req, next| {
            let fut = handler(req, next);
            Box::pin(async move { fut.await.into_response() })
        });
        self.handlers.insert(version.into(), handler);
        self
    }

    /// Override the inbound version header name for this route
    pub fn request_header(mut self, name: impl Into<String>) -> Self {
        self.options.request_header = Some(name.into());
        self
    }

    /// Override the outbound advertised-version header name for this route
    pub fn response_header(mut self, name: impl Into<String>) -> Self {
        self.options.response_header = Some(name.into());
        self
    }

    /// Override the route capture name; an empty string disables capture
    /// lookup for this route
    pub fn route_param(mut self, name: impl Into<String>) -> Self {
        self.options.route_param = Some(name.into());
        self
    }

    /// Serve the newest version when nothing satisfies the request
    pub fn fallback_latest(mut self, fallback: bool) -> Self {
        self.options.fallback_latest = Some(fallback);
        self
    }

    /// Substitute this expression when the request carries no version
    /// signal. Mutually exclusive with `fallback_latest`.
    pub fn default_version(mut self, expr: impl Into<String>) -> Self {
        self.options.default_version = Some(expr.into());
        self
    }

    /// Control resolver-side header writing for this route
    pub fn advertise(mut self, advertise: bool) -> Self {
        self.options.advertise = Some(advertise);
        self
    }

    /// Finalize against the process-wide defaults.
    ///
    /// Fails fast on conflicting fallback policies, a malformed header
    /// name, or a version key the engine rejects. Request handling never
    /// revisits any of these conditions.
    pub fn build(self, config: &VersionConfig) -> Result<VersionedRoute, ConfigError> {
        let policy = VersionPolicy::layered(&self.options, config)?;
        let table = VersionTable::new(self.handlers)?;
        Ok(VersionedRoute {
            inner: Arc::new(RouteInner { table, policy }),
        })
    }
}

struct RouteInner {
    table: VersionTable,
    policy: VersionPolicy,
}

/// A version-dispatching route.
///
/// Cheap to clone; the table and policy are built once and shared
/// read-only across every request on the route.
#[derive(Clone)]
pub struct VersionedRoute {
    inner: Arc<RouteInner>,
}

impl VersionedRoute {
    /// The effective policy this route was registered with
    pub fn policy(&self) -> &VersionPolicy {
        &self.inner.policy
    }

    /// The registered version table
    pub fn table(&self) -> &VersionTable {
        &self.inner.table
    }

    /// Resolve and delegate.
    ///
    /// On a miss this terminates the request with 400 and the body
    /// `Version <X> is not supported`, where `<X>` is the expression that
    /// was evaluated (post capture-stripping, post default-substitution),
    /// rendered as `null` when no expression was evaluated at all.
    pub fn call(&self, mut req: Request, next: Next) -> BoxFuture<Response> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let requested = requested_version(&req, &inner.policy);
            let entry = match inner
                .table
                .resolve(requested.as_deref(), inner.policy.fallback_latest)
            {
                Some(entry) => entry,
                None => {
                    let requested = requested.as_deref().unwrap_or("null");
                    tracing::warn!(requested, "no registered version satisfies the request");
                    return ApiError::bad_request(format!(
                        "Version {requested} is not supported"
                    ))
                    .into_response();
                }
            };

            let version = ApiVersion::new(entry.tag().clone());
            tracing::debug!(version = %version, requested = ?requested, "version negotiated");
            req.extensions_mut().insert(version.clone());

            let mut response = (entry.handler)(req, next).await;
            response.extensions_mut().insert(version.clone());

            if inner.policy.advertise
                && !response.headers().contains_key(&inner.policy.response_header)
            {
                if let Ok(value) = HeaderValue::from_str(version.as_str()) {
                    response
                        .headers_mut()
                        .insert(inner.policy.response_header.clone(), value);
                }
            }
            response
        })
    }
}

impl fmt::Debug for VersionedRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VersionedRoute")
            .field("table", &self.inner.table)
            .field("policy", &self.inner.policy)
            .finish()
    }
}

impl Middleware for VersionedRoute {
    fn call(&self, req: Request, next: Next) -> BoxFuture<Response> {
        VersionedRoute::call(self, req, next)
    }

    fn clone_box(&self) -> Box<dyn Middleware> {
        Box::new(self.clone())
    }
}

/// Extract the requested version expression from the request.
///
/// The route capture wins over the header; a single leading non-digit
/// character on a capture is stripped, so a `v1` capture matches as the
/// range `1`. An empty or absent expression falls back to the configured
/// default, if any; otherwise the outcome is "no preference".
fn requested_version(req: &Request, policy: &VersionPolicy) -> Option<String> {
    let mut expr: Option<String> = None;
    if !policy.route_param.is_empty() {
        if let Some(raw) = req.path_param(&policy.route_param) {
            expr = Some(strip_capture_prefix(raw).to_string());
        }
    }
    if expr.is_none() {
        expr = req
            .headers()
            .get(&policy.request_header)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
    }
    if expr.as_deref().map_or(true, str::is_empty) {
        if let Some(default) = &policy.default_version {
            expr = Some(default.clone());
        }
    }
    expr.filter(|e| !e.is_empty())
}

fn strip_capture_prefix(raw: &str) -> &str {
    match raw.chars().next() {
        Some(c) if !c.is_ascii_digit() => &raw[c.len_utf8()..],
        _ => raw,
    }
}
