//! Path registry for versioned routes
//!
//! Routes are registered with `{param}` path patterns; captures are handed
//! to the matched [`VersionedRoute`] so a pattern like `/{version}/todo`
//! can drive negotiation from the path. Conflicting registrations fail at
//! registration time, never at request time.

use crate::error::ApiError;
use crate::middleware::{BoxFuture, Middleware, MiddlewareStack, Next};
use crate::negotiate::VersionedRoute;
use crate::request::Request;
use crate::response::{IntoResponse, Response};
use http::request::Parts;
use matchit::Router as MatchitRouter;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry mapping path patterns to versioned handler sets, plus the
/// middleware stack wrapped around every dispatch.
pub struct Router {
    inner: MatchitRouter<VersionedRoute>,
    paths: Vec<String>,
    layers: MiddlewareStack,
}

impl Router {
    /// Create an empty router
    pub fn new() -> Self {
        Self {
            inner: MatchitRouter::new(),
            paths: Vec::new(),
            layers: MiddlewareStack::new(),
        }
    }

    /// Register a versioned handler set under a path pattern.
    ///
    /// Patterns use `{param}` placeholders, e.g. `/{version}/todo`.
    ///
    /// # Panics
    ///
    /// Panics when the pattern conflicts with an already registered one.
    pub fn route(mut self, path: &str, route: VersionedRoute) -> Self {
        let pattern = convert_path_params(path);
        if let Err(err) = self.inner.insert(pattern, route) {
            panic!("conflicting route registration for `{path}`: {err}");
        }
        self.paths.push(path.to_string());
        self
    }

    /// Wrap every dispatch in a middleware stage.
    ///
    /// Stages run in the order they were added, outermost first.
    pub fn layer(mut self, middleware: impl Middleware) -> Self {
        self.layers.push(Box::new(middleware));
        self
    }

    /// Registered path patterns, in registration order
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// Dispatch a request through the middleware stack into the matched
    /// route. An unmatched path yields 404 without entering the stack's
    /// inner stages.
    pub fn dispatch(&self, parts: Parts) -> BoxFuture<Response> {
        let (route, params) = match self.inner.at(parts.uri.path()) {
            Ok(matched) => {
                let params: HashMap<String, String> = matched
                    .params
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect();
                (matched.value.clone(), params)
            }
            Err(_) => {
                let path = parts.uri.path().to_string();
                return Box::pin(async move {
                    ApiError::not_found(format!("no route for {path}")).into_response()
                });
            }
        };

        let req = Request::new(parts, params);
        let handler: Next = Arc::new(move |req: Request| {
            let terminal: Next = Arc::new(|_req: Request| {
                Box::pin(async { ApiError::not_found("not found").into_response() })
                    as BoxFuture<Response>
            });
            route.call(req, terminal)
        });
        self.layers.execute(req, handler)
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert `{param}` placeholders to the `:param` form matchit expects.
fn convert_path_params(path: &str) -> String {
    let mut result = String::with_capacity(path.len());
    for ch in path.chars() {
        match ch {
            '{' => result.push(':'),
            '}' => {}
            _ => result.push(ch),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::negotiate::versioned;
    use crate::policy::VersionConfig;
    use http::{Method, StatusCode};

    fn parts(path: &str) -> Parts {
        let req = http::Request::builder()
            .method(Method::GET)
            .uri(path)
            .body(())
            .unwrap();
        req.into_parts().0
    }

    fn single_version_route() -> VersionedRoute {
        versioned()
            .on("1.0.0", |_req: Request, _next: Next| async { "v1" })
            .build(&VersionConfig::new())
            .unwrap()
    }

    #[test]
    fn convert_placeholders() {
        assert_eq!(convert_path_params("/todo"), "/todo");
        assert_eq!(convert_path_params("/{version}/todo"), "/:version/todo");
        assert_eq!(
            convert_path_params("/{a}/x/{b}"),
            "/:a/x/:b"
        );
    }

    #[tokio::test]
    async fn dispatch_matches_and_serves() {
        let router = Router::new().route("/todo", single_version_route());
        let response = router.dispatch(parts("/todo")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get("x-api-version").unwrap(), "1.0.0");
    }

    #[tokio::test]
    async fn dispatch_unknown_path_is_not_found() {
        let router = Router::new().route("/todo", single_version_route());
        let response = router.dispatch(parts("/missing")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn captures_reach_the_route() {
        let router = Router::new().route(
            "/{version}/todo",
            versioned()
                .on("1.0.0", |_req: Request, _next: Next| async { "v1" })
                .on("2.0.0", |_req: Request, _next: Next| async { "v2" })
                .build(&VersionConfig::new())
                .unwrap(),
        );

        let response = router.dispatch(parts("/v1/todo")).await;
        assert_eq!(response.headers().get("x-api-version").unwrap(), "1.0.0");
    }

    #[test]
    #[should_panic(expected = "conflicting route registration")]
    fn conflicting_patterns_panic_at_registration() {
        let _router = Router::new()
            .route("/todo/{id}", single_version_route())
            .route("/todo/{other}", single_version_route());
    }
}
