//! Middleware chain infrastructure
//!
//! Every stage in the pipeline, including the version resolver itself, has
//! the same shape: it receives the request and a continuation, and returns
//! the response future. The stack composes stages outermost-first.

use crate::request::Request;
use crate::response::Response;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// A boxed response future
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// The continuation handed to each middleware: invoke it to proceed to the
/// next pipeline stage.
pub type Next = Arc<dyn Fn(Request) -> BoxFuture<Response> + Send + Sync>;

/// Trait for pipeline stages.
pub trait Middleware: Send + Sync + 'static {
    /// Handle a request, calling `next` to continue the chain.
    fn call(&self, req: Request, next: Next) -> BoxFuture<Response>;

    /// Clone this middleware into a boxed trait object
    fn clone_box(&self) -> Box<dyn Middleware>;
}

impl Clone for Box<dyn Middleware> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// An ordered stack of middleware.
///
/// Stages run in the order they were pushed: the first push is the
/// outermost stage, seeing the request first and the response last.
#[derive(Clone, Default)]
pub struct MiddlewareStack {
    layers: Vec<Box<dyn Middleware>>,
}

impl MiddlewareStack {
    /// Create a new empty stack
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Add a middleware to the stack
    pub fn push(&mut self, layer: Box<dyn Middleware>) {
        self.layers.push(layer);
    }

    /// Check if the stack is empty
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Get the number of stages
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Run a request through the stack, ending at `handler`.
    pub fn execute(&self, req: Request, handler: Next) -> BoxFuture<Response> {
        let mut next = handler;
        for layer in self.layers.iter().rev() {
            let layer = layer.clone_box();
            let inner = next;
            next = Arc::new(move |req: Request| layer.call(req, inner.clone()));
        }
        next(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::IntoResponse;
    use http::{Method, StatusCode};
    use std::collections::HashMap;
    use std::sync::Mutex;

    fn test_request(path: &str) -> Request {
        let req = http::Request::builder()
            .method(Method::GET)
            .uri(path)
            .body(())
            .unwrap();
        let (parts, _) = req.into_parts();
        Request::new(parts, HashMap::new())
    }

    fn ok_handler() -> Next {
        Arc::new(|_req: Request| Box::pin(async { "ok".into_response() }))
    }

    #[derive(Clone)]
    struct Recorder {
        id: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Middleware for Recorder {
        fn call(&self, req: Request, next: Next) -> BoxFuture<Response> {
            let id = self.id;
            let log = self.log.clone();
            Box::pin(async move {
                log.lock().unwrap().push(format!("{id}:pre"));
                let response = next(req).await;
                log.lock().unwrap().push(format!("{id}:post"));
                response
            })
        }

        fn clone_box(&self) -> Box<dyn Middleware> {
            Box::new(self.clone())
        }
    }

    #[tokio::test]
    async fn empty_stack_calls_handler_directly() {
        let stack = MiddlewareStack::new();
        let response = stack.execute(test_request("/"), ok_handler()).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn stages_run_outermost_first() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut stack = MiddlewareStack::new();
        stack.push(Box::new(Recorder {
            id: "outer",
            log: log.clone(),
        }));
        stack.push(Box::new(Recorder {
            id: "inner",
            log: log.clone(),
        }));

        stack.execute(test_request("/"), ok_handler()).await;

        assert_eq!(
            *log.lock().unwrap(),
            vec!["outer:pre", "inner:pre", "inner:post", "outer:post"]
        );
    }

    #[tokio::test]
    async fn short_circuit_skips_inner_stages() {
        #[derive(Clone)]
        struct Reject;

        impl Middleware for Reject {
            fn call(&self, _req: Request, _next: Next) -> BoxFuture<Response> {
                Box::pin(async { (StatusCode::FORBIDDEN, "no".to_string()).into_response() })
            }

            fn clone_box(&self) -> Box<dyn Middleware> {
                Box::new(self.clone())
            }
        }

        let log = Arc::new(Mutex::new(Vec::new()));
        let mut stack = MiddlewareStack::new();
        stack.push(Box::new(Reject));
        stack.push(Box::new(Recorder {
            id: "inner",
            log: log.clone(),
        }));

        let response = stack.execute(test_request("/"), ok_handler()).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(log.lock().unwrap().is_empty());
    }
}
