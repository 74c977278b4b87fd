//! # semroute
//!
//! Semantic-version request negotiation for HTTP pipelines.
//!
//! A route registers several handler variants, each tagged with an exact
//! semantic version. Per request, the resolver reads the client's
//! requested version expression (a route capture such as `/v1/...`, or an
//! `Accept-Version` header), selects the newest registered version
//! satisfying it, publishes the choice into request state, advertises it
//! back via `X-Api-Version`, and delegates to the selected handler. A
//! request nothing satisfies is rejected with
//! `400 Version <X> is not supported` unless an explicit fallback policy
//! says otherwise.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use semroute::prelude::*;
//!
//! let config = VersionConfig::new();
//!
//! let router = Router::new()
//!     .route(
//!         "/todo",
//!         versioned()
//!             .on("1.0.0", |_req: Request, _next: Next| async { "list, v1" })
//!             .on("2.0.0", |_req: Request, _next: Next| async { "list, v2" })
//!             .build(&config)?,
//!     )
//!     .layer(RequestIdLayer::new())
//!     .layer(TracingLayer::new());
//! ```
//!
//! ## Policies
//!
//! - `fallback_latest(true)` - serve the newest version when nothing
//!   satisfies the request.
//! - `default_version("1.0.0")` - substitute a fixed expression when the
//!   request carries no version signal at all.
//!
//! The two are mutually exclusive; registering a route with both fails
//! with [`ConfigError::FallbackConflict`].
//!
//! ## Advertising
//!
//! By default the resolver writes the selected version into the response
//! header itself. Configure `advertise(false)` and mount
//! [`VersionHeaderLayer`] to defer the write until downstream processing
//! has completed instead; either way the header appears exactly on the
//! responses whose negotiation succeeded.

// Re-export core functionality
pub use semroute_core::*;

// Re-export the version engine for callers constructing versions and
// ranges programmatically, and tracing for handlers that log.
pub use semver;
pub use tracing;

/// Commonly used imports
pub mod prelude {
    pub use semroute_core::{
        versioned, ApiError, ApiVersion, ConfigError, IntoResponse, Middleware, Next, Request,
        RequestIdLayer, Response, Router, TracingLayer, VersionConfig, VersionHeaderLayer,
        Versioned, VersionedRoute,
    };

    #[cfg(feature = "test-utils")]
    pub use semroute_core::{TestClient, TestRequest, TestResponse};
}
