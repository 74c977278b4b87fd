//! Negotiation policy: process-wide defaults, per-route overrides, and the
//! effective per-route policy resolved once at registration time.

use crate::error::ConfigError;
use http::HeaderName;

/// Built-in default for the inbound version header
pub const DEFAULT_REQUEST_HEADER: &str = "Accept-Version";
/// Built-in default for the outbound advertised-version header
pub const DEFAULT_RESPONSE_HEADER: &str = "X-Api-Version";
/// Built-in default for the route capture consulted before the header
pub const DEFAULT_ROUTE_PARAM: &str = "version";

/// Process-wide negotiation defaults.
///
/// Constructed once at startup and passed by reference into every
/// registration; per-route options layer over it explicitly. Nothing
/// consults it at request time.
///
/// # Example
///
/// ```rust,ignore
/// let config = VersionConfig::new()
///     .with_request_header("X-Client-Version")
///     .with_fallback_latest(true);
///
/// let route = versioned()
///     .on("1.0.0", handler_v1)
///     .build(&config)?;
/// ```
#[derive(Debug, Clone)]
pub struct VersionConfig {
    request_header: String,
    response_header: String,
    route_param: String,
    fallback_latest: bool,
    default_version: Option<String>,
    advertise: bool,
}

impl VersionConfig {
    /// Create a config holding the built-in defaults
    pub fn new() -> Self {
        Self {
            request_header: DEFAULT_REQUEST_HEADER.to_string(),
            response_header: DEFAULT_RESPONSE_HEADER.to_string(),
            route_param: DEFAULT_ROUTE_PARAM.to_string(),
            fallback_latest: false,
            default_version: None,
            advertise: true,
        }
    }

    /// Name of the inbound header carrying the requested expression
    pub fn request_header(&self) -> &str {
        &self.request_header
    }

    /// Set the inbound version header name
    pub fn with_request_header(mut self, name: impl Into<String>) -> Self {
        self.request_header = name.into();
        self
    }

    /// Name of the outbound header advertising the resolved version
    pub fn response_header(&self) -> &str {
        &self.response_header
    }

    /// Set the outbound version header name
    pub fn with_response_header(mut self, name: impl Into<String>) -> Self {
        self.response_header = name.into();
        self
    }

    /// Name of the route capture consulted before the header; empty
    /// disables capture lookup
    pub fn route_param(&self) -> &str {
        &self.route_param
    }

    /// Set the route capture name (empty string disables capture lookup)
    pub fn with_route_param(mut self, name: impl Into<String>) -> Self {
        self.route_param = name.into();
        self
    }

    /// Whether an unsatisfied request is served the newest version
    pub fn fallback_latest(&self) -> bool {
        self.fallback_latest
    }

    /// Serve the newest version when nothing satisfies the request
    pub fn with_fallback_latest(mut self, fallback: bool) -> Self {
        self.fallback_latest = fallback;
        self
    }

    /// Expression substituted when the request carries no version signal
    pub fn default_version(&self) -> Option<&str> {
        self.default_version.as_deref()
    }

    /// Set the expression substituted when the request carries no signal
    pub fn with_default_version(mut self, expr: impl Into<String>) -> Self {
        self.default_version = Some(expr.into());
        self
    }

    /// Whether the resolver writes the response header itself
    pub fn advertise(&self) -> bool {
        self.advertise
    }

    /// Control resolver-side header writing; disable it to defer the write
    /// to [`VersionHeaderLayer`](crate::middleware::VersionHeaderLayer)
    pub fn with_advertise(mut self, advertise: bool) -> Self {
        self.advertise = advertise;
        self
    }
}

impl Default for VersionConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-route overrides; unset fields inherit from [`VersionConfig`].
///
/// Populated through the builder methods on
/// [`Versioned`](crate::Versioned), never constructed directly.
#[derive(Debug, Clone, Default)]
pub(crate) struct VersionOptions {
    pub(crate) request_header: Option<String>,
    pub(crate) response_header: Option<String>,
    pub(crate) route_param: Option<String>,
    pub(crate) fallback_latest: Option<bool>,
    pub(crate) default_version: Option<String>,
    pub(crate) advertise: Option<bool>,
}

/// Effective per-route policy, fully resolved at registration time.
///
/// Header names are parsed here so that a bad name fails the registration,
/// not the first request.
#[derive(Debug, Clone)]
pub struct VersionPolicy {
    pub(crate) request_header: HeaderName,
    pub(crate) response_header: HeaderName,
    pub(crate) route_param: String,
    pub(crate) fallback_latest: bool,
    pub(crate) default_version: Option<String>,
    pub(crate) advertise: bool,
}

impl VersionPolicy {
    /// Layer per-route options over the process defaults, narrowest wins.
    ///
    /// `fallback_latest` and `default_version` are mutually exclusive in
    /// the layered result, whichever layer each came from.
    pub(crate) fn layered(
        options: &VersionOptions,
        config: &VersionConfig,
    ) -> Result<Self, ConfigError> {
        let fallback_latest = options.fallback_latest.unwrap_or(config.fallback_latest);
        let default_version = options
            .default_version
            .clone()
            .or_else(|| config.default_version.clone());
        if fallback_latest && default_version.is_some() {
            return Err(ConfigError::FallbackConflict);
        }

        Ok(Self {
            request_header: parse_header(
                options
                    .request_header
                    .as_deref()
                    .unwrap_or(&config.request_header),
            )?,
            response_header: parse_header(
                options
                    .response_header
                    .as_deref()
                    .unwrap_or(&config.response_header),
            )?,
            route_param: options
                .route_param
                .clone()
                .unwrap_or_else(|| config.route_param.clone()),
            fallback_latest,
            default_version,
            advertise: options.advertise.unwrap_or(config.advertise),
        })
    }

    /// Name of the inbound version header
    pub fn request_header(&self) -> &HeaderName {
        &self.request_header
    }

    /// Name of the outbound advertised-version header
    pub fn response_header(&self) -> &HeaderName {
        &self.response_header
    }

    /// Route capture name; empty means capture lookup is disabled
    pub fn route_param(&self) -> &str {
        &self.route_param
    }

    /// Whether an unsatisfied request is served the newest version
    pub fn fallback_latest(&self) -> bool {
        self.fallback_latest
    }

    /// Expression substituted when the request carries no signal
    pub fn default_version(&self) -> Option<&str> {
        self.default_version.as_deref()
    }

    /// Whether the resolver writes the response header itself
    pub fn advertise(&self) -> bool {
        self.advertise
    }
}

fn parse_header(name: &str) -> Result<HeaderName, ConfigError> {
    name.parse::<HeaderName>()
        .map_err(|source| ConfigError::InvalidHeaderName {
            name: name.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_defaults() {
        let policy = VersionPolicy::layered(&VersionOptions::default(), &VersionConfig::new())
            .unwrap();
        assert_eq!(policy.request_header().as_str(), "accept-version");
        assert_eq!(policy.response_header().as_str(), "x-api-version");
        assert_eq!(policy.route_param(), "version");
        assert!(!policy.fallback_latest());
        assert_eq!(policy.default_version(), None);
        assert!(policy.advertise());
    }

    #[test]
    fn route_options_override_config() {
        let config = VersionConfig::new()
            .with_request_header("X-Client-Version")
            .with_route_param("rev");
        let options = VersionOptions {
            request_header: Some("Accept-Rev".to_string()),
            ..Default::default()
        };

        let policy = VersionPolicy::layered(&options, &config).unwrap();
        assert_eq!(policy.request_header().as_str(), "accept-rev");
        // Unset option falls through to the config layer.
        assert_eq!(policy.route_param(), "rev");
    }

    #[test]
    fn conflict_within_route_options() {
        let options = VersionOptions {
            fallback_latest: Some(true),
            default_version: Some("1.0.0".to_string()),
            ..Default::default()
        };
        let err = VersionPolicy::layered(&options, &VersionConfig::new()).unwrap_err();
        assert!(matches!(err, ConfigError::FallbackConflict));
    }

    #[test]
    fn conflict_across_layers() {
        // The default version comes from the process config, the fallback
        // flag from the route; the layered result still conflicts.
        let config = VersionConfig::new().with_default_version("1.0.0");
        let options = VersionOptions {
            fallback_latest: Some(true),
            ..Default::default()
        };
        let err = VersionPolicy::layered(&options, &config).unwrap_err();
        assert!(matches!(err, ConfigError::FallbackConflict));
    }

    #[test]
    fn config_level_conflict_can_be_overridden_per_route() {
        let config = VersionConfig::new()
            .with_fallback_latest(true)
            .with_default_version("1.0.0");
        let options = VersionOptions {
            fallback_latest: Some(false),
            ..Default::default()
        };
        let policy = VersionPolicy::layered(&options, &config).unwrap();
        assert!(!policy.fallback_latest());
        assert_eq!(policy.default_version(), Some("1.0.0"));
    }

    #[test]
    fn invalid_header_name_fails_registration() {
        let config = VersionConfig::new().with_request_header("bad header\n");
        let err = VersionPolicy::layered(&VersionOptions::default(), &config).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidHeaderName { .. }));
    }

    #[test]
    fn empty_route_param_disables_capture_lookup() {
        let config = VersionConfig::new().with_route_param("");
        let policy = VersionPolicy::layered(&VersionOptions::default(), &config).unwrap();
        assert!(policy.route_param().is_empty());
    }
}
