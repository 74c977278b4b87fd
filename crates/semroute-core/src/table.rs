//! The version table: an immutable, pre-sorted registry of version-tagged
//! handlers built once per route registration.

use crate::middleware::{BoxFuture, Next};
use crate::request::Request;
use crate::response::Response;
use semver::{Version, VersionReq};
use std::collections::HashMap;
use std::sync::Arc;

/// Handler capability invoked with the request and the continuation.
///
/// The resolver never inspects a handler; it only selects one and
/// delegates to it.
pub type VersionHandler = Arc<dyn Fn(Request, Next) -> BoxFuture<Response> + Send + Sync>;

/// One registered version and its handler.
pub struct VersionEntry {
    version: Version,
    tag: Arc<str>,
    pub(crate) handler: VersionHandler,
}

impl VersionEntry {
    /// The parsed semantic version
    pub fn version(&self) -> &Version {
        &self.version
    }

    /// The version string as registered, published to clients on selection
    pub fn tag(&self) -> &Arc<str> {
        &self.tag
    }
}

impl std::fmt::Debug for VersionEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VersionEntry")
            .field("version", &self.version)
            .finish()
    }
}

/// Ordered registry of [`VersionEntry`], strictly newest-first.
///
/// Built once when a route is registered and shared read-only across all
/// requests on that route. An empty table is legal: resolution on it
/// always fails, which is left to the caller's intent.
#[derive(Debug, Default)]
pub struct VersionTable {
    entries: Vec<VersionEntry>,
}

impl VersionTable {
    /// Build a table from a map of version string to handler.
    ///
    /// Each key must be an exact semantic version (not a range); a key the
    /// engine rejects propagates its parse error. Entries are sorted by
    /// descending precedence. Distinct keys that compare equal under
    /// precedence rules keep an unspecified relative order.
    pub fn new(handlers: HashMap<String, VersionHandler>) -> Result<Self, semver::Error> {
        let mut entries = handlers
            .into_iter()
            .map(|(key, handler)| {
                Ok(VersionEntry {
                    version: Version::parse(&key)?,
                    tag: key.into(),
                    handler,
                })
            })
            .collect::<Result<Vec<_>, semver::Error>>()?;
        entries.sort_by(|a, b| b.version.cmp(&a.version));
        Ok(Self { entries })
    }

    /// Check if the table has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// The highest-precedence entry, if any
    pub fn newest(&self) -> Option<&VersionEntry> {
        self.entries.first()
    }

    /// Entries in stored (newest-first) order
    pub fn entries(&self) -> &[VersionEntry] {
        &self.entries
    }

    /// Select the entry serving `requested`.
    ///
    /// No expression, or the literal `*`, means "no preference" and selects
    /// the newest entry. A bare full version (`1.0.0`) requests exactly
    /// that version, not the caret range the engine would default to.
    /// Otherwise the expression is a range, and the first entry satisfying
    /// it in newest-first scan order wins, so a range matched by several
    /// versions always resolves to the highest of them. An expression the
    /// engine cannot parse satisfies nothing. When nothing satisfies,
    /// `fallback_latest` selects the newest entry anyway; without it the
    /// outcome is `None` and the caller must reject the request.
    pub fn resolve(&self, requested: Option<&str>, fallback_latest: bool) -> Option<&VersionEntry> {
        let expr = match requested {
            None | Some("*") => return self.entries.first(),
            Some(expr) => expr,
        };
        if let Ok(exact) = Version::parse(expr) {
            if let Some(entry) = self.entries.iter().find(|e| e.version == exact) {
                return Some(entry);
            }
        } else if let Ok(range) = VersionReq::parse(expr) {
            if let Some(entry) = self.entries.iter().find(|e| range.matches(&e.version)) {
                return Some(entry);
            }
        }
        if fallback_latest {
            self.entries.first()
        } else {
            None
        }
    }
}
