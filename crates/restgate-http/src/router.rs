//! The route table: (verb, path pattern) keys mapped to service operations.
//!
//! Patterns are slash-separated with `{named}` parameter segments, e.g.
//! `/widgets/{id}`. The table is built fully at startup and is read-only
//! while requests are served; no two entries may share an identical
//! (verb, pattern) key — a duplicate registration is rejected with
//! [`RestgateError::RouteConflict`] rather than silently shadowing an
//! operation.

use std::collections::HashMap;
use std::sync::Arc;

use http::Method;
use restgate_core::{RestgateError, RestgateResult, Service};
use tracing::debug;

use crate::context::decode_uri_component;

/// One segment of a parsed path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// Matches the segment text exactly (after percent-decoding).
    Literal(String),
    /// Matches any single segment, capturing it under the given name.
    Param(String),
}

/// A parsed path pattern.
#[derive(Debug, Clone)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Parse a pattern, normalizing it to a leading-slash form without a
    /// trailing slash (the root pattern stays `/`).
    #[must_use]
    pub fn parse(pattern: &str) -> Self {
        let trimmed = pattern.trim_start_matches('/').trim_end_matches('/');
        let raw = if trimmed.is_empty() {
            "/".to_owned()
        } else {
            format!("/{trimmed}")
        };

        let segments = trimmed
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.strip_prefix('{')
                    .and_then(|s| s.strip_suffix('}'))
                    .map_or_else(|| Segment::Literal(s.to_owned()), |name| {
                        Segment::Param(name.to_owned())
                    })
            })
            .collect();

        Self { raw, segments }
    }

    /// The normalized pattern text; identical text means identical key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Match a request path against this pattern, capturing named
    /// parameters (percent-decoded).
    #[must_use]
    pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
        let parts: Vec<&str> = path
            .trim_start_matches('/')
            .trim_end_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = HashMap::new();
        for (segment, part) in self.segments.iter().zip(&parts) {
            match segment {
                Segment::Literal(lit) => {
                    if decode_uri_component(part) != *lit {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    params.insert(name.clone(), decode_uri_component(part));
                }
            }
        }

        Some(params)
    }
}

/// One route-table entry binding a (verb, pattern) key to a service
/// operation.
pub struct RouteEntry {
    verb: Method,
    pattern: PathPattern,
    service: Arc<dyn Service>,
    operation: String,
}

impl RouteEntry {
    /// The HTTP verb.
    #[must_use]
    pub fn verb(&self) -> &Method {
        &self.verb
    }

    /// The parsed pattern.
    #[must_use]
    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    /// The shared service reference dispatch calls into.
    #[must_use]
    pub fn service(&self) -> &Arc<dyn Service> {
        &self.service
    }

    /// The operation identifier on the service.
    #[must_use]
    pub fn operation(&self) -> &str {
        &self.operation
    }
}

impl std::fmt::Debug for RouteEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteEntry")
            .field("verb", &self.verb)
            .field("pattern", &self.pattern.as_str())
            .field("service", &self.service.name())
            .field("operation", &self.operation)
            .finish()
    }
}

/// The route table. Built at startup, read-only afterwards.
#[derive(Debug, Default)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a route entry.
    ///
    /// # Errors
    ///
    /// Returns [`RestgateError::RouteConflict`] when an entry with the same
    /// verb and normalized pattern text already exists.
    pub fn insert(
        &mut self,
        verb: Method,
        pattern: &str,
        service: Arc<dyn Service>,
        operation: impl Into<String>,
    ) -> RestgateResult<()> {
        let pattern = PathPattern::parse(pattern);

        if self
            .entries
            .iter()
            .any(|e| e.verb == verb && e.pattern.as_str() == pattern.as_str())
        {
            return Err(RestgateError::RouteConflict {
                verb,
                pattern: pattern.as_str().to_owned(),
            });
        }

        self.entries.push(RouteEntry {
            verb,
            pattern,
            service,
            operation: operation.into(),
        });
        Ok(())
    }

    /// Resolve a request to its route entry and captured path parameters.
    ///
    /// Entries are tried in registration order; since identical keys are
    /// rejected at insert time, at most one entry can match a given
    /// (method, concrete path) pair per pattern shape.
    #[must_use]
    pub fn resolve(
        &self,
        method: &Method,
        path: &str,
    ) -> Option<(&RouteEntry, HashMap<String, String>)> {
        for entry in &self.entries {
            if entry.verb != *method {
                continue;
            }
            if let Some(params) = entry.pattern.matches(path) {
                debug!(
                    verb = %method,
                    path,
                    pattern = entry.pattern.as_str(),
                    service = entry.service.name(),
                    operation = %entry.operation,
                    "resolved route"
                );
                return Some((entry, params));
            }
        }
        None
    }

    /// Number of installed entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the installed entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &RouteEntry> {
        self.entries.iter()
    }
}
