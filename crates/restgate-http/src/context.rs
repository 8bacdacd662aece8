//! Per-request context threaded through the pipeline.
//!
//! A [`RequestContext`] is created when a request arrives, mutated in place
//! by each pipeline stage, and dropped once the response is built. It is
//! owned exclusively by the task handling the request.

use std::collections::HashMap;

use bytes::Bytes;
use http::{HeaderMap, Method};
use percent_encoding::percent_decode_str;
use serde_json::Value;

/// Identifying information about the route a request matched.
#[derive(Debug, Clone)]
pub struct MatchedRoute {
    /// The owning service's short name.
    pub service: String,
    /// The operation the route entry points at.
    pub operation: String,
    /// The pattern text the route was registered under.
    pub pattern: String,
}

/// Mutable per-request state.
///
/// The raw body is buffered exactly once before the pipeline runs; stages
/// never touch the transport stream.
#[derive(Debug)]
pub struct RequestContext {
    /// The request method.
    pub method: Method,
    /// The request path (undecoded, as received).
    pub path: String,
    /// Request headers.
    pub headers: HeaderMap,
    /// Decoded query-string pairs, in request order.
    pub query_params: Vec<(String, String)>,
    /// Named parameters captured from the matched path pattern. Empty until
    /// route resolution.
    pub path_params: HashMap<String, String>,
    /// The buffered raw body.
    pub body: Bytes,
    /// The deserialized body, populated by the deserializer stage when a
    /// codec matches the content type.
    pub payload: Option<Value>,
    /// The matched route, populated at resolution time.
    pub route: Option<MatchedRoute>,
    /// The authorization decision, populated by the access-control stage.
    pub authorized: Option<bool>,
}

impl RequestContext {
    /// Build a context from request parts and an already-buffered body.
    #[must_use]
    pub fn from_parts(parts: &http::request::Parts, body: Bytes) -> Self {
        let query_params = parse_query_params(parts.uri.query().unwrap_or(""));
        Self {
            method: parts.method.clone(),
            path: parts.uri.path().to_owned(),
            headers: parts.headers.clone(),
            query_params,
            path_params: HashMap::new(),
            body,
            payload: None,
            route: None,
            authorized: None,
        }
    }

    /// The value of a header, when present and valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The request's declared content type, parsed.
    #[must_use]
    pub fn content_type(&self) -> Option<mime::Mime> {
        self.header(http::header::CONTENT_TYPE.as_str())?
            .parse()
            .ok()
    }
}

/// Decode a percent-encoded URI component.
pub(crate) fn decode_uri_component(s: &str) -> String {
    percent_decode_str(s).decode_utf8_lossy().into_owned()
}

/// Parse a query string into decoded key-value pairs.
pub(crate) fn parse_query_params(query: &str) -> Vec<(String, String)> {
    if query.is_empty() {
        return Vec::new();
    }

    query
        .split('&')
        .filter(|s| !s.is_empty())
        .map(|pair| {
            if let Some(pos) = pair.find('=') {
                let key = decode_uri_component(&pair[..pos]);
                let value = decode_uri_component(&pair[pos + 1..]);
                (key, value)
            } else {
                (decode_uri_component(pair), String::new())
            }
        })
        .collect()
}
