//! Error taxonomy for restgate.

/// Errors produced by discovery, routing setup, and request dispatch.
///
/// Authorization rejections (a `false` from the callback) and unmatched
/// routes are deliberately *not* members of this enum: both are normal
/// control-flow outcomes that the HTTP layer maps to 403/404 responses.
#[derive(Debug, thiserror::Error)]
pub enum RestgateError {
    /// Invalid or missing host application binding. Fatal at setup time.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The services directory cannot be scanned.
    #[error("cannot scan services directory `{path}`")]
    ServicesDir {
        /// The directory that failed to scan.
        path: String,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A discovered manifest failed to resolve to a live service.
    ///
    /// Discovery aborts on the first such failure; a partial route table is
    /// a worse failure mode than a clear startup error.
    #[error("failed to load service `{service}`: {reason}")]
    ServiceLoad {
        /// The fully-qualified service identifier.
        service: String,
        /// Why the load failed.
        reason: String,
    },

    /// A non-invocable value was supplied as the authorization callback.
    ///
    /// The previous callback has already been cleared by the time this is
    /// returned; the caller may retry with a valid value.
    #[error("authorization callback is not invocable")]
    InvalidCallback,

    /// Two registrations share an identical (verb, path pattern) key.
    #[error("route conflict: {verb} {pattern} is already registered")]
    RouteConflict {
        /// The HTTP verb of the conflicting registration.
        verb: http::Method,
        /// The normalized path pattern text.
        pattern: String,
    },

    /// Dispatch could not resolve a route entry to a live operation.
    ///
    /// An internal consistency fault (stale route table), surfaced as 5xx.
    #[error("operation `{operation}` not found on service `{service}`")]
    OperationNotFound {
        /// The service the route entry points at.
        service: String,
        /// The operation identifier that failed to resolve.
        operation: String,
    },

    /// The invoked operation body raised an error.
    ///
    /// The original cause is preserved as the source and is never silently
    /// swallowed.
    #[error("operation `{operation}` on service `{service}` failed")]
    ServiceOperation {
        /// The owning service.
        service: String,
        /// The operation that failed.
        operation: String,
        /// The original cause.
        #[source]
        source: anyhow::Error,
    },

    /// A codec matched the request's content type but failed to decode the
    /// body. Surfaced as 400.
    #[error("malformed request body for content type `{content_type}`: {reason}")]
    Deserialize {
        /// The content type that selected the codec.
        content_type: String,
        /// The decode failure.
        reason: String,
    },
}

/// Convenience result type for restgate operations.
pub type RestgateResult<T> = Result<T, RestgateError>;
