//! Operation metadata declared by services.

use http::Method;

/// The declared shape of an operation's input or output body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum PayloadShape {
    /// A structured JSON document.
    Json,
    /// URL-encoded form fields.
    Form,
    /// Raw bytes, passed through undecoded.
    Raw,
}

/// Metadata for one exposed operation of a service.
///
/// A descriptor is immutable once derived: the auto-router reads it exactly
/// as the service declared it. The path pattern may contain named
/// parameters in `{braces}`, e.g. `/widgets/{id}`.
#[derive(Debug, Clone)]
pub struct OperationDescriptor {
    name: String,
    verb: Method,
    pattern: String,
    input: Option<PayloadShape>,
    output: Option<PayloadShape>,
}

impl OperationDescriptor {
    /// Create a descriptor for `name`, reachable via `verb` + `pattern`.
    #[must_use]
    pub fn new(name: impl Into<String>, verb: Method, pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            verb,
            pattern: pattern.into(),
            input: None,
            output: None,
        }
    }

    /// Declare the expected input shape.
    #[must_use]
    pub fn with_input(mut self, shape: PayloadShape) -> Self {
        self.input = Some(shape);
        self
    }

    /// Declare the produced output shape.
    #[must_use]
    pub fn with_output(mut self, shape: PayloadShape) -> Self {
        self.output = Some(shape);
        self
    }

    /// The operation identifier dispatch resolves against.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The HTTP verb this operation is reachable through.
    #[must_use]
    pub fn verb(&self) -> &Method {
        &self.verb
    }

    /// The path pattern text, possibly containing `{named}` parameters.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The declared input shape, if any.
    #[must_use]
    pub fn input(&self) -> Option<PayloadShape> {
        self.input
    }

    /// The declared output shape, if any.
    #[must_use]
    pub fn output(&self) -> Option<PayloadShape> {
        self.output
    }
}
