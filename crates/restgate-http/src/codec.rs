//! Body codecs: deserializer and serializer capabilities.
//!
//! The pipeline selects a deserializer by the request's `Content-Type` and
//! a serializer by its `Accept` header. An unrecognized content type is not
//! an error: the request passes through with its raw body only.

use bytes::Bytes;
use restgate_core::{RestgateError, RestgateResult};
use serde_json::Value;

/// Decodes a request body into a structured payload.
pub trait BodyDeserializer: Send + Sync {
    /// The content-type essences this codec handles, e.g.
    /// `application/json`.
    fn content_types(&self) -> &'static [&'static str];

    /// Decode the buffered body.
    ///
    /// # Errors
    ///
    /// Returns [`RestgateError::Deserialize`] when the body does not parse
    /// as the declared content type.
    fn deserialize(&self, body: &Bytes) -> RestgateResult<Value>;
}

/// Encodes an operation's return value into a response body.
///
/// Implementations must be total over [`Value`] inputs; encoding a
/// structured value is not a fallible request-path concern.
pub trait BodySerializer: Send + Sync {
    /// The content type stamped on responses produced by this codec.
    fn content_type(&self) -> &'static str;

    /// Encode the value.
    fn serialize(&self, value: &Value) -> Vec<u8>;
}

/// JSON codec, both directions.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl BodyDeserializer for JsonCodec {
    fn content_types(&self) -> &'static [&'static str] {
        &["application/json"]
    }

    fn deserialize(&self, body: &Bytes) -> RestgateResult<Value> {
        serde_json::from_slice(body).map_err(|e| RestgateError::Deserialize {
            content_type: "application/json".to_owned(),
            reason: e.to_string(),
        })
    }
}

impl BodySerializer for JsonCodec {
    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn serialize(&self, value: &Value) -> Vec<u8> {
        serde_json::to_vec(value).expect("JSON serialization of a Value cannot fail")
    }
}

/// URL-encoded form deserializer.
///
/// Fields become a JSON object of strings; a repeated key keeps its last
/// occurrence.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormCodec;

impl BodyDeserializer for FormCodec {
    fn content_types(&self) -> &'static [&'static str] {
        &["application/x-www-form-urlencoded"]
    }

    fn deserialize(&self, body: &Bytes) -> RestgateResult<Value> {
        let mut map = serde_json::Map::new();
        for (key, value) in form_urlencoded::parse(body) {
            map.insert(key.into_owned(), Value::String(value.into_owned()));
        }
        Ok(Value::Object(map))
    }
}

/// The set of codecs available to a pipeline.
pub struct CodecSet {
    deserializers: Vec<Box<dyn BodyDeserializer>>,
    serializers: Vec<Box<dyn BodySerializer>>,
}

impl CodecSet {
    /// An empty codec set; every request passes through undecoded.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            deserializers: Vec::new(),
            serializers: Vec::new(),
        }
    }

    /// Add a deserializer capability.
    #[must_use]
    pub fn with_deserializer(mut self, codec: impl BodyDeserializer + 'static) -> Self {
        self.deserializers.push(Box::new(codec));
        self
    }

    /// Add a serializer capability. The first added serializer is the
    /// default when no `Accept` header matches.
    #[must_use]
    pub fn with_serializer(mut self, codec: impl BodySerializer + 'static) -> Self {
        self.serializers.push(Box::new(codec));
        self
    }

    /// Find the deserializer handling `content_type`'s essence, if any.
    #[must_use]
    pub fn deserializer_for(&self, content_type: &mime::Mime) -> Option<&dyn BodyDeserializer> {
        let essence = content_type.essence_str();
        self.deserializers
            .iter()
            .find(|codec| codec.content_types().contains(&essence))
            .map(|codec| codec.as_ref())
    }

    /// Pick a serializer for the given `Accept` header value, falling back
    /// to the default (first registered) serializer.
    ///
    /// Returns `None` only for a codec set with no serializers at all.
    #[must_use]
    pub fn serializer_for(&self, accept: Option<&str>) -> Option<&dyn BodySerializer> {
        if let Some(accept) = accept {
            for part in accept.split(',') {
                let essence = part.split(';').next().unwrap_or("").trim();
                if let Some(codec) = self
                    .serializers
                    .iter()
                    .find(|codec| codec.content_type() == essence)
                {
                    return Some(codec.as_ref());
                }
            }
        }
        self.serializers.first().map(|codec| codec.as_ref())
    }
}

impl Default for CodecSet {
    /// JSON + form deserializers, JSON serializer.
    fn default() -> Self {
        Self::empty()
            .with_deserializer(JsonCodec)
            .with_deserializer(FormCodec)
            .with_serializer(JsonCodec)
    }
}

impl std::fmt::Debug for CodecSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodecSet")
            .field(
                "deserializers",
                &self
                    .deserializers
                    .iter()
                    .map(|c| c.content_types())
                    .collect::<Vec<_>>(),
            )
            .field(
                "serializers",
                &self
                    .serializers
                    .iter()
                    .map(|c| c.content_type())
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}
