//! Response shaping: success bodies, rejections, and error mapping.

use http::StatusCode;
use restgate_core::RestgateError;
use serde_json::Value;

use crate::body::ResponseBody;
use crate::codec::CodecSet;

/// Build a success response by serializing the operation's return value
/// with the codec negotiated from the `Accept` header.
#[must_use]
pub fn success_response(
    value: &Value,
    codecs: &CodecSet,
    accept: Option<&str>,
    request_id: &str,
) -> http::Response<ResponseBody> {
    let Some(codec) = codecs.serializer_for(accept) else {
        // A codec set without serializers cannot shape a body.
        return rejection_response(
            StatusCode::NOT_ACCEPTABLE,
            "no serializer available for response",
            request_id,
        );
    };

    let encoded = codec.serialize(value);
    http::Response::builder()
        .status(StatusCode::OK)
        .header("content-type", codec.content_type())
        .header("x-request-id", request_id)
        .body(ResponseBody::from_bytes(encoded))
        .expect("valid success response")
}

/// Build a rejection response (404 route miss, 403 authorization denial,
/// pipeline rejects). Rejections are normal control flow, not taxonomy
/// errors.
#[must_use]
pub fn rejection_response(
    status: StatusCode,
    message: &str,
    request_id: &str,
) -> http::Response<ResponseBody> {
    let body = serde_json::to_vec(&serde_json::json!({ "error": message }))
        .expect("JSON serialization of error cannot fail");

    http::Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .header("x-request-id", request_id)
        .body(ResponseBody::from_bytes(body))
        .expect("valid rejection response")
}

/// The response status a taxonomy error surfaces as.
#[must_use]
pub fn status_for(error: &RestgateError) -> StatusCode {
    match error {
        RestgateError::Deserialize { .. } => StatusCode::BAD_REQUEST,
        // Everything else reaching a request handler is an internal fault:
        // stale route tables, failed operations, misconfiguration.
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Convert a taxonomy error into a complete HTTP error response.
#[must_use]
pub fn error_to_response(error: &RestgateError, request_id: &str) -> http::Response<ResponseBody> {
    rejection_response(status_for(error), &error.to_string(), request_id)
}
