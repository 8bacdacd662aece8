//! The layered request pipeline.
//!
//! Stages run in a fixed order before the matched operation executes, each
//! mutating the [`RequestContext`] in place. A stage either lets the
//! request continue, rejects it with a response status (normal control
//! flow, e.g. an authorization denial), or fails with a taxonomy error
//! (e.g. a malformed body for a matching codec).

use std::sync::Arc;

use http::StatusCode;
use restgate_core::RestgateResult;
use tracing::{debug, warn};

use crate::auth::AuthPolicy;
use crate::codec::CodecSet;
use crate::context::RequestContext;

/// What a pipeline stage decided about the request.
#[derive(Debug)]
pub enum StageOutcome {
    /// Proceed to the next stage.
    Continue,
    /// Stop processing and answer with the given status.
    Reject {
        /// Response status for the rejection.
        status: StatusCode,
        /// Human-readable reason placed in the error body.
        message: String,
    },
}

/// A request interceptor run before dispatch.
pub trait PipelineStage: Send + Sync {
    /// Stage name for logs.
    fn name(&self) -> &'static str;

    /// Process the request context in place.
    fn handle(&self, ctx: &mut RequestContext) -> RestgateResult<StageOutcome>;
}

/// Framework-level stage decoding the buffered body into `ctx.payload`.
///
/// Registered with the application by `Controller::set_app`, once per call
/// (repeated `set_app` calls append another instance; the chain is not
/// deduplicated).
pub struct DeserializerStage {
    codecs: Arc<CodecSet>,
}

impl DeserializerStage {
    /// Create a stage over the given codec set.
    #[must_use]
    pub fn new(codecs: Arc<CodecSet>) -> Self {
        Self { codecs }
    }
}

impl PipelineStage for DeserializerStage {
    fn name(&self) -> &'static str {
        "deserializer"
    }

    fn handle(&self, ctx: &mut RequestContext) -> RestgateResult<StageOutcome> {
        if ctx.body.is_empty() {
            return Ok(StageOutcome::Continue);
        }

        let Some(content_type) = ctx.content_type() else {
            debug!("no content type declared, passing raw body through");
            return Ok(StageOutcome::Continue);
        };

        let Some(codec) = self.codecs.deserializer_for(&content_type) else {
            debug!(
                content_type = %content_type,
                "no deserializer for content type, passing raw body through"
            );
            return Ok(StageOutcome::Continue);
        };

        // A matching codec that cannot decode the body is a caller error.
        let payload = codec.deserialize(&ctx.body)?;
        ctx.payload = Some(payload);
        Ok(StageOutcome::Continue)
    }
}

impl std::fmt::Debug for DeserializerStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeserializerStage").finish_non_exhaustive()
    }
}

/// Stage evaluating the authorization policy after route resolution.
#[derive(Debug)]
pub struct AccessControlStage {
    policy: Arc<AuthPolicy>,
}

impl AccessControlStage {
    /// Create a stage over the given policy.
    #[must_use]
    pub fn new(policy: Arc<AuthPolicy>) -> Self {
        Self { policy }
    }
}

impl PipelineStage for AccessControlStage {
    fn name(&self) -> &'static str {
        "access-control"
    }

    fn handle(&self, ctx: &mut RequestContext) -> RestgateResult<StageOutcome> {
        let allowed = self.policy.evaluate(ctx);
        ctx.authorized = Some(allowed);

        if allowed {
            Ok(StageOutcome::Continue)
        } else {
            warn!(
                method = %ctx.method,
                path = %ctx.path,
                "request rejected by authorization callback"
            );
            Ok(StageOutcome::Reject {
                status: StatusCode::FORBIDDEN,
                message: "request rejected by authorization policy".to_owned(),
            })
        }
    }
}
