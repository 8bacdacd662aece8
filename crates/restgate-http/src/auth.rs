//! The authorization gate.
//!
//! An [`AuthPolicy`] is owned by the application it guards and handed to
//! the request pipeline at construction time; there is no process-wide
//! state. The callback slot supports runtime re-configuration with atomic
//! swap semantics: a reader can never observe a half-updated callback.

use std::sync::Arc;

use parking_lot::RwLock;
use restgate_core::{RestgateError, RestgateResult};
use tracing::debug;

use crate::context::RequestContext;

/// The externally supplied authorization decision function.
pub type AuthCallback = Arc<dyn Fn(&RequestContext) -> bool + Send + Sync>;

/// Holds the active authorization callback, if one is configured.
#[derive(Default)]
pub struct AuthPolicy {
    callback: RwLock<Option<AuthCallback>>,
}

impl AuthPolicy {
    /// Create a policy with no callback configured.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the authorization callback.
    ///
    /// `None` models a non-invocable value: any previously active callback
    /// is cleared *first*, then [`RestgateError::InvalidCallback`] is
    /// returned. An invalid callback must never remain partially active;
    /// this clear-then-fail ordering is load-bearing and tested.
    pub fn set_callback(&self, callback: Option<AuthCallback>) -> RestgateResult<()> {
        match callback {
            Some(callback) => {
                *self.callback.write() = Some(callback);
                Ok(())
            }
            None => {
                *self.callback.write() = None;
                Err(RestgateError::InvalidCallback)
            }
        }
    }

    /// The active callback, or `None` when unset.
    #[must_use]
    pub fn callback(&self) -> Option<AuthCallback> {
        self.callback.read().clone()
    }

    /// Evaluate the policy for a request.
    ///
    /// With no callback configured, authorization is **not enforced** and
    /// every request is allowed; install a deny callback before serving if
    /// a closed-by-default posture is required. A `false` return is a
    /// normal control-flow rejection, not an error.
    #[must_use]
    pub fn evaluate(&self, ctx: &RequestContext) -> bool {
        match self.callback.read().as_ref() {
            Some(callback) => callback(ctx),
            None => {
                debug!("no authorization callback configured, allowing request");
                true
            }
        }
    }
}

impl std::fmt::Debug for AuthPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthPolicy")
            .field("configured", &self.callback.read().is_some())
            .finish()
    }
}
