use std::future::Future;

use tracing::{error, warn};

use crate::error::AgentError;

pub const OVERLOADED_APOLOGY: &str = "🎁 I'm sorry, but I'm experiencing high demand right now \
and can't process your request. The Holiday Gift Savior is very popular today! ✨\n\n\
Please try again in a few moments. Your gift recommendations will be worth the wait! 🎄";

pub const GENERIC_APOLOGY: &str = "🎁 I apologize, but I encountered an unexpected issue while \
processing your request. Please try again or contact support if the problem persists.";

/// Either the wrapped operation's value or a friendly apology.
#[derive(Debug)]
pub enum GracefulReply<T> {
    Completed(T),
    Degraded {
        apology: &'static str,
        error: AgentError,
    },
}

impl<T> GracefulReply<T> {
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }
}

/// Map a pipeline failure to the apology shown to the user, logging it.
pub fn apology_for(err: &AgentError) -> &'static str {
    if err.is_overloaded() {
        warn!(error = %err, "Model overloaded; returning high-demand apology");
        OVERLOADED_APOLOGY
    } else {
        error!(error = %err, "Request failed; returning generic apology");
        GENERIC_APOLOGY
    }
}

/// Run `operation` once. Errors become a `Degraded` reply; nothing is retried.
pub async fn with_graceful_fallback<T, F>(operation: F) -> GracefulReply<T>
where
    F: Future<Output = Result<T, AgentError>>,
{
    match operation.await {
        Ok(value) => GracefulReply::Completed(value),
        Err(error) => GracefulReply::Degraded {
            apology: apology_for(&error),
            error,
        },
    }
}
