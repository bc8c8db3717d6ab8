//! Domain errors for pool reconciliation.

use thiserror::Error;

/// Errors that can occur while reconciling a node pool.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Missing or invalid caller-supplied input, detected before any API call.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The HTTP request could not be sent or its response never arrived.
    #[error("request failed on {operation}: {message}")]
    Request {
        /// The API operation being attempted (e.g. `list pools`).
        operation: &'static str,
        /// Transport-level failure detail.
        message: String,
    },

    /// The API answered with a non-success status outside the documented
    /// idempotent exceptions (404 on fetch/delete).
    #[error("API error on {operation}: {status} {body}")]
    Api {
        /// The API operation that failed.
        operation: &'static str,
        /// HTTP status code returned by the backend.
        status: u16,
        /// Response body as returned by the backend (JSON or plain text).
        body: String,
    },

    /// A 2xx response body could not be decoded into the expected shape.
    #[error("failed to decode {operation} response: {message}")]
    Decode {
        /// The API operation whose response was undecodable.
        operation: &'static str,
        /// Decoder failure detail.
        message: String,
    },

    /// The backend reported a terminal failed status while polling.
    #[error("pool '{name}' entered failed status '{last_status}' while waiting")]
    ConvergenceFailed {
        /// Name of the pool under reconciliation.
        name: String,
        /// The failed status token observed.
        last_status: String,
        /// Truncated key sample of the last snapshot, when requested.
        observation: Option<serde_json::Value>,
    },

    /// The wait deadline passed while the pool was still converging. Distinct
    /// from [`ReconcileError::ConvergenceFailed`]: the resource may still
    /// converge later.
    #[error(
        "timed out after {waited_secs}s waiting for pool '{name}' to become {goal} \
         (last status: {last_status})"
    )]
    ConvergenceTimeout {
        /// Name of the pool under reconciliation.
        name: String,
        /// What the wait was for: `ready` or `absent`.
        goal: &'static str,
        /// Configured wait budget that was exhausted, in seconds.
        waited_secs: u64,
        /// Last non-empty status token observed (`unknown` if none).
        last_status: String,
        /// Truncated key sample of the last snapshot, when requested.
        observation: Option<serde_json::Value>,
    },
}

/// Result alias used throughout the reconciliation engine.
pub type ReconcileResult<T> = Result<T, ReconcileError>;

impl ReconcileError {
    /// Diagnostic observation attached to a convergence failure, if any.
    pub fn observation(&self) -> Option<&serde_json::Value> {
        match self {
            Self::ConvergenceFailed { observation, .. }
            | Self::ConvergenceTimeout { observation, .. } => observation.as_ref(),
            _ => None,
        }
    }
}
