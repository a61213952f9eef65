//! Error types for the TutorBot domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.
//!
//! An unparseable model reply is **not** an error: verdict fields simply
//! stay `None`. Errors are reserved for calls that could not happen at all.

use crate::readiness::EngineStatus;
use thiserror::Error;

/// The top-level error type for all TutorBot operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Readiness ---
    #[error("TutorBot is not ready (engine status: {status}). Please initialize it first.")]
    NotReady { status: EngineStatus },

    // --- Backend errors ---
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    // --- Runner errors ---
    #[error("Code runner failed: {0}")]
    Runner(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures reported by a generation backend. Propagated to the caller
/// unchanged; the orchestrator never retries.
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by backend, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Backend returned no completion: {0}")]
    EmptyReply(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_error_displays_correctly() {
        let err = Error::Backend(BackendError::ApiError {
            status_code: 503,
            message: "model loading".into(),
        });
        assert!(err.to_string().contains("503"));
        assert!(err.to_string().contains("model loading"));
    }

    #[test]
    fn not_ready_mentions_status() {
        let err = Error::NotReady {
            status: EngineStatus::Uninitialized,
        };
        let text = err.to_string();
        assert!(text.contains("uninitialized"));
        assert!(text.contains("initialize"));
    }

    #[test]
    fn every_error_variant_is_reachable() {
        // No wildcard arm: a variant added here must also be constructed below.
        fn category(err: &Error) -> &'static str {
            match err {
                Error::NotReady { .. } => "readiness",
                Error::Backend(_) => "backend",
                Error::Runner(_) => "runner",
            }
        }

        let errors = [
            Error::NotReady {
                status: EngineStatus::Initializing,
            },
            BackendError::Timeout("60s".into()).into(),
            Error::Runner("failed to start 'python3'".into()),
        ];
        let categories: Vec<_> = errors.iter().map(category).collect();
        assert_eq!(categories, ["readiness", "backend", "runner"]);
    }

    #[test]
    fn backend_error_converts_unchanged() {
        let err: Error = BackendError::RateLimited {
            retry_after_secs: 5,
        }
        .into();
        assert!(matches!(
            err,
            Error::Backend(BackendError::RateLimited {
                retry_after_secs: 5
            })
        ));
    }
}
