//! Engine readiness — the injectable lifecycle of the generation engine.
//!
//! ```text
//! Uninitialized ──initialize()──▶ Initializing ──▶ Ready
//!                                              └──▶ Failed
//! ```
//!
//! `Failed` can be re-initialized. The check-then-initialize sequence is not
//! atomic: two callers may both start initialization, which is harmless since
//! a health check is idempotent at the backend.

use crate::backend::GenerationBackend;
use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use tracing::{info, warn};

/// Lifecycle status of the generation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EngineStatus {
    Uninitialized,
    Initializing,
    Ready,
    Failed { reason: String },
}

impl std::fmt::Display for EngineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineStatus::Uninitialized => write!(f, "uninitialized"),
            EngineStatus::Initializing => write!(f, "initializing"),
            EngineStatus::Ready => write!(f, "ready"),
            EngineStatus::Failed { reason } => write!(f, "failed: {reason}"),
        }
    }
}

/// Shared readiness state. Cheap to read; wrap in an `Arc` to share.
#[derive(Debug)]
pub struct EngineState {
    status: RwLock<EngineStatus>,
}

impl EngineState {
    /// A fresh, uninitialized engine.
    pub fn new() -> Self {
        Self::with_status(EngineStatus::Uninitialized)
    }

    /// An engine that is already loaded (e.g. managed by the caller).
    pub fn ready() -> Self {
        Self::with_status(EngineStatus::Ready)
    }

    pub fn with_status(status: EngineStatus) -> Self {
        Self {
            status: RwLock::new(status),
        }
    }

    /// Current status snapshot.
    pub fn status(&self) -> EngineStatus {
        match self.status.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status() == EngineStatus::Ready
    }

    fn set(&self, status: EngineStatus) {
        match self.status.write() {
            Ok(mut guard) => *guard = status,
            Err(poisoned) => *poisoned.into_inner() = status,
        }
    }

    /// Bring the engine up by probing the backend.
    ///
    /// Returns immediately when already `Ready`. Otherwise transitions through
    /// `Initializing` and ends in `Ready` or `Failed`.
    pub async fn initialize(&self, backend: &dyn GenerationBackend) -> EngineStatus {
        if self.is_ready() {
            return EngineStatus::Ready;
        }

        self.set(EngineStatus::Initializing);
        info!(backend = backend.name(), "Initializing generation engine");

        let next = match backend.health_check().await {
            Ok(true) => EngineStatus::Ready,
            Ok(false) => EngineStatus::Failed {
                reason: format!("backend '{}' reported unhealthy", backend.name()),
            },
            Err(e) => EngineStatus::Failed {
                reason: e.to_string(),
            },
        };

        match &next {
            EngineStatus::Ready => info!(backend = backend.name(), "Generation engine ready"),
            other => warn!(backend = backend.name(), status = %other, "Generation engine failed to initialize"),
        }

        self.set(next.clone());
        next
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::new()
    }
}
