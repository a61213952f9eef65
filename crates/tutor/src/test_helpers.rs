//! Shared test doubles for the tutoring pipeline.

use std::sync::Mutex;
use tutorbot_core::backend::{GenerationBackend, GenerationReply, GenerationRequest, Usage};
use tutorbot_core::error::{BackendError, Error};
use tutorbot_core::runner::CodeRunner;
use tutorbot_core::student::RunResult;

/// A backend that returns scripted replies in order and records every
/// request it receives.
///
/// Panics if called more times than replies were provided.
pub struct ScriptedBackend {
    replies: Vec<String>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedBackend {
    pub fn new(replies: Vec<&str>) -> Self {
        Self {
            replies: replies.into_iter().map(String::from).collect(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn single(reply: &str) -> Self {
        Self::new(vec![reply])
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// The n-th request received.
    pub fn request(&self, n: usize) -> GenerationRequest {
        self.requests.lock().unwrap()[n].clone()
    }
}

#[async_trait::async_trait]
impl GenerationBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: GenerationRequest) -> Result<GenerationReply, BackendError> {
        let mut requests = self.requests.lock().unwrap();
        let call = requests.len();
        let Some(text) = self.replies.get(call) else {
            panic!(
                "ScriptedBackend exhausted: call #{call}, have {}",
                self.replies.len()
            );
        };
        requests.push(request);
        Ok(GenerationReply::new(text.clone()).with_usage(Usage {
            prompt_tokens: 100,
            completion_tokens: 20,
            total_tokens: 120,
        }))
    }
}

/// A backend whose every call fails with the given error.
pub struct FailingBackend {
    error: BackendError,
    healthy: bool,
}

impl FailingBackend {
    pub fn new(error: BackendError) -> Self {
        Self {
            error,
            healthy: true,
        }
    }

    pub fn unhealthy() -> Self {
        Self {
            error: BackendError::Network("connection refused".into()),
            healthy: false,
        }
    }
}

#[async_trait::async_trait]
impl GenerationBackend for FailingBackend {
    fn name(&self) -> &str {
        "failing"
    }

    async fn generate(&self, _request: GenerationRequest) -> Result<GenerationReply, BackendError> {
        Err(self.error.clone())
    }

    async fn health_check(&self) -> Result<bool, BackendError> {
        if self.healthy {
            Ok(true)
        } else {
            Err(self.error.clone())
        }
    }
}

/// A runner that reports a fixed result, or fails to start.
pub struct FixedRunner {
    outcome: Result<RunResult, String>,
    sources: Mutex<Vec<String>>,
}

impl FixedRunner {
    pub fn completed(stdout: &str, stderr: &str) -> Self {
        Self {
            outcome: Ok(RunResult::completed(stdout, stderr, "")),
            sources: Mutex::new(Vec::new()),
        }
    }

    pub fn broken(reason: &str) -> Self {
        Self {
            outcome: Err(reason.to_string()),
            sources: Mutex::new(Vec::new()),
        }
    }

    pub fn sources(&self) -> Vec<String> {
        self.sources.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl CodeRunner for FixedRunner {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn run(&self, source: &str) -> Result<RunResult, Error> {
        self.sources.lock().unwrap().push(source.to_string());
        self.outcome.clone().map_err(Error::Runner)
    }
}
