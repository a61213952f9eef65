//! Code runner trait — executes student source and reports what happened.
//!
//! Runners are external collaborators: the tutoring pipeline only consumes
//! their [`RunResult`]. A runner should report program failures (syntax
//! errors, exceptions, non-zero exits) inside the result and reserve `Err`
//! for the case where execution could not be attempted at all.

use crate::error::Error;
use crate::student::RunResult;
use async_trait::async_trait;

#[async_trait]
pub trait CodeRunner: Send + Sync {
    /// A human-readable name (e.g., "python3").
    fn name(&self) -> &str;

    /// Execute the given source text.
    async fn run(&self, source: &str) -> std::result::Result<RunResult, Error>;
}
