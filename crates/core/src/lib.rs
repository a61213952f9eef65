//! # TutorBot Core
//!
//! Domain types, traits, and error definitions for the TutorBot tutoring
//! pipeline. This crate has **zero framework dependencies** — it defines the
//! domain model that the assembler, the providers and the CLI implement
//! against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator is defined as a trait here:
//! - [`GenerationBackend`] — the text-generation engine
//! - [`CodeRunner`] — executes student code and reports a [`RunResult`]
//!
//! Engine readiness is an explicit [`EngineState`] object that callers inject,
//! so tests can drive the lifecycle with scripted backends.

pub mod backend;
pub mod error;
pub mod message;
pub mod readiness;
pub mod runner;
pub mod student;
pub mod verdict;

// Re-export key types at crate root for ergonomics
pub use backend::{GenerationBackend, GenerationReply, GenerationRequest, Usage};
pub use error::{BackendError, Error, Result};
pub use message::{Message, Role};
pub use readiness::{EngineState, EngineStatus};
pub use runner::CodeRunner;
pub use student::{
    AskRequest, Assignment, CodeFile, Environment, GradeRequest, RunResult, RunStatus,
    ValidateRequest,
};
pub use verdict::{AskVerdict, GradeVerdict, ValidateVerdict};
