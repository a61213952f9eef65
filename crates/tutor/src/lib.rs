//! # tutorbot-tutor
//!
//! The tutoring pipeline: what the model sees, what it is asked, and how its
//! reply is read back.
//!
//! - [`context`] — token budgets and per-mode context assembly
//! - [`prompt`] — system/user prompt pairs
//! - [`parser`] — verdict extraction from free-form replies
//! - [`TutorBot`] — the ask / grade / validate operations

pub mod context;
pub mod features;
pub mod parser;
pub mod prompt;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use context::{AssembledContext, ContextAssembler, GradeContext, SectionKind};
pub use features::{Mode, TutorBot};
pub use parser::ValidationSignal;
pub use prompt::Prompt;
