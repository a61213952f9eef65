//! Context — what the model gets to see about the student's work.

pub mod assembler;
pub mod truncate;

pub use assembler::{AssembledContext, ContextAssembler, GradeContext, SectionKind};
pub use truncate::{estimate_tokens, truncate_to_tokens};
