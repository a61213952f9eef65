//! Generation backend implementations for TutorBot.
//!
//! All backends implement the `tutorbot_core::GenerationBackend` trait.
//! The router builds the configured one.

pub mod openai_compat;
pub mod router;

pub use openai_compat::OpenAiCompatBackend;
pub use router::build_from_config;
