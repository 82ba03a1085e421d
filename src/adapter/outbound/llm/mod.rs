//! LLM adapter modules.
//!
//! Implementations of the [`Llm`](crate::port::Llm) trait used by the
//! opportunity validator.

pub mod openai;

pub use openai::OpenAi;
