//! Model providers.
//!
//! Only Gemini is wired up. Callers depend on [`LanguageModel`] so the agent
//! can be driven by a scripted model in tests.

pub mod gemini;
pub mod model;

pub use gemini::GeminiClient;
pub use model::{GenerationRequest, LanguageModel};
