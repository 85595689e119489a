//! Chat-completion adapters for the therapy session flow.
//!
//! Each provider translates the internal `{role, content}` transcript and
//! [`GenerationOptions`] into its own wire format. The concrete provider is
//! chosen once at startup and held as the closed [`LlmProvider`] enum.

#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]

mod anthropic;
mod error;
mod http;
mod openai;
mod options;
mod provider;

#[cfg(test)]
mod tests;

pub use anthropic::{ANTHROPIC_VERSION, AnthropicClient, to_anthropic_body};
pub use error::LlmError;
pub use http::truncate;
pub use openai::{OpenAiClient, to_openai_body};
pub use options::GenerationOptions;
pub use provider::{ChatProvider, LlmProvider, LlmSettings, ProviderKind};
