//! Language-model completion.
//!
//! Provides the [`CompletionProvider`] trait, HTTP implementations for
//! OpenAI-compatible servers (llama.cpp's `llama-server`, vLLM, ...) and Ollama, and
//! [`complete_reply`], which runs one prompt and classifies the outcome as a
//! [`Completion`].

pub mod ollama;
pub mod openai;
pub mod parse;
pub mod types;

use async_trait::async_trait;

use crate::config::ModelConfig;
use crate::error::ModelError;
use parse::ModelOutput;

pub use parse::{parse_reply, strip_code_fences};
pub use types::{ActionRequest, AssistantReply};

/// A text-completion backend: prompt in, generated text out.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Generate at most `max_tokens` tokens continuing `prompt`.
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, ModelError>;
}

/// Create a completion provider from config.
///
/// Supported providers: `"openai"` (any `/completions`-compatible server) and `"ollama"`.
pub fn create_provider(config: &ModelConfig) -> Result<Box<dyn CompletionProvider>, ModelError> {
    match config.provider.as_str() {
        "openai" => Ok(Box::new(openai::OpenAiCompletionProvider::new(config)?)),
        "ollama" => Ok(Box::new(ollama::OllamaProvider::new(config)?)),
        other => Err(ModelError::UnknownProvider(other.to_string())),
    }
}

/// Outcome of asking the model for a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The model answered in the requested schema.
    Structured(AssistantReply),
    /// The model answered, but not in the schema.
    PlainText(String),
    /// The provider call itself failed.
    Failed(String),
}

impl From<ModelOutput> for Completion {
    fn from(output: ModelOutput) -> Self {
        match output {
            ModelOutput::Structured(reply) => Self::Structured(reply),
            ModelOutput::PlainText(text) => Self::PlainText(text),
        }
    }
}

/// Send `prompt` to the provider and interpret what comes back.
pub async fn complete_reply(
    provider: &dyn CompletionProvider,
    prompt: &str,
    max_tokens: u32,
) -> Completion {
    tracing::debug!(provider = provider.name(), prompt_len = prompt.len(), max_tokens, "requesting completion");
    match provider.complete(prompt, max_tokens).await {
        Ok(text) => {
            tracing::debug!(output_len = text.len(), "completion received");
            parse_reply(&text).into()
        }
        Err(e) => {
            tracing::error!(provider = provider.name(), error = %e, "completion failed");
            Completion::Failed(e.to_string())
        }
    }
}
