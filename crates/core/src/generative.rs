//! Generative Text Backend Client
//!
//! This module defines the contract for the text-completion service that
//! produces assistant replies, plus an implementation for any
//! OpenAI-compatible API (OpenAI itself, or Gemini through its
//! OpenAI-compatible endpoint).

use async_openai::{
    Client,
    config::OpenAIConfig,
    error::OpenAIError,
    types::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs},
};
use async_trait::async_trait;

/// Errors from the generative backend.
///
/// These never reach a client connection directly; the turn processor
/// converts every variant into a fixed fallback reply.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("generative backend request failed: {0}")]
    Backend(#[from] OpenAIError),
    #[error("generative backend returned no text")]
    EmptyResponse,
    #[error("generative backend call exceeded {0} seconds")]
    TimedOut(u64),
}

/// A client capable of completing a fully assembled prompt.
///
/// The gateway and turn processor depend on this trait rather than a
/// concrete client so that backends can be swapped and tests can run
/// without network access.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerativeClient: Send + Sync {
    /// Completes `prompt` and returns the generated text.
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// An implementation of `GenerativeClient` for any OpenAI-compatible API.
pub struct OpenAICompatibleClient {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAICompatibleClient {
    /// Creates a new client for an OpenAI-compatible service.
    ///
    /// # Arguments
    ///
    /// * `config` - API key and base URL for the target service.
    /// * `model` - The model identifier to use (e.g., "gemini-2.0-flash").
    pub fn new(config: OpenAIConfig, model: String) -> Self {
        Self {
            client: Client::with_config(config),
            model,
        }
    }
}

#[async_trait]
impl GenerativeClient for OpenAICompatibleClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![
                ChatCompletionRequestUserMessageArgs::default()
                    .content(prompt)
                    .build()?
                    .into(),
            ])
            .build()?;

        let response = self.client.chat().create(request).await?;

        let text = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or(GenerationError::EmptyResponse)?;

        Ok(text)
    }
}
