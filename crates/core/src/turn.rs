//! Turn Processing
//!
//! A turn is one enrich → generate cycle: raw user text plus an optional
//! context block go in, finished assistant text comes out. This module owns
//! prompt assembly and the failure policy for the generative backend: no
//! backend fault ever escapes to the transport layer, every one of them is
//! converted into a fixed fallback reply here.

use crate::generative::{GenerationError, GenerativeClient};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

/// The system preamble used when no prompt file is configured.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a healthcare assistant for a hospital. \
Respond professionally and empathetically. Only provide medically accurate information. \
For serious medical concerns, always advise patients to contact emergency services or \
their doctor. Respect patient privacy and confidentiality. Never diagnose conditions \
or prescribe treatments.";

/// The reply substituted for any generative backend failure.
pub const FALLBACK_REPLY: &str =
    "I'm sorry, I'm having trouble processing your request right now. Please try again later.";

/// Assembles prompts and drives the generative backend for a single turn.
pub struct TurnProcessor {
    client: Arc<dyn GenerativeClient>,
    system_prompt: Arc<String>,
    generation_timeout: Duration,
}

impl TurnProcessor {
    pub fn new(
        client: Arc<dyn GenerativeClient>,
        system_prompt: Arc<String>,
        generation_timeout: Duration,
    ) -> Self {
        Self {
            client,
            system_prompt,
            generation_timeout,
        }
    }

    /// Runs one turn and returns the assistant's reply.
    ///
    /// This never fails from the caller's perspective: a backend fault or
    /// timeout is logged and replaced by `FALLBACK_REPLY`, so the framing
    /// contract of the connection is preserved.
    pub async fn process(&self, user_text: &str, context: Option<&str>) -> String {
        let prompt = self.build_prompt(user_text, context);
        debug!(prompt_len = prompt.len(), "Sending prompt to generative backend");

        let result = match tokio::time::timeout(
            self.generation_timeout,
            self.client.generate(&prompt),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(GenerationError::TimedOut(self.generation_timeout.as_secs())),
        };

        match result {
            Ok(text) => {
                debug!(reply_len = text.len(), "Received generated reply");
                text
            }
            Err(e) => {
                error!(error = %e, "Generation failed; substituting fallback reply");
                FALLBACK_REPLY.to_string()
            }
        }
    }

    /// Builds the full prompt: preamble, optional context block, user text.
    ///
    /// A turn without context must produce a prompt byte-identical to the
    /// template with the context segment simply absent.
    fn build_prompt(&self, user_text: &str, context: Option<&str>) -> String {
        let mut prompt = self.system_prompt.as_str().to_string();
        if let Some(context) = context {
            prompt.push_str(&format!("\n\nContext: {}", context));
        }
        prompt.push_str(&format!("\n\nUser: {}\nAssistant:", user_text));
        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generative::MockGenerativeClient;
    use async_trait::async_trait;

    fn processor(client: Arc<dyn GenerativeClient>) -> TurnProcessor {
        TurnProcessor::new(
            client,
            Arc::new("System preamble.".to_string()),
            Duration::from_secs(30),
        )
    }

    /// A client that captures the prompt by echoing it back as the reply.
    struct EchoClient;

    #[async_trait]
    impl GenerativeClient for EchoClient {
        async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
            Ok(prompt.to_string())
        }
    }

    /// A client that never completes within any reasonable timeout.
    struct StalledClient;

    #[async_trait]
    impl GenerativeClient for StalledClient {
        async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(String::new())
        }
    }

    #[tokio::test]
    async fn prompt_includes_context_when_present() {
        let processor = processor(Arc::new(EchoClient));
        let prompt = processor
            .process("When is my appointment?", Some("Patient name: John Doe"))
            .await;
        assert_eq!(
            prompt,
            "System preamble.\n\nContext: Patient name: John Doe\n\nUser: When is my appointment?\nAssistant:"
        );
    }

    #[tokio::test]
    async fn prompt_omits_context_segment_when_absent() {
        let processor = processor(Arc::new(EchoClient));
        let prompt = processor.process("Hello", None).await;
        assert_eq!(prompt, "System preamble.\n\nUser: Hello\nAssistant:");
        assert!(!prompt.contains("Context:"));
    }

    #[tokio::test]
    async fn backend_failure_yields_exact_fallback_reply() {
        let mut client = MockGenerativeClient::new();
        client
            .expect_generate()
            .returning(|_| Err(GenerationError::EmptyResponse));

        let reply = processor(Arc::new(client)).process("Hello", None).await;
        assert_eq!(reply, FALLBACK_REPLY);
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_backend_times_out_to_fallback_reply() {
        let reply = processor(Arc::new(StalledClient)).process("Hello", None).await;
        assert_eq!(reply, FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn successful_generation_returns_backend_text() {
        let mut client = MockGenerativeClient::new();
        client
            .expect_generate()
            .returning(|_| Ok("You are due on June 15.".to_string()));

        let reply = processor(Arc::new(client)).process("When?", None).await;
        assert_eq!(reply, "You are due on June 15.");
    }
}
