//! Shared Application State
//!
//! This module defines the `AppState` struct, which holds all shared,
//! clonable resources: the context enricher, the turn processor, and the
//! registry of open WebSocket connections.

use crate::ws::ConnectionRegistry;
use carelink_core::{context::ContextEnricher, turn::TurnProcessor};
use std::sync::Arc;
use tracing::warn;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub enricher: Arc<ContextEnricher>,
    pub turns: Arc<TurnProcessor>,
    pub registry: Arc<ConnectionRegistry>,
}

impl AppState {
    /// Runs one enrich → generate cycle and returns the assistant's reply.
    ///
    /// This is the shared core of both the WebSocket path and the one-shot
    /// REST path. A records backend fault is non-fatal here: conversational
    /// continuity outweighs context completeness, so the turn proceeds with
    /// an unenriched prompt.
    pub async fn run_turn(&self, user_text: &str, patient_id: Option<&str>) -> String {
        let context = match self.enricher.enrich(patient_id).await {
            Ok(context) => context,
            Err(e) => {
                warn!(error = %e, "Records lookup failed; continuing without patient context");
                None
            }
        };

        self.turns.process(user_text, context.as_deref()).await
    }
}
