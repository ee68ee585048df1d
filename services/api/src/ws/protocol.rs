//! Defines the WebSocket message protocol between the chat client and the gateway.
//!
//! Inbound frames carry one conversational turn. Outbound frames follow the
//! framed response protocol: one or more payload frames carrying text, then
//! exactly one terminal frame signalling the end of the turn.

use serde::{Deserialize, Serialize};

fn default_user_id() -> String {
    "anonymous".to_string()
}

/// One inbound conversational turn, decoded from a client text frame.
#[derive(Deserialize, Debug)]
pub struct ClientTurn {
    /// The user's message. Missing input is treated as empty, not an error.
    #[serde(default)]
    pub user_input: String,
    /// Identity of the sender, used for diagnostics only.
    #[serde(default = "default_user_id")]
    pub user_id: String,
    /// Patient the conversation is about; enables context enrichment.
    pub patient_id: Option<String>,
}

/// Frames sent from the gateway to the client.
///
/// On the wire a payload frame is `{"text": "..."}` and the terminal frame
/// is `{"end": true}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum ServerFrame {
    /// Carries (part of) the reply text for the current turn.
    Payload { text: String },
    /// Marks the end of the current turn. Always the last frame of a turn.
    End { end: bool },
}

impl ServerFrame {
    pub fn payload(text: impl Into<String>) -> Self {
        ServerFrame::Payload { text: text.into() }
    }

    pub fn end() -> Self {
        ServerFrame::End { end: true }
    }
}
