//! Manages the WebSocket connection lifecycle for the chat gateway.
//!
//! Each connection gets its own task and runs a strictly sequential turn
//! loop: receive a frame, decode it, enrich, generate, then send the framed
//! reply (payload frame followed by the terminal frame). Turn N+1 is not
//! read before turn N's terminal frame has been sent. The connection is
//! registered on accept and unregistered exactly once, on every exit path.

use super::protocol::{ClientTurn, ServerFrame};
use crate::state::AppState;
use anyhow::{Context, Result};
use axum::{
    extract::{
        ConnectInfo, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt, stream::SplitSink};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

/// Sent when an inbound frame cannot be decoded. The connection stays open.
const DECODE_APOLOGY: &str = "Sorry, I couldn't process that message.";

/// Axum handler to upgrade an HTTP connection to a WebSocket.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    State(state): State<Arc<AppState>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state, peer))
}

/// Entry point for an individual WebSocket connection.
///
/// Registration and unregistration bracket the session loop so that every
/// exit path, graceful or not, releases the registry entry exactly once.
#[instrument(name = "ws_connection", skip_all, fields(connection_id, peer = %peer))]
async fn handle_socket(socket: WebSocket, state: Arc<AppState>, peer: SocketAddr) {
    let connection_id = Uuid::new_v4();
    tracing::Span::current().record("connection_id", connection_id.to_string());

    state.registry.register(connection_id, peer.to_string()).await;
    let open_connections = state.registry.count().await;
    info!(open_connections, "Client connected");

    let result = run_chat_session(socket, &state).await;

    state.registry.unregister(connection_id).await;
    let open_connections = state.registry.count().await;
    match result {
        Ok(()) => info!(open_connections, "Client disconnected"),
        Err(e) => error!(error = ?e, open_connections, "Connection terminated with error"),
    }
}

/// The per-connection turn loop.
///
/// A malformed inbound frame is answered with a normal framed apology and
/// does not close the connection. A peer close frame or a transport error
/// ends the loop; the caller handles unregistration.
async fn run_chat_session(socket: WebSocket, state: &Arc<AppState>) -> Result<()> {
    let (mut socket_tx, mut socket_rx) = socket.split();

    while let Some(msg_result) = socket_rx.next().await {
        match msg_result {
            Ok(Message::Text(text)) => {
                let reply = reply_for_message(state, &text).await;
                send_framed_reply(&mut socket_tx, reply).await?;
            }
            Ok(Message::Close(_)) => {
                info!("Client sent close frame. Shutting down connection.");
                break;
            }
            Ok(Message::Binary(_)) => {
                warn!("Ignoring unexpected binary frame.");
            }
            Ok(Message::Ping(_) | Message::Pong(_)) => {}
            Err(e) => {
                return Err(e).context("Error receiving from client WebSocket");
            }
        }
    }

    Ok(())
}

/// Produces the reply text for one inbound text frame.
///
/// Decode failures are absorbed here: the turn degrades to a fixed apology
/// and skips enrichment and generation entirely.
async fn reply_for_message(state: &AppState, raw: &str) -> String {
    match serde_json::from_str::<ClientTurn>(raw) {
        Ok(turn) => {
            info!(user_id = %turn.user_id, "Processing turn");
            state
                .run_turn(&turn.user_input, turn.patient_id.as_deref())
                .await
        }
        Err(e) => {
            warn!(error = %e, "Failed to decode inbound frame");
            DECODE_APOLOGY.to_string()
        }
    }
}

/// Sends one turn's framed reply: a payload frame carrying `text`, then the
/// terminal frame, in that order. Empty text is framed like any other reply.
async fn send_framed_reply(
    socket_tx: &mut SplitSink<WebSocket, Message>,
    text: String,
) -> Result<()> {
    send_frame(socket_tx, ServerFrame::payload(text)).await?;
    send_frame(socket_tx, ServerFrame::end()).await
}

/// A helper function to serialize and send a `ServerFrame` to the client.
async fn send_frame(
    socket_tx: &mut SplitSink<WebSocket, Message>,
    frame: ServerFrame,
) -> Result<()> {
    let serialized = serde_json::to_string(&frame)?;
    socket_tx.send(Message::Text(serialized.into())).await?;
    Ok(())
}
