//! WebSocket Gateway
//!
//! This module contains the duplex side of the conversational gateway. It is
//! structured into submodules for clarity:
//!
//! - `protocol`: Defines the JSON-based message format for client-server communication.
//! - `registry`: Tracks the set of currently open connections.
//! - `session`: Manages the connection lifecycle and the per-turn loop.

pub mod protocol;
pub mod registry;
pub mod session;

pub use registry::ConnectionRegistry;
pub use session::ws_handler;
