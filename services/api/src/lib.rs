//! Carelink API Library Crate
//!
//! This library contains all the core logic for the Carelink gateway service:
//! the application state, configuration, REST handlers, WebSocket gateway,
//! and routing. The binaries under `bin/` are thin wrappers around it.

pub mod config;
pub mod handlers;
pub mod models;
pub mod router;
pub mod state;
pub mod ws;
