//! Real-time broadcast relay.
//!
//! Browser clients hold a persistent WebSocket connection; every text frame
//! received from any of them is fanned out, unmodified, to all of them.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;

// relay core
pub mod config;
pub mod connection;
pub mod hub;
