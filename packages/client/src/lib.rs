//! Interactive CLI client for the Hiroba relay.
//!
//! Reads lines from the terminal, sends each as a text frame, and prints every
//! frame the relay broadcasts back, its own messages included.

mod domain;
mod formatter;
mod runner;
mod session;
mod ui;

pub mod error;

pub use runner::run_client;
