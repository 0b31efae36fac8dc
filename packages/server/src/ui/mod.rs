//! HTTP surface of the relay: upgrade endpoint, health/debug endpoints and
//! the session collaborator.

mod handler;
mod server;
mod signal;
pub mod state;

pub use server::{Server, router};
