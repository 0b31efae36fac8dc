//! Request handlers.

mod http;
mod session;
mod websocket;

pub use http::{debug_connections, health_check};
pub use session::login;
pub use websocket::websocket_handler;
