//! Domain types of the relay.
//!
//! Pure values and checks with no I/O: connection identity, relayed messages,
//! admission rules for the upgrade endpoint, the session collaborator
//! interface, and the error taxonomy.

pub mod admission;
pub mod connection;
pub mod error;
pub mod session;

pub use admission::check_admission;
pub use connection::{ConnectionId, ConnectionInfo, RelayMessage};
pub use error::{AdmissionError, ConfigError, HubError, PumpError, SessionError};
pub use session::{Session, SessionStore};
