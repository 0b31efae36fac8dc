//! Utilities shared by the Hiroba relay server and its CLI client.

pub mod logger;
pub mod time;
