//! セッションストアの実装
//!
//! - `inmemory`: HashMap を使った実装
//! - 将来的に: `redis` など

pub mod inmemory;

pub use inmemory::InMemorySessionStore;
