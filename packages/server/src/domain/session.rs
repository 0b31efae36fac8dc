//! Session collaborator interface.
//!
//! Sessions map a browser cookie to an opaque key/value record. The relay core
//! never reads them; they exist so a request can eventually be associated
//! with a user identity.

use std::collections::HashMap;

use async_trait::async_trait;

use super::error::SessionError;

/// Name of the cookie carrying the session key
pub const SESSION_COOKIE: &str = "userSession";

/// One session record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    key: String,
    is_new: bool,
    values: HashMap<String, String>,
}

impl Session {
    /// Create an empty session that has not been saved yet
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            is_new: true,
            values: HashMap::new(),
        }
    }

    /// Rebuild a previously saved session
    pub fn restore(key: impl Into<String>, values: HashMap<String, String>) -> Self {
        Self {
            key: key.into(),
            is_new: false,
            values,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// `true` until the session has been saved once
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn values(&self) -> &HashMap<String, String> {
        &self.values
    }
}

/// Session store trait
///
/// Implementations live in the infrastructure layer.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load the session for `key`, or create a fresh one when the key is
    /// absent or unknown.
    async fn load_or_create(&self, key: Option<&str>) -> Result<Session, SessionError>;

    /// Persist the session
    async fn save(&self, session: &Session) -> Result<(), SessionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_empty() {
        // テスト項目: 新規セッションは空で is_new が true
        // given (前提条件):

        // when (操作):
        let session = Session::new("abc");

        // then (期待する結果):
        assert!(session.is_new());
        assert_eq!(session.key(), "abc");
        assert!(session.values().is_empty());
    }

    #[test]
    fn test_set_overwrites_value() {
        // テスト項目: 同じキーへの set は値を上書きする
        // given (前提条件):
        let mut session = Session::new("abc");
        session.set("userId", "alice");

        // when (操作):
        session.set("userId", "bob");

        // then (期待する結果):
        assert_eq!(session.get("userId"), Some("bob"));
        assert_eq!(session.get("missing"), None);
    }
}
