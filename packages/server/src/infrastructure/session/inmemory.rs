//! InMemory SessionStore 実装
//!
//! ドメイン層が定義する SessionStore trait の具体的な実装。
//! プロセス再起動でセッションは失われます。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::{Session, SessionError, SessionStore};

/// インメモリ SessionStore 実装
#[derive(Default)]
pub struct InMemorySessionStore {
    /// Key: セッションキー（UUID v4 文字列）
    /// Value: セッションの値
    sessions: Mutex<HashMap<String, HashMap<String, String>>>,
}

impl InMemorySessionStore {
    /// 新しい InMemorySessionStore を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 保存済みセッション数を取得
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load_or_create(&self, key: Option<&str>) -> Result<Session, SessionError> {
        if let Some(key) = key {
            let sessions = self.sessions.lock().await;
            if let Some(values) = sessions.get(key) {
                return Ok(Session::restore(key, values.clone()));
            }
            tracing::debug!("Unknown session key, creating a new session");
        }

        Ok(Session::new(Uuid::new_v4().to_string()))
    }

    async fn save(&self, session: &Session) -> Result<(), SessionError> {
        let mut sessions = self.sessions.lock().await;
        sessions.insert(session.key().to_string(), session.values().clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_without_key_creates_new_session() {
        // テスト項目: キーなしで読み込むと新規セッションが作られる
        // given (前提条件):
        let store = InMemorySessionStore::new();

        // when (操作):
        let session = store.load_or_create(None).await.unwrap();

        // then (期待する結果):
        assert!(session.is_new());
        assert!(Uuid::parse_str(session.key()).is_ok());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_saved_session_is_restored() {
        // テスト項目: 保存したセッションは同じキーで復元される
        // given (前提条件):
        let store = InMemorySessionStore::new();
        let mut session = store.load_or_create(None).await.unwrap();
        session.set("userId", "alice");
        store.save(&session).await.unwrap();

        // when (操作):
        let restored = store.load_or_create(Some(session.key())).await.unwrap();

        // then (期待する結果):
        assert!(!restored.is_new());
        assert_eq!(restored.key(), session.key());
        assert_eq!(restored.get("userId"), Some("alice"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_unknown_key_creates_fresh_session() {
        // テスト項目: 存在しないキーでは別のキーを持つ新規セッションが作られる
        // given (前提条件):
        let store = InMemorySessionStore::new();

        // when (操作):
        let session = store.load_or_create(Some("forged")).await.unwrap();

        // then (期待する結果):
        assert!(session.is_new());
        assert_ne!(session.key(), "forged");
    }
}
