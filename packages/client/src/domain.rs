//! Domain logic for client-side operations.
//!
//! This module contains pure functions that implement business logic
//! without side effects, making them easy to test.

use tokio_tungstenite::tungstenite::http::Uri;

use crate::error::ClientError;

/// Check if the client should exit immediately based on the error type.
///
/// Admission rejections and unusable URLs will not change on retry.
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(
        error,
        ClientError::Rejected(_) | ClientError::InvalidUrl(_)
    )
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `error` - The client error that occurred
/// * `current_attempt` - The current reconnection attempt count (0-indexed)
/// * `max_attempts` - The maximum number of reconnection attempts allowed
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    // Don't reconnect if the error requires immediate exit
    if should_exit_immediately(error) {
        return false;
    }

    current_attempt < max_attempts
}

/// Derive the `Origin` header the relay expects from its websocket URL.
///
/// `ws://host:port/ws` becomes `http://host:port`; `wss` maps to `https`.
pub fn origin_for(url: &str) -> Result<String, ClientError> {
    let uri: Uri = url
        .parse()
        .map_err(|_| ClientError::InvalidUrl(url.to_string()))?;

    let scheme = match uri.scheme_str() {
        Some("ws") => "http",
        Some("wss") => "https",
        _ => return Err(ClientError::InvalidUrl(url.to_string())),
    };
    let authority = uri
        .authority()
        .ok_or_else(|| ClientError::InvalidUrl(url.to_string()))?;

    Ok(format!("{}://{}", scheme, authority))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_exit_immediately_when_rejected() {
        // テスト項目: 接続が拒否された場合、即座に終了すべきと判定される
        // given (前提条件):
        let error = ClientError::Rejected(403);

        // when (操作):
        let result = should_exit_immediately(&error);

        // then (期待する結果):
        assert!(result);
    }

    #[test]
    fn test_should_exit_immediately_with_connection_error() {
        // テスト項目: ConnectionError の場合、即座に終了すべきではないと判定される
        // given (前提条件):
        let error = ClientError::ConnectionError("network error".to_string());

        // when (操作):
        let result = should_exit_immediately(&error);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_should_attempt_reconnect_when_rejected() {
        // テスト項目: 接続が拒否された場合、再接続すべきではないと判定される
        // given (前提条件):
        let error = ClientError::Rejected(405);

        // when (操作):
        let result = should_attempt_reconnect(&error, 0, 5);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_should_attempt_reconnect_within_limit() {
        // テスト項目: 再接続回数が上限未満の場合、再接続すべきと判定される
        // given (前提条件):
        let error = ClientError::ConnectionError("network error".to_string());

        // when (操作):
        let result = should_attempt_reconnect(&error, 4, 5);

        // then (期待する結果):
        assert!(result);
    }

    #[test]
    fn test_should_attempt_reconnect_at_limit() {
        // テスト項目: 再接続回数が上限に達した場合、再接続すべきではないと判定される
        // given (前提条件):
        let error = ClientError::ConnectionError("network error".to_string());

        // when (操作):
        let result = should_attempt_reconnect(&error, 5, 5);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_origin_for_ws_url() {
        // テスト項目: ws URL から http オリジンが導出される
        // given (前提条件):
        let url = "ws://127.0.0.1:8080/ws";

        // when (操作):
        let result = origin_for(url);

        // then (期待する結果):
        assert_eq!(result, Ok("http://127.0.0.1:8080".to_string()));
    }

    #[test]
    fn test_origin_for_wss_url() {
        // テスト項目: wss URL から https オリジンが導出される
        // given (前提条件):
        let url = "wss://relay.example.com/ws";

        // when (操作):
        let result = origin_for(url);

        // then (期待する結果):
        assert_eq!(result, Ok("https://relay.example.com".to_string()));
    }

    #[test]
    fn test_origin_for_rejects_other_schemes() {
        // テスト項目: ws/wss 以外のスキームは不正な URL として扱われる
        // given (前提条件):
        let urls = ["http://127.0.0.1:8080/ws", "127.0.0.1:8080", "not a url"];

        for url in urls {
            // when (操作):
            let result = origin_for(url);

            // then (期待する結果):
            assert_eq!(result, Err(ClientError::InvalidUrl(url.to_string())));
        }
    }
}
