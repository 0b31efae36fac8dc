//! Inbound pump: transport → hub.

use std::fmt::Display;

use axum::extract::ws::Message;
use futures_util::{Stream, StreamExt};
use tokio::time::{Instant, timeout_at};

use crate::{
    config::RelayConfig,
    domain::{ConnectionId, PumpError, RelayMessage},
    hub::HubHandle,
};

use super::close::CloseGuard;

/// Pump frames from the peer into the hub's broadcast path.
///
/// Every inbound frame, pongs included, pushes the read deadline back by
/// `pong_wait`. When the pump stops for any reason it requests unregistration
/// of its own connection and closes the guard, which wakes the write pump.
pub async fn read_pump<R, E>(
    mut stream: R,
    id: ConnectionId,
    hub: HubHandle,
    closer: CloseGuard,
    config: RelayConfig,
) -> Result<(), PumpError>
where
    R: Stream<Item = Result<Message, E>> + Unpin,
    E: Display,
{
    let result = read_loop(&mut stream, id, &hub, &closer, &config).await;

    if let Err(e) = hub.unregister(id) {
        tracing::debug!("Read pump of {} could not unregister: {}", id, e);
    }
    closer.close();

    result
}

async fn read_loop<R, E>(
    stream: &mut R,
    id: ConnectionId,
    hub: &HubHandle,
    closer: &CloseGuard,
    config: &RelayConfig,
) -> Result<(), PumpError>
where
    R: Stream<Item = Result<Message, E>> + Unpin,
    E: Display,
{
    let mut deadline = Instant::now() + config.pong_wait;

    loop {
        let next = tokio::select! {
            biased;
            _ = closer.closed() => {
                tracing::debug!("Read pump of {} stopped: connection closed", id);
                return Ok(());
            }
            next = timeout_at(deadline, stream.next()) => next,
        };

        let frame = match next {
            Err(_) => return Err(PumpError::ReadTimeout(config.pong_wait)),
            Ok(None) => {
                tracing::debug!("Read pump of {} stopped: stream ended", id);
                return Ok(());
            }
            Ok(Some(Err(e))) => return Err(PumpError::transport(e)),
            Ok(Some(Ok(frame))) => frame,
        };

        deadline = Instant::now() + config.pong_wait;

        match frame {
            Message::Text(text) => {
                let message = RelayMessage::new(id, text);
                if message.len() > config.max_message_size {
                    return Err(PumpError::MessageTooLarge {
                        size: message.len(),
                        limit: config.max_message_size,
                    });
                }
                tracing::debug!("Received {} bytes from {}", message.len(), id);
                hub.broadcast(message)?;
            }
            Message::Binary(data) => {
                tracing::warn!("Ignoring {} byte binary frame from {}", data.len(), id);
            }
            Message::Ping(_) => tracing::trace!("Ping from {}", id),
            Message::Pong(_) => tracing::trace!("Pong from {}", id),
            Message::Close(_) => {
                tracing::info!("Connection {} requested close", id);
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{convert::Infallible, time::Duration};

    use axum::body::Bytes;
    use futures_util::stream;

    use crate::{connection::Connection, hub::Hub};

    fn text(payload: &str) -> Result<Message, Infallible> {
        Ok(Message::Text(payload.into()))
    }

    #[tokio::test]
    async fn test_text_frames_are_broadcast_to_everyone() {
        // テスト項目: 受信したテキストフレームは送信者を含む全員にブロードキャストされる
        // given (前提条件):
        let (hub, _task) = Hub::spawn();
        let (sender, mut sender_queue) = Connection::new(8);
        let (other, mut other_queue) = Connection::new(8);
        let id = sender.id();
        hub.register(sender).unwrap();
        hub.register(other).unwrap();
        let frames = stream::iter(vec![text("hello"), text("world")]);

        // when (操作):
        let result = read_pump(frames, id, hub.clone(), CloseGuard::new(), RelayConfig::default()).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(sender_queue.recv().await.unwrap().as_str(), "hello");
        assert_eq!(sender_queue.recv().await.unwrap().as_str(), "world");
        assert_eq!(other_queue.recv().await.unwrap().as_str(), "hello");
        assert_eq!(other_queue.recv().await.unwrap().as_str(), "world");
    }

    #[tokio::test]
    async fn test_stop_unregisters_and_closes() {
        // テスト項目: 停止時に自身を登録解除し、CloseGuard を閉じる
        // given (前提条件):
        let (hub, _task) = Hub::spawn();
        let (connection, mut queue) = Connection::new(8);
        let id = connection.id();
        hub.register(connection).unwrap();
        let closer = CloseGuard::new();
        let frames = stream::iter(vec![Ok::<_, Infallible>(Message::Close(None))]);

        // when (操作):
        let result = read_pump(frames, id, hub.clone(), closer.clone(), RelayConfig::default()).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert!(closer.is_closed());
        assert!(queue.recv().await.is_none());
        assert!(hub.connections().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_oversized_frame_terminates() {
        // テスト項目: 上限を超えるフレームはプロトコル違反として接続を終了させる
        // given (前提条件):
        let (hub, _task) = Hub::spawn();
        let (connection, mut queue) = Connection::new(8);
        let id = connection.id();
        hub.register(connection).unwrap();
        let oversized = "x".repeat(513);
        let frames = stream::iter(vec![text(&oversized), text("never relayed")]);

        // when (操作):
        let result = read_pump(frames, id, hub.clone(), CloseGuard::new(), RelayConfig::default()).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(PumpError::MessageTooLarge {
                size: 513,
                limit: 512
            })
        );
        assert!(queue.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_frame_at_limit_is_accepted() {
        // テスト項目: ちょうど上限サイズのフレームは受け付けられる
        // given (前提条件):
        let (hub, _task) = Hub::spawn();
        let (connection, mut queue) = Connection::new(8);
        let id = connection.id();
        hub.register(connection).unwrap();
        let payload = "x".repeat(512);
        let frames = stream::iter(vec![text(&payload)]);

        // when (操作):
        let result = read_pump(frames, id, hub.clone(), CloseGuard::new(), RelayConfig::default()).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(queue.recv().await.unwrap().as_str().len(), 512);
    }

    #[tokio::test]
    async fn test_transport_error_terminates() {
        // テスト項目: トランスポートエラーで接続が終了する
        // given (前提条件):
        let (hub, _task) = Hub::spawn();
        let id = ConnectionId::generate();
        let frames = stream::iter(vec![Err::<Message, _>("connection reset")]);

        // when (操作):
        let result = read_pump(frames, id, hub, CloseGuard::new(), RelayConfig::default()).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(PumpError::Transport("connection reset".to_string()))
        );
    }

    #[tokio::test]
    async fn test_binary_frames_are_ignored() {
        // テスト項目: バイナリフレームは中継されず、接続も維持される
        // given (前提条件):
        let (hub, _task) = Hub::spawn();
        let (connection, mut queue) = Connection::new(8);
        let id = connection.id();
        hub.register(connection).unwrap();
        let frames = stream::iter(vec![
            Ok::<_, Infallible>(Message::Binary(Bytes::from_static(b"\x00\x01"))),
            text("after binary"),
        ]);

        // when (操作):
        let result = read_pump(frames, id, hub.clone(), CloseGuard::new(), RelayConfig::default()).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(queue.recv().await.unwrap().as_str(), "after binary");
    }

    #[tokio::test(start_paused = true)]
    async fn test_silent_peer_times_out_after_pong_wait() {
        // テスト項目: 何も送らない相手は pong_wait 経過後に切断される
        // given (前提条件):
        let (hub, _task) = Hub::spawn();
        let (connection, _queue) = Connection::new(8);
        let id = connection.id();
        hub.register(connection).unwrap();
        let config = RelayConfig::default();
        let started = Instant::now();

        // when (操作):
        let result = read_pump(
            stream::pending::<Result<Message, Infallible>>(),
            id,
            hub.clone(),
            CloseGuard::new(),
            config,
        )
        .await;

        // then (期待する結果):
        assert_eq!(result, Err(PumpError::ReadTimeout(config.pong_wait)));
        assert!(started.elapsed() >= config.pong_wait);
        assert!(started.elapsed() < config.pong_wait + Duration::from_secs(1));
        assert!(hub.connections().await.unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_pongs_keep_quiet_peer_alive() {
        // テスト項目: アプリケーションフレームを送らなくても pong を返す相手は切断されない
        // given (前提条件):
        let (hub, _task) = Hub::spawn();
        let (connection, _queue) = Connection::new(8);
        let id = connection.id();
        hub.register(connection).unwrap();
        let config = RelayConfig::default();
        let ping_period = config.ping_period();
        let pongs = Box::pin(stream::unfold((), move |_| async move {
            tokio::time::sleep(ping_period).await;
            Some((Ok::<_, Infallible>(Message::Pong(Bytes::new())), ()))
        }));

        // when (操作):
        // 10 probe cycles, far longer than a single pong_wait
        let outcome = tokio::time::timeout(
            ping_period * 10,
            read_pump(pongs, id, hub.clone(), CloseGuard::new(), config),
        )
        .await;

        // then (期待する結果):
        assert!(outcome.is_err(), "pump should still be running");
        let live = hub.connections().await.unwrap();
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].id, id);
    }

    #[tokio::test(start_paused = true)]
    async fn test_peer_that_stops_ponging_times_out_within_one_window() {
        // テスト項目: pong が途絶えた相手は最後の pong から pong_wait 以内に切断される
        // given (前提条件):
        let (hub, _task) = Hub::spawn();
        let id = ConnectionId::generate();
        let config = RelayConfig::default();
        let ping_period = config.ping_period();
        let pongs = Box::pin(
            stream::unfold(0u32, move |count| async move {
                if count == 3 {
                    return None;
                }
                tokio::time::sleep(ping_period).await;
                Some((Ok::<_, Infallible>(Message::Pong(Bytes::new())), count + 1))
            })
            .chain(stream::pending()),
        );
        let started = Instant::now();

        // when (操作):
        let result = read_pump(pongs, id, hub, CloseGuard::new(), config).await;

        // then (期待する結果):
        assert_eq!(result, Err(PumpError::ReadTimeout(config.pong_wait)));
        let last_pong = ping_period * 3;
        assert!(started.elapsed() >= last_pong + config.pong_wait);
        assert!(started.elapsed() < last_pong + config.pong_wait + Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_closed_guard_stops_pump() {
        // テスト項目: もう一方のポンプが閉じると読み取りポンプも停止する
        // given (前提条件):
        let (hub, _task) = Hub::spawn();
        let closer = CloseGuard::new();
        closer.close();

        // when (操作):
        let result = read_pump(
            stream::pending::<Result<Message, Infallible>>(),
            ConnectionId::generate(),
            hub,
            closer,
            RelayConfig::default(),
        )
        .await;

        // then (期待する結果):
        assert!(result.is_ok());
    }
}
