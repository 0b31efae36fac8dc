//! Outbound pump: outbound queue → transport, plus liveness probes.

use std::{fmt::Display, time::Duration};

use axum::{body::Bytes, extract::ws::Message};
use futures_util::{Sink, SinkExt};
use tokio::time::{Instant, MissedTickBehavior, interval_at, timeout};

use crate::{
    config::RelayConfig,
    domain::{ConnectionId, PumpError},
    hub::HubHandle,
};

use super::{OutboundQueue, close::CloseGuard};

/// Drain the outbound queue to the peer and probe it every `ping_period`.
///
/// This pump owns the write half of the transport, so it is the only place
/// the transport is physically closed. A close frame is sent first unless the
/// pump stopped because a write failed.
pub async fn write_pump<S>(
    mut sink: S,
    mut outbound: OutboundQueue,
    id: ConnectionId,
    hub: HubHandle,
    closer: CloseGuard,
    config: RelayConfig,
) -> Result<(), PumpError>
where
    S: Sink<Message> + Unpin,
    S::Error: Display,
{
    let result = write_loop(&mut sink, &mut outbound, id, &closer, &config).await;

    closer.close();
    if let Err(e) = hub.unregister(id) {
        tracing::debug!("Write pump of {} could not unregister: {}", id, e);
    }

    if result.is_ok()
        && let Err(e) = write_frame(&mut sink, Message::Close(None), config.write_wait).await
    {
        tracing::debug!("Failed to send close frame to {}: {}", id, e);
    }
    if timeout(config.write_wait, sink.close()).await.is_err() {
        tracing::debug!("Closing transport of {} timed out", id);
    }

    result
}

async fn write_loop<S>(
    sink: &mut S,
    outbound: &mut OutboundQueue,
    id: ConnectionId,
    closer: &CloseGuard,
    config: &RelayConfig,
) -> Result<(), PumpError>
where
    S: Sink<Message> + Unpin,
    S::Error: Display,
{
    let ping_period = config.ping_period();
    let mut ticker = interval_at(Instant::now() + ping_period, ping_period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = closer.closed() => {
                tracing::debug!("Write pump of {} stopped: connection closed", id);
                return Ok(());
            }
            next = outbound.recv() => match next {
                Some(payload) => {
                    write_frame(sink, Message::Text(payload), config.write_wait).await?;
                }
                None => {
                    tracing::debug!("Outbound queue of {} closed by the hub", id);
                    return Ok(());
                }
            },
            _ = ticker.tick() => {
                tracing::trace!("Ping to {}", id);
                write_frame(sink, Message::Ping(Bytes::new()), config.write_wait).await?;
            }
        }
    }
}

/// Send one frame under the write deadline
async fn write_frame<S>(sink: &mut S, frame: Message, write_wait: Duration) -> Result<(), PumpError>
where
    S: Sink<Message> + Unpin,
    S::Error: Display,
{
    match timeout(write_wait, sink.send(frame)).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(PumpError::transport(e)),
        Err(_) => Err(PumpError::WriteTimeout(write_wait)),
    }
}
