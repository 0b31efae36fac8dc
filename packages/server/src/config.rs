//! Relay tuning: deadlines, frame limit and outbound queue capacity.

use std::time::Duration;

use crate::domain::ConfigError;

/// Time allowed to write a single frame to the peer
pub const DEFAULT_WRITE_WAIT: Duration = Duration::from_secs(10);

/// Time allowed between two inbound frames (including pongs)
pub const DEFAULT_PONG_WAIT: Duration = Duration::from_secs(60);

/// Maximum inbound message size in bytes
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 512;

/// Capacity of each connection's outbound queue
pub const DEFAULT_SEND_BUFFER_SIZE: usize = 256;

/// Per-connection tuning shared by every pump
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayConfig {
    pub write_wait: Duration,
    pub pong_wait: Duration,
    pub max_message_size: usize,
    pub send_buffer_size: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            write_wait: DEFAULT_WRITE_WAIT,
            pong_wait: DEFAULT_PONG_WAIT,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            send_buffer_size: DEFAULT_SEND_BUFFER_SIZE,
        }
    }
}

impl RelayConfig {
    /// Interval between liveness probes.
    ///
    /// Always 90% of `pong_wait`, so a quiet but responsive peer answers at
    /// least one probe before its read deadline expires.
    pub fn ping_period(&self) -> Duration {
        self.pong_wait * 9 / 10
    }

    /// Reject tuning that would make the pumps spin or never admit a frame.
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.write_wait.is_zero() {
            return Err(ConfigError::Zero("write_wait"));
        }
        if self.ping_period().is_zero() {
            return Err(ConfigError::Zero("pong_wait"));
        }
        if self.max_message_size == 0 {
            return Err(ConfigError::Zero("max_message_size"));
        }
        if self.send_buffer_size == 0 {
            return Err(ConfigError::Zero("send_buffer_size"));
        }
        Ok(self)
    }
}
