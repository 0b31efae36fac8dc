//! One-shot close coordination between the two pumps of a connection.

use std::sync::Arc;

use tokio::sync::watch;

/// Shared close flag for one connection.
///
/// The first `close()` wins and wakes everything waiting in `closed()`.
/// Later calls are no-ops, so both pumps may close unconditionally when they
/// stop.
#[derive(Debug, Clone)]
pub struct CloseGuard {
    state: Arc<watch::Sender<bool>>,
}

impl Default for CloseGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl CloseGuard {
    pub fn new() -> Self {
        let (state, _) = watch::channel(false);
        Self {
            state: Arc::new(state),
        }
    }

    /// Mark the connection closed. Returns `true` only for the first caller.
    pub fn close(&self) -> bool {
        self.state.send_if_modified(|closed| {
            if *closed {
                false
            } else {
                *closed = true;
                true
            }
        })
    }

    pub fn is_closed(&self) -> bool {
        *self.state.borrow()
    }

    /// Resolve once the connection has been closed by anyone.
    pub async fn closed(&self) {
        let mut rx = self.state.subscribe();
        // The sender lives in `self`, so `wait_for` cannot fail here.
        let _ = rx.wait_for(|closed| *closed).await;
    }
}
