//! Background connectivity probing.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::core::transport::ChatTransport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Checking,
    Connected,
    Disconnected,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionStatus::Checking => f.write_str("checking"),
            ConnectionStatus::Connected => f.write_str("connected"),
            ConnectionStatus::Disconnected => f.write_str("disconnected"),
        }
    }
}

/// Probes the server once on spawn and then every `interval` until shut down or dropped.
///
/// A probe that has not answered within one interval counts as disconnected.
pub struct ConnectionMonitor {
    status_rx: watch::Receiver<ConnectionStatus>,
    cancel_token: CancellationToken,
}

impl ConnectionMonitor {
    pub fn spawn(transport: Arc<dyn ChatTransport>, interval: Duration) -> Self {
        let (status_tx, status_rx) = watch::channel(ConnectionStatus::Checking);
        let cancel_token = CancellationToken::new();
        let task_token = cancel_token.clone();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = task_token.cancelled() => break,
                    // The first tick completes immediately, giving the startup probe.
                    _ = ticker.tick() => {}
                }

                let status = tokio::select! {
                    _ = task_token.cancelled() => break,
                    result = tokio::time::timeout(interval, transport.probe()) => match result {
                        Ok(Ok(())) => ConnectionStatus::Connected,
                        Ok(Err(err)) => {
                            debug!(error = %err, "connection probe failed");
                            ConnectionStatus::Disconnected
                        }
                        Err(_) => {
                            debug!(?interval, "connection probe timed out");
                            ConnectionStatus::Disconnected
                        }
                    },
                };

                status_tx.send_if_modified(|current| {
                    let changed = *current != status;
                    *current = status;
                    changed
                });
            }
            debug!("connection monitor stopped");
        });

        Self {
            status_rx,
            cancel_token,
        }
    }

    pub fn status(&self) -> ConnectionStatus {
        *self.status_rx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<ConnectionStatus> {
        self.status_rx.clone()
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}

impl Drop for ConnectionMonitor {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}
