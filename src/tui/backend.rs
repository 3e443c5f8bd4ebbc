//! Async backend: runs gateway requests off the UI loop.
//!
//! The UI sends `BackendCommand` values over an mpsc channel; a background
//! tokio task executes them and sends `BackendResponse` values back.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::api::{self, FetchError, GatewayClient};
use crate::config::Config;
use crate::models::{IncomingResponse, LogsResponse};

/// Commands sent from the UI to the backend.
#[derive(Debug, PartialEq, Eq)]
pub enum BackendCommand {
    LoadIncoming,
    LoadOutgoing,
}

/// Responses from the backend to the UI.
#[derive(Debug)]
pub enum BackendResponse {
    Incoming(Result<IncomingResponse, FetchError>),
    Outgoing(Result<LogsResponse, FetchError>),
    /// The client could not be built (bad server URL).
    ClientError(String),
}

/// UI-side handle to the backend task.
pub struct Backend {
    cmd_tx: mpsc::UnboundedSender<BackendCommand>,
    resp_rx: mpsc::UnboundedReceiver<BackendResponse>,
}

impl Backend {
    /// Spawn the backend task for the given config.
    pub fn start(config: Config) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (resp_tx, resp_rx) = mpsc::unbounded_channel();

        tokio::spawn(backend_loop(config, cmd_rx, resp_tx));

        Self { cmd_tx, resp_rx }
    }

    /// Send a command (non-blocking).
    pub fn send(&self, cmd: BackendCommand) {
        if self.cmd_tx.send(cmd).is_err() {
            tracing::error!("Backend channel closed -- command dropped");
        }
    }

    /// Wait for the next response. `None` once the backend has exited.
    pub async fn recv(&mut self) -> Option<BackendResponse> {
        self.resp_rx.recv().await
    }

    /// Handle wired to caller-owned channel ends instead of a spawned task.
    #[cfg(test)]
    pub fn detached() -> (
        Self,
        mpsc::UnboundedReceiver<BackendCommand>,
        mpsc::UnboundedSender<BackendResponse>,
    ) {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (resp_tx, resp_rx) = mpsc::unbounded_channel();
        (Self { cmd_tx, resp_rx }, cmd_rx, resp_tx)
    }
}

async fn backend_loop(
    config: Config,
    mut cmd_rx: mpsc::UnboundedReceiver<BackendCommand>,
    resp_tx: mpsc::UnboundedSender<BackendResponse>,
) {
    let client = match GatewayClient::new(&config) {
        Ok(c) => Arc::new(c),
        Err(e) => {
            tracing::error!("Cannot create gateway client: {}", e);
            let _ = resp_tx.send(BackendResponse::ClientError(e.to_string()));
            return;
        }
    };

    while let Some(cmd) = cmd_rx.recv().await {
        let client = Arc::clone(&client);
        let resp_tx = resp_tx.clone();

        tokio::spawn(async move {
            match cmd {
                BackendCommand::LoadIncoming => {
                    let result = api::fetch_incoming(&client).await;
                    let _ = resp_tx.send(BackendResponse::Incoming(result));
                }
                BackendCommand::LoadOutgoing => {
                    let result = api::fetch_logs(&client).await;
                    let _ = resp_tx.send(BackendResponse::Outgoing(result));
                }
            }
        });
    }
}
