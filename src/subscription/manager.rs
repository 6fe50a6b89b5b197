use crate::sim::{SimulationEngine, WorldSnapshot};
use crate::subscription::{ChannelSink, SubscriberId};
use axum::extract::ws::{Message, WebSocket};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Manages a single WebSocket connection's membership in the registry
pub struct ConnectionManager {
    id: SubscriberId,
    engine: Arc<SimulationEngine>,
}

impl ConnectionManager {
    pub fn new(engine: Arc<SimulationEngine>) -> Self {
        Self {
            id: Uuid::new_v4(),
            engine,
        }
    }

    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Handle WebSocket connection lifecycle.
    ///
    /// Registers on entry, forwards every snapshot as a JSON text frame, and
    /// unregisters on exit whatever the reason.
    pub async fn handle(self, mut socket: WebSocket, buffer: usize) {
        let (sink, mut snapshot_rx) = ChannelSink::channel(buffer);
        self.engine.registry().register(self.id, Arc::new(sink));
        info!(subscriber = %self.id, "WebSocket connection established");

        loop {
            tokio::select! {
                // Handle incoming client messages
                msg = socket.recv() => {
                    match msg {
                        Some(Ok(Message::Close(_))) | None => {
                            info!(subscriber = %self.id, "WebSocket client disconnected");
                            break;
                        }
                        Some(Ok(Message::Ping(data))) => {
                            if let Err(e) = socket.send(Message::Pong(data)).await {
                                error!(error = %e, "Failed to send pong");
                                break;
                            }
                        }
                        Some(Ok(_)) => {
                            // Clients only listen; ignore text, binary, pong
                        }
                        Some(Err(e)) => {
                            warn!(subscriber = %self.id, error = %e, "WebSocket error");
                            break;
                        }
                    }
                }

                // Forward snapshots pushed by the clock
                snapshot = snapshot_rx.recv() => {
                    match snapshot {
                        Some(snapshot) => {
                            if let Err(e) = send_snapshot(&mut socket, &snapshot).await {
                                debug!(subscriber = %self.id, error = %e, "Failed to send snapshot");
                                break;
                            }
                        }
                        None => {
                            // Registry dropped our sink
                            debug!(subscriber = %self.id, "Subscriber pruned by registry");
                            break;
                        }
                    }
                }
            }
        }

        self.engine.registry().unregister(&self.id);
        info!(subscriber = %self.id, "WebSocket connection closed");
    }
}

async fn send_snapshot(socket: &mut WebSocket, snapshot: &WorldSnapshot) -> anyhow::Result<()> {
    let json = serde_json::to_string(snapshot)?;
    socket.send(Message::Text(json)).await?;
    Ok(())
}

