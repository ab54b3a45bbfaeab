//! WebSocket connection loop.
//!
//! Replays the stored views, then handles the read/write loop for a
//! single WebSocket connection: inbound frames go to the
//! [`RelayService`], broadcasts from other connections go out.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{Sink, SinkExt, StreamExt};

use super::messages;
use crate::service::{RelayService, Session};

/// Runs a single WebSocket connection until either side closes it.
pub async fn run_connection(socket: WebSocket, relay: Arc<RelayService>) {
    let mut session = relay.connect().await;
    let id = session.id();
    let (mut ws_tx, mut ws_rx) = socket.split();

    if send_replay(&mut session, &mut ws_tx).await {
        loop {
            tokio::select! {
                // Incoming frame from the client
                msg = ws_rx.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => match messages::decode(&text) {
                            Ok(event) => {
                                relay.handle(id, event).await;
                            }
                            Err(e) => {
                                tracing::warn!(
                                    connection = %id,
                                    error = %e,
                                    "dropping malformed frame"
                                );
                            }
                        },
                        Some(Ok(Message::Close(_))) | None => break,
                        Some(Err(e)) => {
                            tracing::debug!(connection = %id, error = %e, "ws read failed");
                            break;
                        }
                        _ => {}
                    }
                }
                // Event from another connection
                event = session.next_event() => {
                    let Some(event) = event else { break };
                    match messages::encode(&event) {
                        Ok(json) => {
                            if ws_tx.send(Message::text(json)).await.is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            tracing::warn!(
                                connection = %id,
                                error = %e,
                                "failed to encode event"
                            );
                        }
                    }
                }
            }
        }
    }

    relay.disconnect(id).await;
    tracing::debug!(connection = %id, "ws connection closed");
}

/// Sends every view stored at connect time. Returns `false` if the socket
/// went away.
async fn send_replay<S>(session: &mut Session, ws_tx: &mut S) -> bool
where
    S: Sink<Message> + Unpin,
{
    for view in session.take_replay() {
        match messages::encode_replay(view) {
            Ok(json) => {
                if ws_tx.send(Message::text(json)).await.is_err() {
                    return false;
                }
            }
            Err(e) => {
                tracing::warn!(
                    connection = %session.id(),
                    error = %e,
                    "failed to encode replay"
                );
            }
        }
    }
    true
}
