use crate::{
    AppState,
    relay::{Peer, Relay},
};
use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use std::sync::Arc;
use tracing::{info, warn};

/// The entry point for WebSocket connections.
/// This function handles the initial upgrade from HTTP to WebSocket.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state.relay))
}

/// Runs one peer: registers it, pumps frames both ways, deregisters on exit.
async fn handle_socket(socket: WebSocket, relay: Arc<Relay>) {
    let Peer { id, mut outbox } = relay.connect().await;

    // Split the WebSocket into a sender and receiver.
    let (mut sender, mut receiver) = socket.split();

    // Task to forward frames routed to this peer out to the client.
    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = outbox.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    });

    // Task to hand incoming frames from the client to the relay.
    let mut recv_task = tokio::spawn({
        let relay = relay.clone();
        let id = id.clone();
        async move {
            while let Some(message) = receiver.next().await {
                match message {
                    Ok(Message::Text(text)) => {
                        if let Err(e) = relay.dispatch(&id, text.as_str()).await {
                            warn!(peer = %id, error = %e, "Dropped frame");
                        }
                    }
                    Ok(Message::Close(_)) => break,
                    // Binary, ping and pong frames carry nothing for the whiteboard.
                    Ok(_) => {}
                    Err(e) => {
                        warn!(peer = %id, error = %e, "WebSocket receive failed");
                        break;
                    }
                }
            }
        }
    });

    // Wait for either task to finish. If one does, the other should be aborted.
    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    relay.disconnect(&id).await;
    info!(peer = %id, "WebSocket connection closed");
}
