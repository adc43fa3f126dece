//! Fan-out of drawing events among connected peers.
//!
//! The relay owns nothing but the set of connected peers. Each peer is an
//! unbounded outbox drained into its socket by the connection task, so
//! forwarding never waits on a slow client.

use std::collections::HashMap;

use nanoid::nanoid;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info};
use whiteboard_shared::{EventKind, WireError, WsMessage};

pub type PeerId = String;

/// A registered peer: its id and the frames the relay routes to it.
#[derive(Debug)]
pub struct Peer {
    pub id: PeerId,
    pub outbox: mpsc::UnboundedReceiver<String>,
}

#[derive(Debug, Default)]
pub struct Relay {
    peers: Mutex<HashMap<PeerId, mpsc::UnboundedSender<String>>>,
}

impl Relay {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn connect(&self) -> Peer {
        let id = nanoid!(10);
        let (tx, outbox) = mpsc::unbounded_channel();
        let mut peers = self.peers.lock().await;
        peers.insert(id.clone(), tx);
        info!(peer = %id, peers = peers.len(), "Peer connected");
        Peer { id, outbox }
    }

    pub async fn disconnect(&self, peer: &str) {
        let mut peers = self.peers.lock().await;
        if peers.remove(peer).is_some() {
            info!(peer = %peer, peers = peers.len(), "Peer disconnected");
        }
    }

    pub async fn peer_count(&self) -> usize {
        self.peers.lock().await.len()
    }

    /// Routes one inbound text frame. Returns the event and how many peers it reached.
    pub async fn dispatch(&self, from: &str, frame: &str) -> Result<(EventKind, usize), WireError> {
        let event = EventKind::of_frame(frame)?;
        let recipients = match event {
            EventKind::Drawing => self.on_stroke_received(from, frame).await,
            EventKind::ClearWhiteboard => self.on_clear_received(from).await?,
        };
        debug!(peer = %from, %event, recipients, "Relayed event");
        Ok((event, recipients))
    }

    /// Forwards a `drawing` frame byte-for-byte to everyone but the sender.
    pub async fn on_stroke_received(&self, from: &str, frame: &str) -> usize {
        self.fan_out(from, frame.to_owned()).await
    }

    pub async fn on_clear_received(&self, from: &str) -> Result<usize, WireError> {
        let frame = WsMessage::ClearWhiteboard.to_frame()?;
        Ok(self.fan_out(from, frame).await)
    }

    async fn fan_out(&self, from: &str, frame: String) -> usize {
        let peers = self.peers.lock().await;
        let mut delivered = 0;
        for (id, tx) in peers.iter().filter(|(id, _)| id.as_str() != from) {
            if tx.send(frame.clone()).is_ok() {
                delivered += 1;
            } else {
                // The connection task is already tearing down.
                debug!(peer = %id, "Skipped closed peer");
            }
        }
        delivered
    }
}
