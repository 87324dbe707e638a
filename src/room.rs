//! Room struct definition
//!
//! A room owns the set of open connections, the last-broadcast content,
//! and a last-activity timestamp, all behind a single exclusive lock.
//! Room code paths never touch the registry lock; the registry may hold
//! its own lock while acquiring a room's (see `registry::RoomRegistry`).

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::debug;

use crate::connection::ConnectionHandle;
use crate::error::SendError;
use crate::types::{ConnectionId, RoomCode};

/// Mutable room state, guarded by the room lock
#[derive(Debug)]
struct RoomInner {
    /// Open connections in this room
    connections: HashMap<ConnectionId, ConnectionHandle>,
    /// Last broadcast content; empty means "no content yet"
    content: String,
    /// Refreshed on every join and content update
    last_activity: Instant,
}

/// A named broadcast domain
///
/// All mutation goes through the internal lock. Broadcast holds the lock
/// for the full fan-out pass, so delivery within a room is serialized;
/// sends are non-blocking (see `ConnectionHandle::send`), which bounds
/// how long the lock is held.
#[derive(Debug)]
pub struct Room {
    /// Room code for identification
    pub code: RoomCode,
    inner: Mutex<RoomInner>,
}

impl Room {
    /// Create a new empty room with the given code
    pub fn new(code: RoomCode) -> Self {
        Self {
            code,
            inner: Mutex::new(RoomInner {
                connections: HashMap::new(),
                content: String::new(),
                last_activity: Instant::now(),
            }),
        }
    }

    /// Register a connection, replaying cached content to it first
    ///
    /// If the room has content, it is delivered to the new connection
    /// before registration, so the replay is ordered before any
    /// subsequent broadcast. The connection is registered and
    /// `last_activity` refreshed even when replay delivery fails; the
    /// failure is returned for the caller to log, the join still stands.
    pub async fn attach(&self, conn: ConnectionHandle) -> Result<(), SendError> {
        let mut inner = self.inner.lock().await;
        let replay = if inner.content.is_empty() {
            Ok(())
        } else {
            conn.send(inner.content.clone())
        };
        inner.connections.insert(conn.id, conn);
        inner.last_activity = Instant::now();
        replay
    }

    /// Remove a connection from the room; idempotent if already absent
    pub async fn detach(&self, id: &ConnectionId) {
        let mut inner = self.inner.lock().await;
        inner.connections.remove(id);
    }

    /// Replace the cached content and refresh the activity timestamp
    pub async fn update_content(&self, text: &str) {
        let mut inner = self.inner.lock().await;
        inner.content = text.to_string();
        inner.last_activity = Instant::now();
    }

    /// Send `text` to every connection in the room, sender included
    ///
    /// Connections whose send fails are removed in the same pass; this
    /// is how dead peers are garbage-collected without a separate
    /// liveness check. Returns the number of successful deliveries.
    pub async fn broadcast(&self, text: &str) -> usize {
        let mut inner = self.inner.lock().await;

        let mut failed = Vec::new();
        let mut delivered = 0;
        for (id, conn) in inner.connections.iter() {
            match conn.send(text.to_string()) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    debug!("Dropping connection {} from room {}: {}", id, self.code, e);
                    failed.push(*id);
                }
            }
        }
        for id in failed {
            inner.connections.remove(&id);
        }
        delivered
    }

    /// Check whether the room is empty and has been idle past `retention`
    pub async fn is_idle(&self, retention: Duration) -> bool {
        let inner = self.inner.lock().await;
        inner.connections.is_empty() && inner.last_activity.elapsed() > retention
    }

    /// Number of connections currently in the room
    pub async fn connection_count(&self) -> usize {
        self.inner.lock().await.connections.len()
    }

    /// Current cached content
    pub async fn content(&self) -> String {
        self.inner.lock().await.content.clone()
    }
}
