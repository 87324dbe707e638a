//! Process-wide room registry
//!
//! Maps room codes to rooms behind its own exclusive lock, separate from
//! each room's lock. Lock ordering rule: the registry lock may be held
//! while acquiring a room lock (the sweep path does), but never the
//! reverse — callers take an `Arc<Room>` out of `lookup` and release the
//! registry lock before touching the room.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::room::Room;
use crate::types::RoomCode;

/// Registry of all active rooms
///
/// Constructed once at startup and shared via `Arc`; there is no ambient
/// global. Entries are created only by `create` and removed only by
/// `sweep`.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: Mutex<HashMap<RoomCode, Arc<Room>>>,
}

impl RoomRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new empty room and return its code
    ///
    /// Codes are not checked for collisions; a duplicate code replaces
    /// the existing room, matching the reference behavior.
    pub async fn create(&self) -> RoomCode {
        let code = RoomCode::generate();
        let room = Arc::new(Room::new(code.clone()));
        self.rooms.lock().await.insert(code.clone(), room);
        info!("Room {} created", code);
        code
    }

    /// Check whether a room with the given code is present
    pub async fn exists(&self, code: &RoomCode) -> bool {
        self.rooms.lock().await.contains_key(code)
    }

    /// Look up a room for the join path
    ///
    /// Clones the `Arc` so the registry lock is released before the
    /// caller acquires the room lock.
    pub async fn lookup(&self, code: &RoomCode) -> Option<Arc<Room>> {
        self.rooms.lock().await.get(code).cloned()
    }

    /// Remove rooms that are empty and idle past `retention`
    ///
    /// Holds the registry lock across the pass and acquires each room
    /// lock in turn, so a concurrent join either lands before the
    /// emptiness check (room survives) or after removal (lookup fails).
    /// Returns the number of rooms removed.
    pub async fn sweep(&self, retention: Duration) -> usize {
        let mut rooms = self.rooms.lock().await;

        let mut expired = Vec::new();
        for (code, room) in rooms.iter() {
            if room.is_idle(retention).await {
                expired.push(code.clone());
            }
        }
        for code in &expired {
            rooms.remove(code);
            info!("Deleted room {} after idle retention elapsed", code);
        }
        debug!("Sweep complete: {} removed, {} remain", expired.len(), rooms.len());
        expired.len()
    }

    /// Number of rooms currently registered
    pub async fn room_count(&self) -> usize {
        self.rooms.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::ConnectionHandle;

    #[tokio::test]
    async fn test_create_then_exists() {
        let registry = RoomRegistry::new();

        let code = registry.create().await;
        assert!(registry.exists(&code).await);
        assert!(!registry.exists(&RoomCode::from_string("000000".to_string())).await);
    }

    #[tokio::test]
    async fn test_lookup_unknown_room() {
        let registry = RoomRegistry::new();
        let code = RoomCode::from_string("999999".to_string());
        assert!(registry.lookup(&code).await.is_none());
    }

    #[tokio::test]
    async fn test_sweep_removes_stale_empty_room() {
        let registry = RoomRegistry::new();
        let code = registry.create().await;

        tokio::time::sleep(Duration::from_millis(10)).await;
        let removed = registry.sweep(Duration::from_millis(1)).await;

        assert_eq!(removed, 1);
        assert!(!registry.exists(&code).await);
    }

    #[tokio::test]
    async fn test_sweep_keeps_room_within_retention() {
        let registry = RoomRegistry::new();
        let code = registry.create().await;

        let removed = registry.sweep(Duration::from_secs(3600)).await;

        assert_eq!(removed, 0);
        assert!(registry.exists(&code).await);
    }

    #[tokio::test]
    async fn test_sweep_keeps_occupied_room() {
        let registry = RoomRegistry::new();
        let code = registry.create().await;

        let room = registry.lookup(&code).await.unwrap();
        let (conn, _rx) = ConnectionHandle::new();
        let id = conn.id;
        room.attach(conn).await.unwrap();

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(registry.sweep(Duration::from_millis(1)).await, 0);
        assert!(registry.exists(&code).await);

        // Once the last connection leaves and the room goes stale,
        // the next sweep reaps it.
        room.detach(&id).await;
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(registry.sweep(Duration::from_millis(1)).await, 1);
        assert!(!registry.exists(&code).await);
    }

    #[tokio::test]
    async fn test_lookup_after_sweep_fails() {
        let registry = RoomRegistry::new();
        let code = registry.create().await;
        let room = registry.lookup(&code).await.unwrap();

        tokio::time::sleep(Duration::from_millis(10)).await;
        registry.sweep(Duration::from_millis(1)).await;

        // A joiner that raced the sweep and lost sees a clean not-found;
        // an already-held Arc stays valid but unreachable.
        assert!(registry.lookup(&code).await.is_none());
        assert_eq!(room.connection_count().await, 0);
    }
}
