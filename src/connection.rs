//! Connection handle definition
//!
//! Represents one peer's duplex text stream from the room's point of
//! view: an identifier plus the outbound half (a bounded channel drained
//! by that connection's writer task).

use tokio::sync::mpsc;

use crate::error::SendError;
use crate::types::ConnectionId;

/// Outbound buffer size per connection
///
/// A peer that falls this many messages behind is treated as dead and
/// pruned on the next broadcast rather than stalling the room.
pub const OUTBOUND_BUFFER: usize = 32;

/// Handle to one open connection
///
/// Cheap to clone; the room's connection set owns one clone per peer.
/// Sends never block: a full or closed buffer is a send failure.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    /// Unique identifier for this connection
    pub id: ConnectionId,
    /// Room → connection outbound channel
    sender: mpsc::Sender<String>,
}

impl ConnectionHandle {
    /// Create a handle plus the receiver its writer task drains
    pub fn new() -> (Self, mpsc::Receiver<String>) {
        let (sender, receiver) = mpsc::channel(OUTBOUND_BUFFER);
        let handle = Self {
            id: ConnectionId::new(),
            sender,
        };
        (handle, receiver)
    }

    /// Queue a text frame for delivery to this peer
    ///
    /// Fails if the writer task has gone away (peer disconnected) or
    /// the outbound buffer is full.
    pub fn send(&self, text: String) -> Result<(), SendError> {
        self.sender.try_send(text).map_err(|e| match e {
            mpsc::error::TrySendError::Closed(_) => SendError::Closed,
            mpsc::error::TrySendError::Full(_) => SendError::Full,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_delivers_to_receiver() {
        let (handle, mut rx) = ConnectionHandle::new();

        handle.send("hello".to_string()).unwrap();
        assert_eq!(rx.recv().await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn test_send_fails_when_receiver_dropped() {
        let (handle, rx) = ConnectionHandle::new();
        drop(rx);

        assert_eq!(handle.send("hello".to_string()), Err(SendError::Closed));
    }

    #[tokio::test]
    async fn test_send_fails_when_buffer_full() {
        let (handle, _rx) = ConnectionHandle::new();

        for i in 0..OUTBOUND_BUFFER {
            handle.send(format!("msg {}", i)).unwrap();
        }
        assert_eq!(handle.send("overflow".to_string()), Err(SendError::Full));
    }
}
