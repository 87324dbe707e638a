//! Basic type definitions for the relay server
//!
//! Provides newtype wrappers for type safety:
//! - `ConnectionId`: UUID-based unique connection identifier
//! - `RoomCode`: 6-digit numeric room code

use uuid::Uuid;

/// Unique connection identifier (newtype pattern)
///
/// Wraps a UUID v4 for type-safe identification of one WebSocket
/// connection. Implements Hash and Eq for use as HashMap keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(pub Uuid);

impl ConnectionId {
    /// Create a new random connection ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Room code (6-digit zero-padded numeric string)
///
/// Used to identify and join rooms. Generated randomly on create or
/// parsed from the `room` query parameter on join.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomCode(pub String);

impl RoomCode {
    /// Generate a new random 6-digit room code
    ///
    /// Codes are not checked against existing rooms; the registry
    /// accepts the (unlikely) collision by replacing the old entry.
    pub fn generate() -> Self {
        use rand::Rng;
        let n: u32 = rand::thread_rng().gen_range(0..1_000_000);
        Self(format!("{:06}", n))
    }

    /// Create a RoomCode from a caller-supplied string
    pub fn from_string(code: String) -> Self {
        Self(code)
    }

    /// Borrow the code as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RoomCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_id_unique() {
        let id1 = ConnectionId::new();
        let id2 = ConnectionId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_room_code_format() {
        let code = RoomCode::generate();
        assert_eq!(code.0.len(), 6);
        assert!(code.0.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_room_code_from_string() {
        let code = RoomCode::from_string("123456".to_string());
        assert_eq!(code.as_str(), "123456");
    }
}
