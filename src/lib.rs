//! Room-based shared-text relay server
//!
//! Clients join a named room over a WebSocket; any text one client sends
//! is broadcast to every connection in the same room, and the latest
//! content is replayed to new joiners. Built with axum and tokio.
//!
//! # Features
//! - Room creation with 6-digit numeric codes
//! - Room existence check
//! - WebSocket relay with sender echo
//! - Last-content replay on join
//! - Idle-room expiry sweep
//!
//! # Architecture
//! Two-level locking, never nested room-then-registry:
//! - `RoomRegistry` guards the code → room map with its own lock
//! - each `Room` guards its connection set, cached content, and
//!   last-activity timestamp with its own lock
//! - the join path clones the `Arc<Room>` out of the registry before
//!   touching the room; only the sweeper holds both locks at once
//!
//! # Example
//! ```ignore
//! use std::sync::Arc;
//! use text_relay::{handler, sweeper, RoomRegistry};
//!
//! #[tokio::main]
//! async fn main() {
//!     let registry = Arc::new(RoomRegistry::new());
//!     let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!
//!     tokio::spawn(sweeper::run(
//!         registry.clone(),
//!         sweeper::SWEEP_PERIOD,
//!         sweeper::RETENTION,
//!         shutdown_rx,
//!     ));
//!
//!     let app = handler::router(registry);
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:5000").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```

pub mod connection;
pub mod error;
pub mod handler;
pub mod registry;
pub mod room;
pub mod sweeper;
pub mod types;

// Re-export main types for convenience
pub use connection::ConnectionHandle;
pub use error::{AppError, SendError};
pub use registry::RoomRegistry;
pub use room::Room;
pub use types::{ConnectionId, RoomCode};
