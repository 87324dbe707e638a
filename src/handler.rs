//! HTTP and WebSocket handlers
//!
//! Thin request-facing glue: room creation and existence endpoints, the
//! WebSocket upgrade, and the per-connection receive loop that feeds the
//! room's broadcast path.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::connection::ConnectionHandle;
use crate::error::AppError;
use crate::registry::RoomRegistry;
use crate::room::Room;
use crate::types::RoomCode;

/// Response body for `POST /create`
#[derive(Debug, Serialize)]
pub struct CreateResponse {
    #[serde(rename = "roomID")]
    pub room_id: String,
}

/// Response body for `GET /exists`
#[derive(Debug, Serialize)]
pub struct ExistsResponse {
    pub exists: bool,
}

/// Query parameters carrying the room code
#[derive(Debug, Deserialize)]
pub struct RoomQuery {
    pub room: Option<String>,
}

impl RoomQuery {
    /// Extract the room code, rejecting requests that omit it
    fn room_code(self) -> Result<RoomCode, AppError> {
        self.room
            .map(RoomCode::from_string)
            .ok_or(AppError::MissingParameter("room"))
    }
}

/// Build the application router over a shared registry
pub fn router(registry: Arc<RoomRegistry>) -> Router {
    Router::new()
        .route("/create", post(create_room))
        .route("/exists", get(room_exists))
        .route("/ws", get(ws_handler))
        .with_state(registry)
}

/// `POST /create` - allocate a room and return its code
pub async fn create_room(State(registry): State<Arc<RoomRegistry>>) -> Json<CreateResponse> {
    let code = registry.create().await;
    Json(CreateResponse {
        room_id: code.to_string(),
    })
}

/// `GET /exists?room=<code>` - report whether a room is registered
pub async fn room_exists(
    State(registry): State<Arc<RoomRegistry>>,
    Query(query): Query<RoomQuery>,
) -> Result<Json<ExistsResponse>, AppError> {
    let code = query.room_code()?;
    let exists = registry.exists(&code).await;
    Ok(Json(ExistsResponse { exists }))
}

/// `GET /ws?room=<code>` - upgrade and enter the room's relay loop
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(registry): State<Arc<RoomRegistry>>,
    Query(query): Query<RoomQuery>,
) -> Result<impl IntoResponse, AppError> {
    let code = query.room_code()?;
    let room = registry
        .lookup(&code)
        .await
        .ok_or_else(|| AppError::RoomNotFound(code.to_string()))?;

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, room)))
}

/// Per-connection receive loop
///
/// Attaches the connection to its room, then blocks on inbound frames:
/// each text frame updates the room's cached content and fans out to
/// every connection in the room (sender echo included). Any receive
/// error or close frame ends the loop; the connection is detached
/// exactly once on the way out.
async fn handle_socket(socket: WebSocket, room: Arc<Room>) {
    let (mut ws_sender, mut ws_receiver) = socket.split();

    let (conn, mut outbound) = ConnectionHandle::new();
    let conn_id = conn.id;

    // Writer task: drain the outbound channel into the socket. It ends
    // when the room drops its handle (detach/prune) or the sink fails.
    let write_task = tokio::spawn(async move {
        while let Some(text) = outbound.recv().await {
            if ws_sender.send(Message::Text(text)).await.is_err() {
                debug!("WebSocket send failed, ending write task");
                break;
            }
        }
        let _ = ws_sender.close().await;
    });

    if let Err(e) = room.attach(conn).await {
        warn!(
            "Failed to replay content to joining connection {}: {}",
            conn_id, e
        );
    }
    info!("Connection {} joined room {}", conn_id, room.code);

    while let Some(result) = ws_receiver.next().await {
        match result {
            Ok(Message::Text(text)) => {
                room.update_content(&text).await;
                room.broadcast(&text).await;
            }
            Ok(Message::Close(_)) => {
                debug!("Connection {} sent close frame", conn_id);
                break;
            }
            Ok(_) => {
                // Binary, ping, pong - ignored; the wire format is raw text
            }
            Err(e) => {
                debug!("Receive error on connection {}: {}", conn_id, e);
                break;
            }
        }
    }

    room.detach(&conn_id).await;
    write_task.abort();
    info!("Connection {} left room {}", conn_id, room.code);
}
