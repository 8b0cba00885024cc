pub mod director;
pub mod handlers;
pub mod player;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::camera::RemoteCamera;
use crate::catalog::{self, PokerGame};
use crate::dashboard::DirectorSession;
use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::AppState;
use crate::types::{now_iso, Role};

use handlers::Connection;
use player::PlayerConnection;

pub const PROTOCOL_VERSION: &str = "1.0";

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    pub role: Option<String>,
    pub game_id: Option<String>,
}

impl WsQuery {
    pub fn role(&self) -> Role {
        match self.role.as_deref() {
            Some("td") | Some("director") => Role::Director,
            _ => Role::Player,
        }
    }
}

/// Build the per-socket state for a role. TD connections need a known game.
pub fn open_connection(
    role: Role,
    game: Option<&'static PokerGame>,
    state: &AppState,
) -> Option<Connection> {
    match role {
        Role::Player => Some(Connection::Player(PlayerConnection::new())),
        Role::Director => {
            let game = game?;
            Some(Connection::Director(DirectorSession::new(
                game,
                Arc::new(RemoteCamera::new()),
                state.config.scan,
                state.config.allow_simulated_scan,
            )))
        }
    }
}

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<WsQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let role = params.role();
    tracing::info!(
        "WebSocket connection request: role={:?}, game_id={:?}",
        role,
        params.game_id
    );

    let game = params.game_id.as_deref().and_then(catalog::find_game);
    let Some(connection) = open_connection(role, game, &state) else {
        tracing::warn!("Rejecting TD connection for unknown game {:?}", params.game_id);
        return (StatusCode::NOT_FOUND, "Game not found").into_response();
    };

    ws.on_upgrade(move |socket| handle_socket(socket, connection, state))
}

type WsSender = SplitSink<WebSocket, Message>;

/// Serialize and send messages in order. Returns false once the socket is gone.
async fn send_all(sender: &mut WsSender, msgs: Vec<ServerMessage>) -> bool {
    for msg in msgs {
        match serde_json::to_string(&msg) {
            Ok(json) => {
                if sender.send(Message::Text(json.into())).await.is_err() {
                    tracing::error!("Failed to send response");
                    return false;
                }
            }
            Err(e) => tracing::error!("Failed to serialize server message: {}", e),
        }
    }
    true
}

/// Handle individual WebSocket connection
async fn handle_socket(socket: WebSocket, mut connection: Connection, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    let role = connection.role();

    let counts = state.connect(role).await;
    tracing::info!(
        "WebSocket connected with role: {:?} ({} players, {} TDs online)",
        role,
        counts.players,
        counts.directors
    );

    let mut greeting = vec![ServerMessage::Welcome {
        protocol: PROTOCOL_VERSION.to_string(),
        role,
        server_now: now_iso(),
        game_id: match &connection {
            Connection::Director(session) => Some(session.game().id.to_string()),
            Connection::Player(_) => None,
        },
    }];
    if let Connection::Director(session) = &connection {
        greeting.push(ServerMessage::queue_state(session.queue()));
    }

    if send_all(&mut sender, greeting).await {
        loop {
            tokio::select! {
                // Scan results and scan endings
                events = connection.next_scan_events() => {
                    let msgs = match &connection {
                        Connection::Director(session) => director::scan_messages(session, events),
                        Connection::Player(_) => Vec::new(),
                    };
                    if !send_all(&mut sender, msgs).await {
                        break;
                    }
                }

                // Handle client messages
                ws_msg = receiver.next() => {
                    match ws_msg {
                        Some(Ok(Message::Text(text))) => {
                            tracing::debug!("Received message: {}", text);

                            let msgs = match serde_json::from_str::<ClientMessage>(&text) {
                                Ok(client_msg) => {
                                    handlers::handle_message(client_msg, &mut connection, &state).await
                                }
                                Err(e) => {
                                    tracing::error!("Failed to parse client message: {}", e);
                                    vec![ServerMessage::error(
                                        "PARSE_ERROR",
                                        format!("Invalid message format: {}", e),
                                    )]
                                }
                            };
                            if !send_all(&mut sender, msgs).await {
                                break;
                            }
                        }
                        Some(Ok(Message::Close(_))) => {
                            tracing::info!("WebSocket closed");
                            break;
                        }
                        Some(Ok(Message::Ping(data))) => {
                            if sender.send(Message::Pong(data)).await.is_err() {
                                break;
                            }
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            tracing::error!("WebSocket error: {}", e);
                            break;
                        }
                        None => break,
                    }
                }
            }
        }
    } else {
        tracing::error!("Failed to send welcome message");
    }

    connection.close().await;
    let counts = state.disconnect(role).await;
    tracing::info!(
        "WebSocket connection closed for role: {:?} ({} players, {} TDs online)",
        role,
        counts.players,
        counts.directors
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_role() {
        let query = WsQuery {
            role: Some("td".to_string()),
            game_id: Some("7".to_string()),
        };
        assert_eq!(query.role(), Role::Director);

        let query = WsQuery {
            role: None,
            game_id: None,
        };
        assert_eq!(query.role(), Role::Player);
    }

    #[test]
    fn test_director_needs_known_game() {
        let state = AppState::default();
        assert!(open_connection(Role::Director, None, &state).is_none());
        assert!(open_connection(Role::Player, None, &state).is_some());

        let game = catalog::find_game("7");
        let conn = open_connection(Role::Director, game, &state);
        assert!(matches!(conn, Some(Connection::Director(_))));
    }
}
