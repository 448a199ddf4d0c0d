pub mod admin;
pub mod handlers;
pub mod participant;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;

use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::AppState;
use crate::types::{Role, SessionId};

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    pub role: Option<String>,
}

/// GET /ws upgrade
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<WsQuery>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    tracing::debug!("Upgrade requested, role={:?}", params.role);
    ws.on_upgrade(move |socket| handle_socket(socket, params, state))
}

/// Whether a participant broadcast concerns this socket
fn wants(owned: &HashSet<SessionId>, msg: &ServerMessage) -> bool {
    match msg {
        ServerMessage::Timer { session_id, .. } => owned.contains(session_id),
        _ => true,
    }
}

/// Keep the set of sessions this socket drives in step with its replies.
/// Only a session this socket started becomes owned.
fn track_sessions(owned: &mut HashSet<SessionId>, started: bool, response: &ServerMessage) {
    match response {
        ServerMessage::Session { view } if started => {
            owned.insert(view.session_id.clone());
        }
        ServerMessage::SessionEnded { session_id } => {
            owned.remove(session_id);
        }
        _ => {}
    }
}

type Outbound = futures::stream::SplitSink<WebSocket, Message>;

/// Serialize and push one message; false once the peer is gone
async fn push(sender: &mut Outbound, msg: &ServerMessage) -> bool {
    match serde_json::to_string(msg) {
        Ok(json) => sender.send(Message::Text(json.into())).await.is_ok(),
        Err(e) => {
            tracing::error!("Failed to serialize {:?}: {}", msg, e);
            true
        }
    }
}

/// Drive one socket until it closes, then end the sessions it started
async fn handle_socket(socket: WebSocket, params: WsQuery, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    let role = match params.role.as_deref() {
        Some("admin") => Role::Admin,
        _ => Role::Participant,
    };
    tracing::info!("Socket open as {:?}", role);

    let welcome = ServerMessage::Welcome {
        protocol: "1.0".to_string(),
        role: role.clone(),
        server_now: chrono::Utc::now().to_rfc3339(),
        translation_available: state.translation.is_available(),
    };
    if !push(&mut sender, &welcome).await {
        tracing::warn!("Socket closed before welcome");
        return;
    }

    let mut participant_rx = state.participant_broadcast.subscribe();
    let mut admin_rx = (role == Role::Admin).then(|| state.admin_broadcast.subscribe());
    let mut owned: HashSet<SessionId> = HashSet::new();

    loop {
        tokio::select! {
            // Timer ticks and leaderboard updates
            Ok(msg) = participant_rx.recv() => {
                if wants(&owned, &msg) && !push(&mut sender, &msg).await {
                    break;
                }
            }

            // Workspace snapshots, admins only
            Some(msg) = async {
                match admin_rx.as_mut() {
                    Some(rx) => rx.recv().await.ok(),
                    None => std::future::pending().await,
                }
            } => {
                if !push(&mut sender, &msg).await {
                    break;
                }
            }

            incoming = receiver.next() => {
                let text = match incoming {
                    Some(Ok(Message::Text(text))) => text,
                    Some(Ok(Message::Ping(data))) => {
                        if sender.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                        continue;
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => {
                        tracing::warn!("Socket error: {}", e);
                        break;
                    }
                };
                tracing::debug!("Inbound: {}", text);

                let mut started = false;
                let reply = match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(msg) => match handlers::check_session_owner(&msg, &owned, &state).await {
                        Some(rejection) => Some(rejection),
                        None => {
                            started = matches!(msg, ClientMessage::StartSession);
                            handlers::handle_message(msg, &role, &state).await
                        }
                    },
                    Err(e) => {
                        tracing::warn!("Unparseable message: {}", e);
                        Some(ServerMessage::Error {
                            code: "PARSE_ERROR".to_string(),
                            msg: format!("Invalid message format: {}", e),
                        })
                    }
                };

                if let Some(reply) = reply {
                    track_sessions(&mut owned, started, &reply);
                    if !push(&mut sender, &reply).await {
                        break;
                    }
                }
            }
        }
    }

    for session_id in owned {
        let _ = state.end_session(&session_id).await;
    }
    tracing::info!("Socket closed ({:?})", role);
}
