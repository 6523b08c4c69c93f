use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::game::SessionCommand;
use crate::room::ParticipantId;
use crate::websocket::message::{ClientMessage, ServerMessage};
use crate::AppState;

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle a WebSocket connection
async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();

    // Outgoing messages from the session
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();

    let participant_id = Uuid::new_v4();

    if state
        .session
        .send(SessionCommand::Connect {
            id: participant_id,
            sender: tx,
        })
        .is_err()
    {
        warn!("Session is not running, closing connection {}", participant_id);
        let _ = sender.close().await;
        return;
    }

    info!("Connection {} opened", participant_id);

    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(msg.to_ws_message()).await.is_err() {
                break;
            }
        }
    });

    while let Some(result) = receiver.next().await {
        match result {
            Ok(Message::Text(text)) => {
                handle_text_message(&state, participant_id, &text);
            }
            Ok(Message::Close(_)) => {
                info!("Connection {} closed", participant_id);
                break;
            }
            Ok(_) => {
                // Ignore binary, ping, pong frames
            }
            Err(e) => {
                warn!("WebSocket error for {}: {}", participant_id, e);
                break;
            }
        }
    }

    let _ = state
        .session
        .send(SessionCommand::Disconnect { id: participant_id });

    send_task.abort();
}

/// Handle a text message from a client
fn handle_text_message(state: &AppState, from: ParticipantId, text: &str) {
    match ClientMessage::parse(text) {
        Ok(message) => {
            if state
                .session
                .send(SessionCommand::Client { from, message })
                .is_err()
            {
                warn!("Session is not running, dropping message from {}", from);
            }
        }
        Err(e) => {
            warn!("Invalid message from {}: {}", from, e);
        }
    }
}
