use axum::extract::ws::Message;
use serde::{Deserialize, Serialize};

use crate::drawing::{Point, Stroke};
use crate::error::GameError;
use crate::game::reveal::Letter;

/// Messages sent from client to server
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientMessage {
    SetName { name: String },
    SubmitGuess { text: String },
    AppendDrawingStep(Stroke),
    /// Encoded image of the whole canvas after a finished stroke
    SaveSnapshot { data: String },
    ClearCanvas,
    EraseAt(Point),
    Undo,
    Redo,
    /// Drawer skips the current turn
    ManualReset,
}

impl ClientMessage {
    pub fn parse(text: &str) -> Result<Self, GameError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// One row of the scoreboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerInfo {
    pub name: String,
    pub score: u32,
}

/// Messages sent from server to client
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerMessage {
    HydrateCanvas { snapshot: Option<String> },
    BroadcastStroke(Stroke),
    BroadcastErase(Point),
    BroadcastClear,
    /// Used for both undo and redo
    RestoreSnapshot { snapshot: String },
    RoundResetUi,
    /// Only ever sent to the drawer
    DrawerAssigned { word: String },
    RevealState { letters: Vec<Letter> },
    RemainingTime { seconds: u32 },
    ChatMessage {
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        sender: Option<String>,
    },
    ForceSessionReset,
    Scoreboard { players: Vec<PlayerInfo> },
}

impl ServerMessage {
    /// Announcement from the game itself
    pub fn notice(text: impl Into<String>) -> Self {
        ServerMessage::ChatMessage {
            text: text.into(),
            sender: None,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn to_ws_message(&self) -> Message {
        Message::Text(self.to_json())
    }
}
