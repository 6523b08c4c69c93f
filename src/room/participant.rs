//! One connection and its outbound channel

use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

use crate::websocket::message::ServerMessage;

/// Opaque connection handle
pub type ParticipantId = Uuid;

#[derive(Debug)]
pub struct Participant {
    pub sender: UnboundedSender<ServerMessage>,
    pub name: Option<String>,
    pub score: u32,
}

impl Participant {
    pub fn new(sender: UnboundedSender<ServerMessage>) -> Self {
        Self {
            sender,
            name: None,
            score: 0,
        }
    }

    /// Named participants take part in rounds
    pub fn is_active(&self) -> bool {
        self.name.as_deref().is_some_and(|n| !n.is_empty())
    }

    /// Send a message to this participant
    pub fn send(&self, message: ServerMessage) -> bool {
        self.sender.send(message).is_ok()
    }
}
