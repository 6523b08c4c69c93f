//! Connected participants and message fan-out

use std::collections::HashMap;

use tracing::debug;

use crate::config::MAX_NAME_LEN;
use crate::room::participant::{Participant, ParticipantId};
use crate::websocket::message::{PlayerInfo, ServerMessage};

/// Connected participants and the fan-out to their outbound channels
#[derive(Debug, Default)]
pub struct Roster {
    participants: HashMap<ParticipantId, Participant>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection. It stays inactive until named.
    pub fn admit(&mut self, id: ParticipantId, participant: Participant) {
        self.participants.insert(id, participant);
    }

    /// Attach a trimmed display name, cut to `MAX_NAME_LEN` characters.
    /// Returns `false` (and changes nothing) for unknown participants or
    /// names that are blank after trimming.
    pub fn set_name(&mut self, id: &ParticipantId, name: &str) -> bool {
        let name: String = name.trim().chars().take(MAX_NAME_LEN).collect();
        if name.is_empty() {
            return false;
        }

        match self.participants.get_mut(id) {
            Some(participant) => {
                participant.name = Some(name);
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &ParticipantId) -> Option<Participant> {
        self.participants.remove(id)
    }

    pub fn get(&self, id: &ParticipantId) -> Option<&Participant> {
        self.participants.get(id)
    }

    pub fn is_active(&self, id: &ParticipantId) -> bool {
        self.participants.get(id).is_some_and(Participant::is_active)
    }

    pub fn name_of(&self, id: &ParticipantId) -> Option<&str> {
        self.participants.get(id).and_then(|p| p.name.as_deref())
    }

    pub fn active_count(&self) -> usize {
        self.participants.values().filter(|p| p.is_active()).count()
    }

    /// Active participant ids in a stable order
    pub fn active_ids(&self) -> Vec<ParticipantId> {
        let mut ids: Vec<ParticipantId> = self
            .participants
            .iter()
            .filter(|(_, p)| p.is_active())
            .map(|(id, _)| *id)
            .collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn add_score(&mut self, id: &ParticipantId, points: u32) {
        if let Some(participant) = self.participants.get_mut(id) {
            participant.score += points;
        }
    }

    /// Active participants, best score first
    pub fn scoreboard(&self) -> Vec<PlayerInfo> {
        let mut players: Vec<PlayerInfo> = self
            .participants
            .values()
            .filter_map(|p| {
                p.name.as_ref().filter(|n| !n.is_empty()).map(|name| PlayerInfo {
                    name: name.clone(),
                    score: p.score,
                })
            })
            .collect();
        players.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.name.cmp(&b.name)));
        players
    }

    /// Send to every connected participant, named or not
    pub fn broadcast(&self, message: ServerMessage) {
        for (id, participant) in &self.participants {
            if !participant.send(message.clone()) {
                debug!("Dropping message for closed connection {}", id);
            }
        }
    }

    pub fn send_to(&self, id: &ParticipantId, message: ServerMessage) {
        if let Some(participant) = self.participants.get(id) {
            if !participant.send(message) {
                debug!("Dropping message for closed connection {}", id);
            }
        }
    }
}
