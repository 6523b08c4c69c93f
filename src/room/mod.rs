pub mod participant;
pub mod roster;

pub use participant::{Participant, ParticipantId};
pub use roster::Roster;
