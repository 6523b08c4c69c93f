//! Session manager: the one aggregate every inbound event and timer goes through

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use crate::config::{GameConfig, MAX_SNAPSHOT_BYTES, MIN_ACTIVE_PLAYERS};
use crate::drawing::{DrawingHistory, HistoryEffect};
use crate::error::GameError;
use crate::game::round::{Departure, GuessOutcome, Round, RoundController, RoundPhase};
use crate::game::scheduler::{Scheduler, TimerEvent, TimerKind};
use crate::game::words::WordList;
use crate::room::{Participant, ParticipantId, Roster};
use crate::websocket::message::{ClientMessage, ServerMessage};

/// Everything the session reacts to
#[derive(Debug)]
pub enum SessionCommand {
    Connect {
        id: ParticipantId,
        sender: UnboundedSender<ServerMessage>,
    },
    Disconnect {
        id: ParticipantId,
    },
    Client {
        from: ParticipantId,
        message: ClientMessage,
    },
    Timer(TimerEvent),
}

pub struct Session {
    roster: Roster,
    history: DrawingHistory,
    controller: RoundController,
    scheduler: Box<dyn Scheduler>,
    config: GameConfig,
}

impl Session {
    pub fn new(config: GameConfig, words: WordList, scheduler: Box<dyn Scheduler>) -> Self {
        Self {
            roster: Roster::new(),
            history: DrawingHistory::new(),
            controller: RoundController::new(words, config.clone()),
            scheduler,
            config,
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn history(&self) -> &DrawingHistory {
        &self.history
    }

    pub fn phase(&self) -> RoundPhase {
        self.controller.phase()
    }

    pub fn round(&self) -> Option<&Round> {
        self.controller.round()
    }

    pub fn handle(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::Connect { id, sender } => self.on_participant_connected(id, sender),
            SessionCommand::Disconnect { id } => self.on_participant_removed(&id),
            SessionCommand::Client { from, message } => {
                if let Err(e) = self.on_incoming_event(from, message) {
                    warn!("Dropping event from {}: {}", from, e);
                }
            }
            SessionCommand::Timer(event) => self.on_timer(event),
        }
    }

    pub fn on_participant_connected(
        &mut self,
        id: ParticipantId,
        sender: UnboundedSender<ServerMessage>,
    ) {
        let participant = Participant::new(sender);
        participant.send(ServerMessage::HydrateCanvas {
            snapshot: self.history.current().map(String::from),
        });

        if self.controller.phase() == RoundPhase::InProgress {
            if let Some(round) = self.controller.round() {
                participant.send(ServerMessage::RevealState {
                    letters: round.letters().to_vec(),
                });
                participant.send(ServerMessage::RemainingTime {
                    seconds: round.remaining,
                });
            }
        }

        self.roster.admit(id, participant);
        info!("Participant {} connected. Connections: {}", id, self.roster.len());
    }

    pub fn on_participant_named(&mut self, id: ParticipantId, name: &str) {
        if !self.roster.set_name(&id, name) {
            debug!("Ignoring blank name from {}", id);
            return;
        }
        info!(
            "Participant {} is now {:?}. Active players: {}",
            id,
            self.roster.name_of(&id).unwrap_or_default(),
            self.roster.active_count()
        );
        self.broadcast_scoreboard();

        if self.controller.phase() == RoundPhase::Idle
            && self.roster.active_count() >= MIN_ACTIVE_PLAYERS
        {
            info!("Enough players, starting the session");
            self.start_round();
        }
    }

    pub fn on_participant_removed(&mut self, id: &ParticipantId) {
        let before = self.roster.active_count();
        let participant = match self.roster.remove(id) {
            Some(participant) => participant,
            None => return,
        };
        let after = self.roster.active_count();
        info!("Participant {} removed. Active players: {}", id, after);

        if !participant.is_active() {
            return;
        }
        self.broadcast_scoreboard();

        if before >= MIN_ACTIVE_PLAYERS && after < MIN_ACTIVE_PLAYERS {
            self.force_reset();
            return;
        }

        match self.controller.on_departure(id, after) {
            Departure::Unaffected => {}
            Departure::DrawerLeft => {
                let name = participant.name.unwrap_or_default();
                self.roster.broadcast(ServerMessage::notice(format!(
                    "{} left while drawing. Starting a new round.",
                    name
                )));
                self.start_round();
            }
            Departure::EveryoneCorrect => self.finish_everyone_correct(),
        }
    }

    pub fn on_incoming_event(
        &mut self,
        from: ParticipantId,
        message: ClientMessage,
    ) -> Result<(), GameError> {
        if self.roster.get(&from).is_none() {
            debug!("Event from unknown connection {}", from);
            return Ok(());
        }

        match message {
            ClientMessage::SetName { name } => self.on_participant_named(from, &name),
            ClientMessage::SubmitGuess { text } => self.on_guess(from, &text),
            ClientMessage::AppendDrawingStep(stroke) => {
                stroke.validate()?;
                self.roster.broadcast(ServerMessage::BroadcastStroke(stroke));
            }
            ClientMessage::SaveSnapshot { data } => {
                if data.len() > MAX_SNAPSHOT_BYTES {
                    return Err(GameError::SnapshotTooLarge(data.len()));
                }
                self.history.append(data);
                debug!("Snapshot saved, history cursor {}", self.history.cursor());
            }
            ClientMessage::ClearCanvas => {
                info!("Clearing the board");
                self.history.clear();
                self.roster.broadcast(ServerMessage::BroadcastClear);
            }
            ClientMessage::EraseAt(point) => {
                point.validate()?;
                self.roster.broadcast(ServerMessage::BroadcastErase(point));
            }
            ClientMessage::Undo => {
                if let Some(effect) = self.history.undo() {
                    self.apply_history_effect(effect);
                }
            }
            ClientMessage::Redo => {
                if let Some(effect) = self.history.redo() {
                    self.apply_history_effect(effect);
                }
            }
            ClientMessage::ManualReset => self.on_manual_reset(from),
        }
        Ok(())
    }

    fn apply_history_effect(&self, effect: HistoryEffect) {
        debug!("History cursor moved to {}", self.history.cursor());
        match effect {
            HistoryEffect::Clear => self.roster.broadcast(ServerMessage::BroadcastClear),
            HistoryEffect::Restore(snapshot) => self
                .roster
                .broadcast(ServerMessage::RestoreSnapshot { snapshot }),
        }
    }

    fn on_guess(&mut self, from: ParticipantId, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        let name = match self.roster.name_of(&from) {
            Some(name) => name.to_string(),
            None => {
                debug!("Ignoring guess from unnamed participant {}", from);
                return;
            }
        };

        let active = self.roster.active_count();
        match self.controller.guess(&from, text, active) {
            GuessOutcome::Ignored => {}
            GuessOutcome::Chat => self.roster.broadcast(ServerMessage::ChatMessage {
                text: text.to_string(),
                sender: Some(name),
            }),
            GuessOutcome::Correct { everyone } => {
                info!("{} guessed the word", name);
                self.roster.add_score(&from, 1);
                self.broadcast_scoreboard();
                if everyone {
                    self.finish_everyone_correct();
                } else {
                    self.roster
                        .broadcast(ServerMessage::notice(format!("{} guessed the word!", name)));
                }
            }
        }
    }

    fn on_manual_reset(&mut self, from: ParticipantId) {
        let is_drawer = self.controller.round().is_some_and(|r| r.drawer == from);
        let running = matches!(
            self.controller.phase(),
            RoundPhase::InProgress | RoundPhase::Scoring
        );
        if !is_drawer || !running {
            debug!("Ignoring manual reset from {}", from);
            return;
        }
        info!("Drawer {} skipped the round", from);
        self.start_round();
    }

    pub fn on_timer(&mut self, event: TimerEvent) {
        if self.roster.active_count() < MIN_ACTIVE_PLAYERS {
            debug!("Ignoring {:?} timer without enough players", event.kind);
            return;
        }

        match event.kind {
            TimerKind::HintReveal => {
                if !self.controller.is_current(event.round, RoundPhase::InProgress) {
                    return;
                }
                match self.controller.reveal_next() {
                    Some(letters) => {
                        debug!("Revealed a letter in round {}", event.round);
                        self.roster.broadcast(ServerMessage::RevealState { letters });
                    }
                    None => self.scheduler.cancel(TimerKind::HintReveal),
                }
            }
            TimerKind::Countdown => {
                if !self.controller.is_current(event.round, RoundPhase::InProgress) {
                    return;
                }
                if let Some(seconds) = self.controller.tick() {
                    self.roster.broadcast(ServerMessage::RemainingTime { seconds });
                    if seconds == 0 {
                        self.finish_time_up();
                    }
                }
            }
            TimerKind::NextRound => {
                if self.controller.is_current(event.round, RoundPhase::Scoring) {
                    self.start_round();
                }
            }
        }
    }

    /// Stop everything and go back to waiting for players.
    pub fn force_reset(&mut self) {
        info!("Not enough players, resetting the session");
        self.cancel_all_timers();
        self.controller.stop();
        self.history.clear();
        self.roster.broadcast(ServerMessage::ForceSessionReset);
    }

    fn start_round(&mut self) {
        self.cancel_all_timers();

        if self.roster.active_count() < MIN_ACTIVE_PLAYERS {
            warn!("Refusing to start a round without enough players");
            self.controller.stop();
            return;
        }

        let active = self.roster.active_ids();
        let (round_id, drawer, word, letters, remaining) = match self.controller.start(&active) {
            Some(round) => (
                round.id,
                round.drawer,
                round.word.clone(),
                round.letters().to_vec(),
                round.remaining,
            ),
            None => {
                warn!("Could not select a drawer and word");
                return;
            }
        };

        self.history.clear();
        let drawer_name = self.roster.name_of(&drawer).unwrap_or_default().to_string();
        info!("Round {} started, {} is drawing", round_id, drawer_name);
        debug!("Round {} word: {}", round_id, word);

        self.roster.broadcast(ServerMessage::RoundResetUi);
        self.roster
            .broadcast(ServerMessage::notice(format!("{} is drawing now!", drawer_name)));
        self.roster
            .send_to(&drawer, ServerMessage::DrawerAssigned { word: word.clone() });
        self.roster.broadcast(ServerMessage::RevealState { letters });
        self.roster
            .broadcast(ServerMessage::RemainingTime { seconds: remaining });

        let hint_period = self.config.hint_period(word.chars().count());
        self.scheduler.schedule_repeating(
            TimerEvent::new(TimerKind::HintReveal, round_id),
            hint_period,
        );
        self.scheduler.schedule_repeating(
            TimerEvent::new(TimerKind::Countdown, round_id),
            self.config.tick,
        );
    }

    fn finish_everyone_correct(&mut self) {
        let (round_id, word, remaining) = match self.controller.round() {
            Some(round) => (round.id, round.word.clone(), round.remaining),
            None => return,
        };
        self.controller.finish();
        info!("Round {} over, everyone guessed", round_id);

        self.roster.broadcast(ServerMessage::notice(format!(
            "Everyone guessed the word! It was \"{}\".",
            word
        )));
        self.cancel_round_timers();
        self.roster
            .broadcast(ServerMessage::RemainingTime { seconds: remaining });
        self.schedule_next_round(round_id);
    }

    fn finish_time_up(&mut self) {
        let (round_id, word) = match self.controller.round() {
            Some(round) => (round.id, round.word.clone()),
            None => return,
        };
        self.controller.finish();
        info!("Round {} over, time is up", round_id);

        self.cancel_round_timers();
        self.roster.broadcast(ServerMessage::notice(format!(
            "Time's up! The word was \"{}\".",
            word
        )));
        self.schedule_next_round(round_id);
    }

    fn schedule_next_round(&mut self, round_id: u64) {
        self.scheduler.schedule_once(
            TimerEvent::new(TimerKind::NextRound, round_id),
            self.config.next_round_delay,
        );
    }

    fn cancel_round_timers(&mut self) {
        self.scheduler.cancel(TimerKind::HintReveal);
        self.scheduler.cancel(TimerKind::Countdown);
    }

    fn cancel_all_timers(&mut self) {
        self.cancel_round_timers();
        self.scheduler.cancel(TimerKind::NextRound);
    }

    fn broadcast_scoreboard(&self) {
        self.roster.broadcast(ServerMessage::Scoreboard {
            players: self.roster.scoreboard(),
        });
    }
}
