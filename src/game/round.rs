//! Round state machine: drawer/word selection, hints, countdown, guess scoring

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use crate::config::{GameConfig, MIN_ACTIVE_PLAYERS};
use crate::game::reveal::{Letter, RevealState};
use crate::game::words::{choose_excluding, WordList};
use crate::room::ParticipantId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    /// No round; the session is waiting for players
    Idle,
    /// Picking drawer and word
    Selecting,
    /// Hints revealing, countdown running, guesses accepted
    InProgress,
    /// Round over, next one pending
    Scoring,
}

#[derive(Debug)]
pub struct Round {
    pub id: u64,
    pub word: String,
    pub drawer: ParticipantId,
    pub reveal: RevealState,
    pub remaining: u32,
    correct: HashSet<ParticipantId>,
}

impl Round {
    pub fn correct_count(&self) -> usize {
        self.correct.len()
    }

    pub fn letters(&self) -> &[Letter] {
        self.reveal.letters()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    /// No match (or no round running): relay as chat
    Chat,
    /// Blank, from the drawer, or a repeat of an already credited guess
    Ignored,
    /// `everyone` is set when the last guesser just got it
    Correct { everyone: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Departure {
    Unaffected,
    DrawerLeft,
    /// Only guessers who already scored remain
    EveryoneCorrect,
}

pub struct RoundController {
    phase: RoundPhase,
    round: Option<Round>,
    previous_word: Option<String>,
    previous_drawer: Option<ParticipantId>,
    next_id: u64,
    words: WordList,
    config: GameConfig,
    rng: StdRng,
}

impl RoundController {
    pub fn new(words: WordList, config: GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            phase: RoundPhase::Idle,
            round: None,
            previous_word: None,
            previous_drawer: None,
            next_id: 0,
            words,
            config,
            rng,
        }
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    /// Whether a timer scheduled for round `id` may still act in `phase`
    pub fn is_current(&self, id: u64, phase: RoundPhase) -> bool {
        self.phase == phase && self.round.as_ref().is_some_and(|r| r.id == id)
    }

    /// Pick a drawer among `active` and a word, replacing any previous round.
    pub fn start(&mut self, active: &[ParticipantId]) -> Option<&Round> {
        if active.len() < MIN_ACTIVE_PLAYERS {
            return None;
        }
        self.phase = RoundPhase::Selecting;

        let drawer = choose_excluding(active, self.previous_drawer.as_ref(), &mut self.rng).copied();
        let word = self
            .words
            .choose(self.previous_word.as_ref(), &mut self.rng)
            .map(String::from);

        let (drawer, word) = match (drawer, word) {
            (Some(drawer), Some(word)) => (drawer, word),
            _ => {
                self.phase = RoundPhase::Idle;
                self.round = None;
                return None;
            }
        };

        self.next_id += 1;
        self.previous_drawer = Some(drawer);
        self.previous_word = Some(word.clone());
        self.phase = RoundPhase::InProgress;
        self.round = Some(Round {
            id: self.next_id,
            reveal: RevealState::new(&word),
            word,
            drawer,
            remaining: self.config.round_seconds,
            correct: HashSet::new(),
        });
        self.round.as_ref()
    }

    /// Reveal one more letter. `None` when no round is running or nothing is left.
    pub fn reveal_next(&mut self) -> Option<Vec<Letter>> {
        if self.phase != RoundPhase::InProgress {
            return None;
        }
        let round = self.round.as_mut()?;
        if round.reveal.reveal_random(&mut self.rng) {
            Some(round.reveal.letters().to_vec())
        } else {
            None
        }
    }

    /// One countdown step; returns the new remaining time.
    pub fn tick(&mut self) -> Option<u32> {
        if self.phase != RoundPhase::InProgress {
            return None;
        }
        let round = self.round.as_mut()?;
        round.remaining = round.remaining.saturating_sub(1);
        Some(round.remaining)
    }

    /// Close the running round; the next start replaces it.
    pub fn finish(&mut self) {
        if self.phase == RoundPhase::InProgress {
            self.phase = RoundPhase::Scoring;
        }
    }

    pub fn guess(&mut self, from: &ParticipantId, text: &str, active_count: usize) -> GuessOutcome {
        let guess = text.trim();
        if guess.is_empty() {
            return GuessOutcome::Ignored;
        }
        if self.phase != RoundPhase::InProgress {
            return GuessOutcome::Chat;
        }
        let round = match self.round.as_mut() {
            Some(round) => round,
            None => return GuessOutcome::Chat,
        };
        if guess != round.word {
            return GuessOutcome::Chat;
        }
        if *from == round.drawer || !round.correct.insert(*from) {
            return GuessOutcome::Ignored;
        }

        debug!(
            "Correct guess in round {} ({} of {})",
            round.id,
            round.correct.len(),
            active_count.saturating_sub(1)
        );

        if round.correct.len() >= active_count.saturating_sub(1) {
            self.phase = RoundPhase::Scoring;
            GuessOutcome::Correct { everyone: true }
        } else {
            round.remaining = round.remaining.min(self.config.guess_floor_seconds);
            GuessOutcome::Correct { everyone: false }
        }
    }

    /// Forget a departed participant. `active_count` is the count after removal.
    pub fn on_departure(&mut self, id: &ParticipantId, active_count: usize) -> Departure {
        if self.previous_drawer.as_ref() == Some(id) {
            self.previous_drawer = None;
        }
        if self.phase != RoundPhase::InProgress {
            return Departure::Unaffected;
        }
        let round = match self.round.as_mut() {
            Some(round) => round,
            None => return Departure::Unaffected,
        };

        if round.drawer == *id {
            self.phase = RoundPhase::Scoring;
            return Departure::DrawerLeft;
        }

        round.correct.remove(id);
        if !round.correct.is_empty() && round.correct.len() >= active_count.saturating_sub(1) {
            self.phase = RoundPhase::Scoring;
            return Departure::EveryoneCorrect;
        }
        Departure::Unaffected
    }

    /// Drop the round entirely and go idle.
    pub fn stop(&mut self) {
        self.phase = RoundPhase::Idle;
        self.round = None;
    }
}
