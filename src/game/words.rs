//! Word source and non-repeating random selection

use std::fs;
use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::{FALLBACK_WORDS, MIN_WORD_LEN};
use crate::error::GameError;

/// Pick uniformly from `pool`, skipping `previous` whenever something else is available.
pub fn choose_excluding<'a, T, R>(pool: &'a [T], previous: Option<&T>, rng: &mut R) -> Option<&'a T>
where
    T: PartialEq,
    R: Rng + ?Sized,
{
    let candidates: Vec<&T> = match previous {
        Some(prev) if pool.len() > 1 => pool.iter().filter(|c| *c != prev).collect(),
        _ => pool.iter().collect(),
    };

    if candidates.is_empty() {
        // every entry equals the previous one
        return pool.choose(rng);
    }
    candidates.choose(rng).copied()
}

#[derive(Debug, Clone)]
pub struct WordList {
    words: Vec<String>,
}

impl WordList {
    /// Newline-delimited list; entries shorter than `MIN_WORD_LEN` are dropped.
    pub fn from_text(text: &str) -> Result<Self, GameError> {
        let words: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|w| w.chars().count() >= MIN_WORD_LEN)
            .map(String::from)
            .collect();

        if words.is_empty() {
            return Err(GameError::EmptyWordList);
        }
        Ok(Self { words })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, GameError> {
        let text = fs::read_to_string(path)?;
        Self::from_text(&text)
    }

    pub fn builtin() -> Self {
        Self {
            words: FALLBACK_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }

    pub fn choose<R: Rng + ?Sized>(&self, previous: Option<&String>, rng: &mut R) -> Option<&str> {
        choose_excluding(&self.words, previous, rng).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
