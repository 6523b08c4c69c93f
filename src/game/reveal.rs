//! Per-letter hint state shown to guessers

use rand::seq::IteratorRandom;
use rand::Rng;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Letter {
    Hidden,
    /// Whitespace between words; never needs revealing
    Separator,
    Revealed(char),
}

#[derive(Debug, Clone)]
pub struct RevealState {
    word: Vec<char>,
    letters: Vec<Letter>,
}

impl RevealState {
    pub fn new(word: &str) -> Self {
        let word: Vec<char> = word.chars().collect();
        let letters = word
            .iter()
            .map(|c| {
                if c.is_whitespace() {
                    Letter::Separator
                } else {
                    Letter::Hidden
                }
            })
            .collect();
        Self { word, letters }
    }

    /// Reveal one random hidden position. Returns `false` if none is left.
    pub fn reveal_random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        let pick = self
            .letters
            .iter()
            .enumerate()
            .filter(|(_, l)| **l == Letter::Hidden)
            .map(|(i, _)| i)
            .choose(rng);

        match pick {
            Some(i) => {
                self.letters[i] = Letter::Revealed(self.word[i]);
                true
            }
            None => false,
        }
    }

    pub fn hidden_count(&self) -> usize {
        self.letters.iter().filter(|l| **l == Letter::Hidden).count()
    }

    pub fn letters(&self) -> &[Letter] {
        &self.letters
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_new_hides_letters_and_marks_separators() {
        let state = RevealState::new("ice cream");
        assert_eq!(state.len(), 9);
        assert_eq!(state.letters()[3], Letter::Separator);
        assert_eq!(state.hidden_count(), 8);
    }

    #[test]
    fn test_reveal_never_repeats() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut state = RevealState::new("pirate ship");

        for _ in 0..10 {
            assert!(state.reveal_random(&mut rng));
        }
        assert_eq!(state.hidden_count(), 0);
        assert!(!state.reveal_random(&mut rng));

        let shown: String = state
            .letters()
            .iter()
            .map(|l| match l {
                Letter::Revealed(c) => *c,
                Letter::Separator => ' ',
                Letter::Hidden => '_',
            })
            .collect();
        assert_eq!(shown, "pirate ship");
    }
}
