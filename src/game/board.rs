use rand::seq::SliceRandom;
use rand::Rng;

use crate::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct Board {
    cards: Vec<String>,
    revealed: Vec<bool>,    // permanently matched
    temp_flips: Vec<usize>, // flipped this turn, in flip order
}

#[derive(Debug, Clone, PartialEq)]
pub enum FlipOutcome {
    First {
        value: String,
    },
    Pair {
        value: String,
        indices: [usize; 2],
        matched: bool,
    },
}

/// The first `pair_count` letters of the alphabet.
pub fn generate_faces(pair_count: usize) -> Vec<String> {
    (b'A'..=b'Z')
        .take(pair_count)
        .map(|letter| (letter as char).to_string())
        .collect()
}

impl Board {
    pub fn new<R: Rng + ?Sized>(pair_count: usize, rng: &mut R) -> Self {
        let faces = generate_faces(pair_count);
        let mut cards: Vec<String> = faces.iter().chain(faces.iter()).cloned().collect();
        cards.shuffle(rng);
        Self::from_cards(cards)
    }

    /// Builds a board with a fixed card layout.
    pub fn from_cards(cards: Vec<String>) -> Self {
        let revealed = vec![false; cards.len()];
        Self {
            cards,
            revealed,
            temp_flips: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn revealed(&self) -> &[bool] {
        &self.revealed
    }

    pub fn temp_flips(&self) -> &[usize] {
        &self.temp_flips
    }

    pub fn card(&self, index: usize) -> Option<&str> {
        self.cards.get(index).map(String::as_str)
    }

    pub fn is_complete(&self) -> bool {
        self.revealed.iter().all(|revealed| *revealed)
    }

    /// A mismatched pair is still face-up.
    pub fn has_pending_mismatch(&self) -> bool {
        self.temp_flips.len() == 2
    }

    pub fn flip(&mut self, index: i64) -> AppResult<FlipOutcome> {
        if self.has_pending_mismatch() {
            return Err(AppError::MismatchPending);
        }
        let slot = usize::try_from(index)
            .ok()
            .filter(|slot| *slot < self.cards.len())
            .ok_or(AppError::InvalidCardIndex { index })?;

        if self.revealed[slot] || self.temp_flips.contains(&slot) {
            return Err(AppError::CardUnavailable { index: slot });
        }

        self.temp_flips.push(slot);
        let value = self.cards[slot].clone();

        let [first, second] = match self.temp_flips.as_slice() {
            [first, second] => [*first, *second],
            _ => return Ok(FlipOutcome::First { value }),
        };

        let matched = self.cards[first] == self.cards[second];
        if matched {
            self.revealed[first] = true;
            self.revealed[second] = true;
            self.temp_flips.clear();
        }

        Ok(FlipOutcome::Pair {
            value,
            indices: [first, second],
            matched,
        })
    }

    /// Turns a mismatched pair face-down again.
    pub fn hide_mismatch(&mut self) -> Vec<usize> {
        std::mem::take(&mut self.temp_flips)
    }
}
