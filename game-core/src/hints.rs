use std::hash::{Hash, Hasher};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Seconds into the active round at which successive letters are shown.
pub const HINT_OFFSETS: [u64; 3] = [20, 40, 60];

pub const HINT_PLACEHOLDER: char = '_';

/// The reveal plan for one turn's secret word.
///
/// Seeded from `(word, start_time)`, so every client that agrees on the
/// round's authoritative start time derives the identical schedule with
/// no further synchronization. Purely presentational: nothing here is
/// ever written to the shared document.
#[derive(Debug, Clone)]
pub struct HintSchedule {
    word: String,
    reveal_order: Vec<char>,
}

impl HintSchedule {
    pub fn new(word: &str, start_time: i64) -> Self {
        // Distinct alphabetic letters in first-occurrence order, then a
        // seeded shuffle picks which ones get revealed and when.
        let lowered = word.to_lowercase();
        let mut letters: Vec<char> = Vec::new();
        for c in lowered.chars() {
            if c.is_ascii_alphabetic() && !letters.contains(&c) {
                letters.push(c);
            }
        }

        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        lowered.hash(&mut hasher);
        start_time.hash(&mut hasher);
        let mut rng = StdRng::seed_from_u64(hasher.finish());
        letters.shuffle(&mut rng);
        letters.truncate(HINT_OFFSETS.len());

        Self {
            word: word.to_string(),
            reveal_order: letters,
        }
    }

    /// How many hint letters are due `elapsed` seconds into the round.
    pub fn due(&self, elapsed: u64) -> usize {
        HINT_OFFSETS
            .iter()
            .filter(|&&offset| elapsed >= offset)
            .count()
            .min(self.reveal_order.len())
    }

    pub fn max_reveals(&self) -> usize {
        self.reveal_order.len()
    }

    /// Masked word with the first `count` scheduled letters shown
    /// uppercase and every other position (spaces included) shown as a
    /// placeholder.
    pub fn display(&self, count: usize) -> String {
        let revealed = &self.reveal_order[..count.min(self.reveal_order.len())];
        self.word
            .chars()
            .map(|c| {
                let lower = c.to_ascii_lowercase();
                if revealed.contains(&lower) {
                    c.to_ascii_uppercase()
                } else {
                    HINT_PLACEHOLDER
                }
            })
            .collect()
    }
}
