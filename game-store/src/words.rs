use std::collections::HashSet;

use game_types::Difficulty;
use rand::seq::SliceRandom;

use crate::error::StoreError;

/// Where turns get their secret words.
pub trait WordSource: Send + Sync {
    fn pick_word(&self, difficulty: Difficulty) -> Result<String, StoreError>;
}

const EASY_WORDS: &str = include_str!("../words/easy.txt");
const MEDIUM_WORDS: &str = include_str!("../words/medium.txt");
const HARD_WORDS: &str = include_str!("../words/hard.txt");

/// The embedded word lists, one per difficulty.
pub struct BuiltinWords {
    easy: Vec<String>,
    medium: Vec<String>,
    hard: Vec<String>,
}

impl BuiltinWords {
    pub fn new() -> Self {
        Self {
            easy: parse_word_list(EASY_WORDS),
            medium: parse_word_list(MEDIUM_WORDS),
            hard: parse_word_list(HARD_WORDS),
        }
    }

    fn list(&self, difficulty: Difficulty) -> &[String] {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }

    pub fn word_count(&self, difficulty: Difficulty) -> usize {
        self.list(difficulty).len()
    }
}

impl Default for BuiltinWords {
    fn default() -> Self {
        Self::new()
    }
}

impl WordSource for BuiltinWords {
    fn pick_word(&self, difficulty: Difficulty) -> Result<String, StoreError> {
        self.list(difficulty)
            .choose(&mut rand::thread_rng())
            .cloned()
            .ok_or(StoreError::NoWords)
    }
}

fn parse_word_list(raw: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.lines()
        .map(|line| line.trim().to_lowercase())
        .filter(|word| !word.is_empty() && !word.starts_with('#'))
        .filter(|word| seen.insert(word.clone()))
        .collect()
}
