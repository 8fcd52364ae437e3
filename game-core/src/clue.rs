use game_types::ClueRejection;
use regex::RegexBuilder;

fn letters_only(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .collect()
}

fn strip_separators(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '_' | '.' | ',' | '!' | '?' | ';' | ':'))
        .collect()
}

/// Reject a clue that leaks the secret word.
///
/// Three checks: the word embedded in the clue's letter stream, the word
/// surviving separator stripping, and the word's letters appearing in
/// order with arbitrary non-letter runs between them. Advisory only: a
/// clue passing all three can still be unhelpful.
pub fn validate_clue(clue: &str, word: &str) -> Result<(), ClueRejection> {
    let clue_letters = letters_only(clue);
    let word_letters = letters_only(word);

    if !word_letters.is_empty() && clue_letters.contains(&word_letters) {
        return Err(ClueRejection::ContainsWord);
    }

    let stripped_word = strip_separators(word);
    if !stripped_word.is_empty() && strip_separators(clue).contains(&stripped_word) {
        return Err(ClueRejection::ContainsWord);
    }

    if !word_letters.is_empty() {
        let pattern = word_letters
            .chars()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join("[^a-z]*");
        // Word letters are guaranteed [a-z], so the pattern needs no
        // escaping and cannot fail to compile.
        if let Ok(re) = RegexBuilder::new(&pattern).case_insensitive(true).build() {
            if re.is_match(clue) {
                return Err(ClueRejection::SpellsOut);
            }
        }
    }

    Ok(())
}
