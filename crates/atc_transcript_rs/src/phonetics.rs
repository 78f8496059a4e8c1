//! Phonetic normalizer
//!
//! Splits a raw utterance into [`Token`]s and maps ICAO spelled digits and letters to
//! their canonical characters. Also spells callsigns back out for speech output.

use std::sync::LazyLock;

use regex::Regex;

/// Spoken digit words, including the ICAO pronunciations.
const DIGIT_WORDS: &[(&str, char)] = &[
    ("ZERO", '0'),
    ("ONE", '1'),
    ("TWO", '2'),
    ("THREE", '3'),
    ("TREE", '3'),
    ("FOUR", '4'),
    ("FIVE", '5'),
    ("FIFE", '5'),
    ("SIX", '6'),
    ("SEVEN", '7'),
    ("EIGHT", '8'),
    ("NINE", '9'),
    ("NINER", '9'),
];

const LETTER_WORDS: &[(&str, char)] = &[
    ("ALPHA", 'A'),
    ("ALFA", 'A'),
    ("BRAVO", 'B'),
    ("CHARLIE", 'C'),
    ("DELTA", 'D'),
    ("ECHO", 'E'),
    ("FOXTROT", 'F'),
    ("GOLF", 'G'),
    ("HOTEL", 'H'),
    ("INDIA", 'I'),
    ("JULIET", 'J'),
    ("JULIETT", 'J'),
    ("KILO", 'K'),
    ("LIMA", 'L'),
    ("MIKE", 'M'),
    ("NOVEMBER", 'N'),
    ("OSCAR", 'O'),
    ("PAPA", 'P'),
    ("QUEBEC", 'Q'),
    ("ROMEO", 'R'),
    ("SIERRA", 'S'),
    ("TANGO", 'T'),
    ("UNIFORM", 'U'),
    ("VICTOR", 'V'),
    ("WHISKEY", 'W'),
    ("WHISKY", 'W'),
    ("XRAY", 'X'),
    ("YANKEE", 'Y'),
    ("ZULU", 'Z'),
];

/// Words used when spelling a callsign for speech output.
const SPOKEN_ALPHABET: [&str; 26] = [
    "Alpha", "Bravo", "Charlie", "Delta", "Echo", "Foxtrot", "Golf", "Hotel", "India",
    "Juliett", "Kilo", "Lima", "Mike", "November", "Oscar", "Papa", "Quebec", "Romeo",
    "Sierra", "Tango", "Uniform", "Victor", "Whiskey", "X-ray", "Yankee", "Zulu",
];

const SPOKEN_DIGITS: [&str; 10] = [
    "Zero", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine",
];

static SHORT_CALLSIGN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z]{2,3})(\d{1,4})$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// One or more digits, spoken or written.
    Digits,
    /// A single letter, spelled (`MIKE`) or written (`M`).
    Letter,
    Word,
}

/// A normalized token. `raw` is the upper-cased spelling as heard, `text` its canonical form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub raw: String,
    pub text: String,
    pub kind: TokenKind,
}

impl Token {
    fn from_piece(piece: &str) -> Self {
        let raw = piece.to_string();
        if piece.chars().all(|c| c.is_ascii_digit()) {
            return Self {
                text: raw.clone(),
                raw,
                kind: TokenKind::Digits,
            };
        }
        if let Some(digit) = digit_for_word(piece) {
            return Self {
                raw,
                text: digit.to_string(),
                kind: TokenKind::Digits,
            };
        }
        if let Some(letter) = letter_for_word(piece) {
            return Self {
                raw,
                text: letter.to_string(),
                kind: TokenKind::Letter,
            };
        }
        let kind = if piece.chars().count() == 1 && piece.chars().all(|c| c.is_ascii_alphabetic()) {
            TokenKind::Letter
        } else {
            TokenKind::Word
        };
        Self {
            text: raw.clone(),
            raw,
            kind,
        }
    }

    pub fn is_digits(&self) -> bool {
        self.kind == TokenKind::Digits
    }

    pub fn is_letter(&self) -> bool {
        self.kind == TokenKind::Letter
    }

    pub fn is_word(&self) -> bool {
        self.kind == TokenKind::Word
    }

    /// Whether the token was heard as `word`, ignoring normalization.
    pub fn is(&self, word: &str) -> bool {
        self.raw == word
    }
}

pub fn digit_for_word(word: &str) -> Option<char> {
    DIGIT_WORDS
        .iter()
        .find(|(spoken, _)| *spoken == word)
        .map(|(_, digit)| *digit)
}

pub fn letter_for_word(word: &str) -> Option<char> {
    LETTER_WORDS
        .iter()
        .find(|(spoken, _)| *spoken == word)
        .map(|(_, letter)| *letter)
}

/// Upper-cases `text` and splits it into tokens. Punctuation separates tokens and is
/// dropped; every other piece of the input survives as exactly one token.
pub fn tokenize(text: &str) -> Vec<Token> {
    let upper = text.to_uppercase().replace("X-RAY", "XRAY");
    upper
        .split(|c: char| !c.is_alphanumeric())
        .filter(|piece| !piece.is_empty())
        .map(Token::from_piece)
        .collect()
}

/// Canonical token texts of `text`, e.g. `"Lufthansa five Mike"` → `["LUFTHANSA", "5", "M"]`.
pub fn normalize(text: &str) -> Vec<String> {
    tokenize(text).into_iter().map(|token| token.text).collect()
}

/// Concatenated digits of the digit tokens starting at `start`, and how many tokens they span.
pub fn digit_run(tokens: &[Token], start: usize) -> (String, usize) {
    let mut digits = String::new();
    let mut consumed = 0;
    for token in tokens.iter().skip(start) {
        if !token.is_digits() {
            break;
        }
        digits.push_str(&token.text);
        consumed += 1;
    }
    (digits, consumed)
}

/// Spells a callsign with the ICAO alphabet: `CSA025` → `Charlie Sierra Alpha Zero Two Five`.
pub fn spell_callsign(callsign: &str) -> String {
    callsign
        .chars()
        .map(|c| {
            let c = c.to_ascii_uppercase();
            match c {
                'A'..='Z' => SPOKEN_ALPHABET[(c as u8 - b'A') as usize].to_string(),
                '0'..='9' => SPOKEN_DIGITS[(c as u8 - b'0') as usize].to_string(),
                other => other.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Replaces every occurrence of `callsign` inside `text` with its spelled form.
pub fn expand_callsign_inline(text: &str, callsign: Option<&str>) -> String {
    match callsign {
        Some(callsign) if !callsign.is_empty() && !text.is_empty() => {
            text.replace(callsign, &spell_callsign(callsign))
        }
        _ => text.to_string(),
    }
}

/// Replaces a callsign at the start of a transcript (`CSA ZERO TWO FIVE`, `CSA 025` or
/// `CSA025`) with its spelled form. Only short ICAO style callsigns are rewritten; any
/// other transcript comes back unchanged.
pub fn replace_callsign_at_start(transcript: &str, callsign: Option<&str>) -> String {
    let Some(callsign) = callsign else {
        return transcript.to_string();
    };
    let words: Vec<&str> = transcript.split_whitespace().collect();
    let Some(first) = words.first() else {
        return transcript.to_string();
    };
    let callsign = callsign.to_uppercase();
    let Some(captures) = SHORT_CALLSIGN.captures(&callsign) else {
        return transcript.to_string();
    };
    let prefix = &captures[1];
    let first = first.to_uppercase();
    if !first.starts_with(prefix) {
        return transcript.to_string();
    }

    let consumed = if first == callsign {
        0
    } else {
        words[1..]
            .iter()
            .map(|word| word.to_uppercase())
            .take_while(|word| {
                word.chars().all(|c| c.is_ascii_digit()) || digit_for_word(word).is_some()
            })
            .count()
    };

    std::iter::once(spell_callsign(&callsign))
        .chain(words[1 + consumed..].iter().map(|word| word.to_string()))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_digits_and_letters() {
        assert_eq!(
            normalize("Lufthansa five Mike Echo, niner tree fife"),
            vec!["LUFTHANSA", "5", "M", "E", "9", "3", "5"]
        );
    }

    #[test]
    fn test_tokenize_keeps_raw_spelling() {
        let tokens = tokenize("delta x-ray 12");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].raw, "DELTA");
        assert_eq!(tokens[0].text, "D");
        assert!(tokens[0].is_letter());
        assert_eq!(tokens[1].text, "X");
        assert!(tokens[2].is_digits());
    }

    #[test]
    fn test_punctuation_separates() {
        assert_eq!(normalize("CSA634,turn right."), vec!["CSA634", "TURN", "RIGHT"]);
        assert!(normalize("").is_empty());
        assert!(normalize(" ,.; ").is_empty());
    }

    #[test]
    fn test_unknown_words_pass_through() {
        let tokens = tokenize("praha radar m");
        assert!(tokens[0].is_word());
        assert!(tokens[1].is_word());
        assert!(tokens[2].is_letter());
    }

    #[test]
    fn test_digit_run() {
        let tokens = tokenize("six three four turn");
        assert_eq!(digit_run(&tokens, 0), ("634".to_string(), 3));
        assert_eq!(digit_run(&tokens, 3), (String::new(), 0));
        assert_eq!(digit_run(&tokens, 10), (String::new(), 0));
    }

    #[test]
    fn test_spell_callsign() {
        assert_eq!(
            spell_callsign("CSA025"),
            "Charlie Sierra Alpha Zero Two Five"
        );
        assert_eq!(spell_callsign("x9"), "X-ray Nine");
    }

    #[test]
    fn test_expand_callsign_inline() {
        assert_eq!(
            expand_callsign_inline("CSA025, wilco.", Some("CSA025")),
            "Charlie Sierra Alpha Zero Two Five, wilco."
        );
        assert_eq!(expand_callsign_inline("Roger.", None), "Roger.");
    }

    #[test]
    fn test_replace_callsign_at_start() {
        let spelled = "Charlie Sierra Alpha Zero Two Five descending";
        assert_eq!(
            replace_callsign_at_start("CSA ZERO TWO FIVE descending", Some("CSA025")),
            spelled
        );
        assert_eq!(
            replace_callsign_at_start("CSA 025 descending", Some("CSA025")),
            spelled
        );
        assert_eq!(
            replace_callsign_at_start("CSA025 descending", Some("CSA025")),
            spelled
        );
    }

    #[test]
    fn test_replace_callsign_at_start_leaves_others() {
        assert_eq!(
            replace_callsign_at_start("roger CSA025", Some("CSA025")),
            "roger CSA025"
        );
        assert_eq!(
            replace_callsign_at_start("LUFTHANSA 5", Some("LUFTHANSA5")),
            "LUFTHANSA 5"
        );
        assert_eq!(replace_callsign_at_start("", Some("CSA025")), "");
    }
}
