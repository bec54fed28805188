use std::sync::LazyLock;

use regex::Regex;

/// Role marker at the very start of a completion, plus the whitespace after it.
static LEADING_ROLE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:User|Bot|Assistant):\s*").expect("valid regex"));

/// Role marker anywhere in the text, with any surrounding whitespace.
static EMBEDDED_ROLE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*(?:User|Bot|Assistant):\s*").expect("valid regex"));

/// Turn a raw model completion into a single clean sentence for display.
///
/// The transform runs four steps, each on the output of the previous one:
///
/// 1. strip one leading `User:` / `Bot:` / `Assistant:` marker,
/// 2. replace any remaining role marker (and the whitespace around it) with a
///    single space,
/// 3. collapse a word that is immediately repeated after whitespace,
/// 4. keep only the text before the first `.`, trimmed, terminated with `.`.
///
/// Total over all inputs; an empty or whitespace-only result is returned as
/// the empty string.
pub fn normalize(raw: &str) -> String {
    let without_leading = LEADING_ROLE_MARKER.replace(raw, "");
    let without_markers = EMBEDDED_ROLE_MARKER.replace_all(&without_leading, " ");
    let collapsed = collapse_repeated_words(&without_markers);
    first_sentence(&collapsed)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Word(&'a str),
    Gap(&'a str),
}

impl<'a> Token<'a> {
    fn new(text: &'a str, is_word: bool) -> Self {
        if is_word {
            Token::Word(text)
        } else {
            Token::Gap(text)
        }
    }

    fn as_str(self) -> &'a str {
        match self {
            Token::Word(s) | Token::Gap(s) => s,
        }
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Split text into alternating runs of word characters and everything else.
fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut current: Option<bool> = None;

    for (idx, ch) in text.char_indices() {
        let is_word = is_word_char(ch);
        if let Some(prev) = current {
            if prev != is_word {
                tokens.push(Token::new(&text[start..idx], prev));
                start = idx;
            }
        }
        current = Some(is_word);
    }

    if let Some(prev) = current {
        tokens.push(Token::new(&text[start..], prev));
    }

    tokens
}

/// Collapse `word <whitespace> word` into `word`. Runs of the same word
/// collapse to a single occurrence. Comparison is case-sensitive.
fn collapse_repeated_words(text: &str) -> String {
    let tokens = tokenize(text);
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < tokens.len() {
        let token = tokens[i];
        out.push_str(token.as_str());
        i += 1;

        if let Token::Word(word) = token {
            while let (Some(Token::Gap(gap)), Some(Token::Word(next))) =
                (tokens.get(i).copied(), tokens.get(i + 1).copied())
            {
                if next != word || !gap.chars().all(char::is_whitespace) {
                    break;
                }
                i += 2;
            }
        }
    }

    out
}

fn first_sentence(text: &str) -> String {
    let first = text.split('.').next().unwrap_or("").trim();
    if first.is_empty() {
        return String::new();
    }

    let mut sentence = first.to_string();
    if !sentence.ends_with('.') {
        sentence.push('.');
    }
    sentence
}
