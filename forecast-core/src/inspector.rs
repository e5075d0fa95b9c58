//! Raw JSON viewer for the last successful forecast.

use std::time::{Duration, Instant};

use crate::model::ForecastRecord;

/// How long the copy button reads "Copied!" before reverting.
pub const COPY_REVERT: Duration = Duration::from_secs(2);

pub fn pretty_json(record: &ForecastRecord) -> serde_json::Result<String> {
    serde_json::to_string_pretty(record)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenClass {
    /// An object key including its trailing colon.
    Key,
    String,
    Number,
    Boolean,
    Null,
    Brace,
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub class: TokenClass,
    pub text: &'a str,
}

/// Split JSON text into classified spans. Concatenating the spans gives
/// back the input unchanged.
pub fn highlight(json: &str) -> Vec<Token<'_>> {
    let bytes = json.as_bytes();
    let mut tokens = Vec::new();
    let mut plain_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        let Some((class, end)) = scan_at(bytes, i) else {
            i += 1;
            continue;
        };

        if plain_start < i {
            tokens.push(Token {
                class: TokenClass::Plain,
                text: &json[plain_start..i],
            });
        }
        tokens.push(Token {
            class,
            text: &json[i..end],
        });
        i = end;
        plain_start = end;
    }

    if plain_start < bytes.len() {
        tokens.push(Token {
            class: TokenClass::Plain,
            text: &json[plain_start..],
        });
    }
    tokens
}

/// Recognise a token starting at `i`, returning its class and end offset.
fn scan_at(bytes: &[u8], i: usize) -> Option<(TokenClass, usize)> {
    match bytes[i] {
        b'"' => {
            let end = scan_string(bytes, i);
            let mut after = end;
            while after < bytes.len() && bytes[after].is_ascii_whitespace() {
                after += 1;
            }
            if after < bytes.len() && bytes[after] == b':' {
                Some((TokenClass::Key, after + 1))
            } else {
                Some((TokenClass::String, end))
            }
        }
        b'{' | b'}' | b'[' | b']' => Some((TokenClass::Brace, i + 1)),
        b'-' | b'0'..=b'9' => scan_number(bytes, i).map(|end| (TokenClass::Number, end)),
        b't' | b'f' | b'n' => {
            let keyword = [("true", TokenClass::Boolean), ("false", TokenClass::Boolean), ("null", TokenClass::Null)];
            keyword.into_iter().find_map(|(word, class)| {
                let end = i + word.len();
                let fits = bytes.get(i..end) == Some(word.as_bytes());
                let bounded = (i == 0 || !is_word(bytes[i - 1]))
                    && bytes.get(end).is_none_or(|b| !is_word(*b));
                (fits && bounded).then_some((class, end))
            })
        }
        _ => None,
    }
}

fn is_word(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// End offset just past the closing quote (or end of input if unterminated).
fn scan_string(bytes: &[u8], start: usize) -> usize {
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

fn scan_number(bytes: &[u8], start: usize) -> Option<usize> {
    let digits = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut i = start;
    if bytes[i] == b'-' {
        i += 1;
    }
    let int_end = digits(i);
    if int_end == i {
        return None;
    }
    i = int_end;

    if bytes.get(i) == Some(&b'.') {
        i = digits(i + 1);
    }
    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_end = digits(j);
        if exp_end > j {
            i = exp_end;
        }
    }
    Some(i)
}

/// The inspector's copy affordance.
#[derive(Debug, Clone, Default)]
pub struct CopyButton {
    copied_at: Option<Instant>,
}

impl CopyButton {
    pub fn label(&self, now: Instant) -> &'static str {
        match self.copied_at {
            Some(at) if now.saturating_duration_since(at) < COPY_REVERT => "Copied!",
            _ => "Copy",
        }
    }

    pub fn copied(&mut self, now: Instant) {
        self.copied_at = Some(now);
    }

    /// Called whenever the inspector is (re)opened.
    pub fn reset(&mut self) {
        self.copied_at = None;
    }
}
