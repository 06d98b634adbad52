//! Parse diagnostics: the error type produced by the parser plus the
//! rendering and suggestion helpers the shell builds its messages from.

use thiserror::Error;

/// How close a known keyword must be before we suggest it.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// A rejected input line. `position` is the byte offset of the first
/// offending character, `message` says what was expected or found.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("syntax error at position {position}: {message}")]
pub struct SyntaxError {
    pub position: usize,
    pub message: String,
}

impl SyntaxError {
    pub fn new(position: usize, message: impl Into<String>) -> SyntaxError {
        SyntaxError {
            position,
            message: message.into(),
        }
    }

    /// Two-line rendition of the offending input: the line itself and a
    /// caret under the position the parser gave up at.
    pub fn caret(&self, line: &str) -> String {
        // Position is in bytes; align the caret on character columns.
        let col = line
            .get(..self.position.min(line.len()))
            .map_or(self.position, |prefix| prefix.chars().count());
        format!("  {line}\n  {:>width$}", '^', width = col + 1)
    }
}

/// Closest known keyword to a mistyped one, if any is close enough.
pub fn did_you_mean<'a, I>(word: &str, candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let typed = word.to_ascii_lowercase();
    let mut best: Option<(f64, &'a str)> = None;
    for candidate in candidates {
        let score = strsim::jaro_winkler(&typed, candidate);
        if score >= SUGGESTION_THRESHOLD && best.map_or(true, |(top, _)| score > top) {
            best = Some((score, candidate));
        }
    }
    best.map(|(_, candidate)| candidate)
}

/// Appends a `(did you mean 'x'?)` tail when a suggestion exists.
pub fn with_suggestion<'a, I>(message: String, word: &str, candidates: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    match did_you_mean(word, candidates) {
        Some(hit) => format!("{message} (did you mean '{hit}'?)"),
        None => message,
    }
}
