use std::time::Duration;

/// Characters per word when converting typed characters into words
pub const CHARS_PER_WORD: f64 = 5.0;

/// Live statistics for the snippet being typed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub wpm: u32,
    pub accuracy: u8,
    pub correct_chars: usize,
}

impl Stats {
    /// What a freshly shown snippet displays before any input
    pub fn fresh() -> Self {
        Self {
            wpm: 0,
            accuracy: 100,
            correct_chars: 0,
        }
    }

    pub fn compute(input: &str, snippet: &str, elapsed: Duration) -> Self {
        let correct = correct_chars(input, snippet);
        Self {
            wpm: wpm(input.chars().count(), elapsed_secs(elapsed)),
            accuracy: accuracy(correct, snippet.chars().count()),
            correct_chars: correct,
        }
    }
}

impl Default for Stats {
    fn default() -> Self {
        Self::fresh()
    }
}

/// Positions where input and snippet agree, over their common prefix length.
/// Comparison is exact: case and whitespace both count.
pub fn correct_chars(input: &str, snippet: &str) -> usize {
    input
        .chars()
        .zip(snippet.chars())
        .filter(|(typed, expected)| typed == expected)
        .count()
}

/// Percentage of the whole snippet reproduced correctly, rounded.
/// A correct but unfinished prefix stays below 100.
pub fn accuracy(correct_chars: usize, snippet_len: usize) -> u8 {
    let total = snippet_len.max(1) as f64;
    let pct = ((correct_chars as f64 / total) * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}

/// Elapsed seconds, floored at one second so near-instant input stays finite
pub fn elapsed_secs(elapsed: Duration) -> f64 {
    elapsed.as_secs_f64().max(1.0)
}

pub fn wpm(chars_typed: usize, elapsed_secs: f64) -> u32 {
    let minutes = elapsed_secs / 60.0;
    let raw = ((chars_typed as f64 / CHARS_PER_WORD) / minutes).round();
    if raw.is_finite() && raw >= 0.0 {
        raw as u32
    } else {
        0
    }
}
