//! Chunker — splits extracted resume text into overlapping fixed-size windows.
//!
//! Windows advance by `size - overlap` units and stop as soon as one reaches the
//! end of the text, so neighbours share exactly `overlap` units and every unit of
//! the input is covered by at least one chunk.

use std::str::FromStr;

use thiserror::Error;

/// The unit a chunk's size and overlap are measured in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChunkUnit {
    /// Unicode scalar values. Original whitespace is preserved inside chunks.
    #[default]
    Char,
    /// Whitespace-separated tokens. A chunk is the source slice from its first
    /// word to its last, so whitespace inside a chunk is kept as written.
    /// Whitespace between two non-overlapping windows belongs to neither.
    Word,
}

impl FromStr for ChunkUnit {
    type Err = ChunkConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "char" | "chars" | "character" | "characters" => Ok(ChunkUnit::Char),
            "word" | "words" => Ok(ChunkUnit::Word),
            other => Err(ChunkConfigError::UnknownUnit(other.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ChunkConfigError {
    #[error("chunk size must be greater than zero")]
    ZeroSize,

    #[error("chunk overlap ({overlap}) must be smaller than chunk size ({size})")]
    OverlapTooLarge { size: usize, overlap: usize },

    #[error("unknown chunk unit '{0}'")]
    UnknownUnit(String),
}

/// Validated chunking parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkConfig {
    size: usize,
    overlap: usize,
    unit: ChunkUnit,
}

impl ChunkConfig {
    pub fn new(size: usize, overlap: usize, unit: ChunkUnit) -> Result<Self, ChunkConfigError> {
        if size == 0 {
            return Err(ChunkConfigError::ZeroSize);
        }
        if overlap >= size {
            return Err(ChunkConfigError::OverlapTooLarge { size, overlap });
        }
        Ok(Self {
            size,
            overlap,
            unit,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    pub fn unit(&self) -> ChunkUnit {
        self.unit
    }

    /// Distance between the starts of two consecutive windows. Always >= 1.
    pub fn step(&self) -> usize {
        self.size - self.overlap
    }

    /// Number of chunks a text of `len` units splits into.
    pub fn expected_chunks(&self, len: usize) -> usize {
        if len == 0 {
            0
        } else if len <= self.size {
            1
        } else {
            1 + (len - self.size).div_ceil(self.step())
        }
    }
}

impl Default for ChunkConfig {
    /// 800 / 150 characters.
    fn default() -> Self {
        Self {
            size: 800,
            overlap: 150,
            unit: ChunkUnit::Char,
        }
    }
}

/// Splits `text` into overlapping chunks in document order.
///
/// Empty or whitespace-only text yields no chunks; the caller decides whether
/// that is an error.
pub fn split_text(text: &str, config: &ChunkConfig) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    match config.unit {
        ChunkUnit::Char => {
            let chars: Vec<char> = text.chars().collect();
            window_ranges(chars.len(), config)
                .map(|(start, end)| chars[start..end].iter().collect())
                .collect()
        }
        ChunkUnit::Word => {
            let spans = word_spans(text);
            window_ranges(spans.len(), config)
                .map(|(start, end)| text[spans[start].0..spans[end - 1].1].to_string())
                .collect()
        }
    }
}

/// Byte ranges of the whitespace-separated words in `text`.
fn word_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = None;
    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            if let Some(s) = start.take() {
                spans.push((s, i));
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        spans.push((s, text.len()));
    }
    spans
}

/// Yields `[start, end)` unit ranges for a sequence of `len` units.
fn window_ranges(len: usize, config: &ChunkConfig) -> impl Iterator<Item = (usize, usize)> + '_ {
    let step = config.step();
    let count = config.expected_chunks(len);
    (0..count).map(move |i| {
        let start = i * step;
        (start, (start + config.size).min(len))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(size: usize, overlap: usize) -> ChunkConfig {
        ChunkConfig::new(size, overlap, ChunkUnit::Char).unwrap()
    }

    /// Rebuilds the source by dropping each chunk's leading overlap.
    fn reconstruct_chars(chunks: &[String], overlap: usize) -> String {
        let mut out = String::new();
        for (i, chunk) in chunks.iter().enumerate() {
            if i == 0 {
                out.push_str(chunk);
            } else {
                out.extend(chunk.chars().skip(overlap));
            }
        }
        out
    }

    #[test]
    fn test_word_chunks_without_overlap() {
        let cfg = ChunkConfig::new(2, 0, ChunkUnit::Word).unwrap();
        let chunks = split_text("A B C D E F", &cfg);
        assert_eq!(chunks, vec!["A B", "C D", "E F"]);
    }

    #[test]
    fn test_word_chunks_with_overlap() {
        let cfg = ChunkConfig::new(3, 1, ChunkUnit::Word).unwrap();
        let chunks = split_text("a b c d e f g", &cfg);
        assert_eq!(chunks, vec!["a b c", "c d e", "e f g"]);
    }

    #[test]
    fn test_word_chunks_keep_source_whitespace() {
        let cfg = ChunkConfig::new(2, 0, ChunkUnit::Word).unwrap();
        let text = "Skills:\n  Rust\tGo\n\nPython";
        let chunks = split_text(text, &cfg);
        assert_eq!(chunks, vec!["Skills:\n  Rust", "Go\n\nPython"]);

        assert!(chunks.iter().all(|c| text.contains(c.as_str())));
    }

    #[test]
    fn test_word_chunks_with_overlap_are_source_slices() {
        let cfg = ChunkConfig::new(3, 1, ChunkUnit::Word).unwrap();
        let chunks = split_text("  led\tteam of  five \n", &cfg);
        assert_eq!(chunks, vec!["led\tteam of", "of  five"]);
    }

    #[test]
    fn test_char_chunks_share_exact_overlap() {
        let cfg = chars(10, 3);
        let text = "Senior Rust engineer with distributed systems background";
        let chunks = split_text(text, &cfg);

        for pair in chunks.windows(2) {
            let prev: Vec<char> = pair[0].chars().collect();
            let next: Vec<char> = pair[1].chars().collect();
            assert_eq!(prev.len(), 10, "only the last chunk may be short");
            assert_eq!(&prev[prev.len() - 3..], &next[..3]);
        }
    }

    #[test]
    fn test_char_chunks_reconstruct_source() {
        let text = "Led a team of 5 engineers.\nShipped a payments API handling 2M req/day.";
        for (size, overlap) in [(1, 0), (7, 2), (16, 15), (50, 10), (500, 100)] {
            let chunks = split_text(text, &chars(size, overlap));
            assert_eq!(
                reconstruct_chars(&chunks, overlap),
                text,
                "size={size} overlap={overlap}"
            );
        }
    }

    #[test]
    fn test_multibyte_text_is_split_on_char_boundaries() {
        let text = "Zürich — Ünïcödé résumé ✓";
        let chunks = split_text(text, &chars(4, 1));
        assert_eq!(reconstruct_chars(&chunks, 1), text);
    }

    #[test]
    fn test_chunk_count_matches_formula() {
        let text: String = "x".repeat(1000);
        let cfg = chars(800, 150);
        let chunks = split_text(&text, &cfg);
        // 1 + ceil((1000 - 800) / 650) = 2
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks.len(), cfg.expected_chunks(1000));

        let long: String = "y".repeat(10_000);
        let cfg = chars(100, 20);
        assert_eq!(split_text(&long, &cfg).len(), 1 + (10_000 - 100_usize).div_ceil(80));
    }

    #[test]
    fn test_short_text_is_single_chunk() {
        let chunks = split_text("Rust", &ChunkConfig::default());
        assert_eq!(chunks, vec!["Rust"]);
    }

    #[test]
    fn test_empty_text_yields_no_chunks() {
        assert!(split_text("", &ChunkConfig::default()).is_empty());
        assert!(split_text(" \n\t ", &ChunkConfig::default()).is_empty());
    }

    #[test]
    fn test_split_is_deterministic() {
        let text = "one two three four five six seven eight nine ten";
        let cfg = chars(12, 4);
        assert_eq!(split_text(text, &cfg), split_text(text, &cfg));
    }

    #[test]
    fn test_config_rejects_zero_size() {
        assert_eq!(
            ChunkConfig::new(0, 0, ChunkUnit::Char),
            Err(ChunkConfigError::ZeroSize)
        );
    }

    #[test]
    fn test_config_rejects_overlap_not_smaller_than_size() {
        assert_eq!(
            ChunkConfig::new(10, 10, ChunkUnit::Word),
            Err(ChunkConfigError::OverlapTooLarge {
                size: 10,
                overlap: 10
            })
        );
    }

    #[test]
    fn test_chunk_unit_parses_case_insensitively() {
        assert_eq!("WORD".parse::<ChunkUnit>().unwrap(), ChunkUnit::Word);
        assert_eq!("chars".parse::<ChunkUnit>().unwrap(), ChunkUnit::Char);
        assert!("token".parse::<ChunkUnit>().is_err());
    }
}
