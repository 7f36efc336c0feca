//! Sentence chunking for fallback synthesis
//!
//! Text is split after `.`, `?`, `!` or the danda (`।`) when followed by
//! whitespace. Long inputs that produce too many pieces are re-bucketed
//! greedily by character count to bound the number of synthesis calls.
//!
//! ```ignore
//! let pieces = chunk_text("पहला वाक्य। दूसरा वाक्य।", &ChunkingConfig::default());
//! assert_eq!(pieces, vec!["पहला वाक्य।", "दूसरा वाक्य।"]);
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

use lipi_config::constants::tts;
use lipi_config::TtsConfig;

static SENTENCE_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.?!।]\s+").expect("valid sentence boundary pattern"));

/// Chunking limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkingConfig {
    /// Piece count above which pieces are re-bucketed
    pub max_pieces: usize,
    /// Soft character budget per re-bucketed piece
    pub max_chunk_chars: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_pieces: tts::MAX_PIECES,
            max_chunk_chars: tts::MAX_CHUNK_CHARS,
        }
    }
}

impl From<&TtsConfig> for ChunkingConfig {
    fn from(config: &TtsConfig) -> Self {
        Self {
            max_pieces: config.max_pieces,
            max_chunk_chars: config.max_chunk_chars,
        }
    }
}

/// Split `text` into sentence-like pieces
///
/// Terminators stay with the piece they end; blank pieces are dropped.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut last = 0;

    for m in SENTENCE_BOUNDARY.find_iter(text) {
        let terminator_len = m.as_str().chars().next().map(char::len_utf8).unwrap_or(0);
        push_piece(&mut pieces, &text[last..m.start() + terminator_len]);
        last = m.end();
    }
    push_piece(&mut pieces, &text[last..]);

    pieces
}

fn push_piece(pieces: &mut Vec<String>, piece: &str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        pieces.push(piece.to_string());
    }
}

/// Pieces to synthesize, in order
pub fn chunk_text(text: &str, config: &ChunkingConfig) -> Vec<String> {
    let pieces = split_sentences(text);
    if pieces.len() <= config.max_pieces {
        return pieces;
    }
    rebucket(pieces, config.max_chunk_chars)
}

/// Greedy merge: a bucket closes once the next piece would push it past
/// `max_chars`. A single piece longer than `max_chars` gets its own bucket.
fn rebucket(pieces: Vec<String>, max_chars: usize) -> Vec<String> {
    let mut buckets = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0;

    for piece in pieces {
        let piece_chars = piece.chars().count();

        if current.is_empty() {
            current = piece;
            current_chars = piece_chars;
        } else if current_chars + 1 + piece_chars > max_chars {
            buckets.push(std::mem::replace(&mut current, piece));
            current_chars = piece_chars;
        } else {
            current.push(' ');
            current.push_str(&piece);
            current_chars += piece_chars + 1;
        }
    }

    if !current.is_empty() {
        buckets.push(current);
    }

    buckets
}
