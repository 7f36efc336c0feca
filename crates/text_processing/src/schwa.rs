//! Schwa deletion for romanized Devanagari
//!
//! Romanization schemes render the inherent vowel of every consonant, so
//! Hindi words come out with a trailing "a" that is not pronounced
//! ("kamala" for कमल). Dropping a word-final lowercase "a" gets closer to
//! the spoken form. Only applied when romanizing Devanagari.

use once_cell::sync::Lazy;
use regex::Regex;

static WORD_FINAL_A: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"a\b").expect("valid word-final pattern"));

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// Remove word-final "a" and collapse whitespace runs
///
/// # Examples
/// ```
/// use lipi_text_processing::schwa::delete_word_final_schwa;
/// assert_eq!(delete_word_final_schwa("kamala"), "kamal");
/// assert_eq!(delete_word_final_schwa("rAma  sItA"), "rAm sItA");
/// ```
pub fn delete_word_final_schwa(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let stripped = WORD_FINAL_A.replace_all(text, "");
    WHITESPACE_RUN.replace_all(&stripped, " ").trim().to_string()
}
