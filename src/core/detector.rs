//! Brand-mention detection over free-form generated text.
//!
//! A brand counts as mentioned when it appears verbatim (case-insensitive) or
//! when a token, a window of tokens, or a token compared against the brand with
//! its spaces removed reaches [`FUZZY_THRESHOLD`] on the 0-100 similarity scale.

use crate::domain::model::{DetectionResult, ListItem};
use once_cell::sync::Lazy;
use regex::Regex;

/// Minimum similarity ratio (inclusive) for a fuzzy match.
pub const FUZZY_THRESHOLD: u8 = 85;

static LIST_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([0-9]+\.|-|\*)\s+").expect("list marker pattern"));

static NON_WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w]").expect("non-word pattern"));

static NON_WORD_OR_SPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s]").expect("non-word-or-space pattern"));

/// Lowercases and replaces every non-alphanumeric character with a space,
/// then trims the ends.
fn normalize_for_ratio(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Levenshtein similarity of two strings on a 0-100 scale, rounded to the
/// nearest integer. Symmetric; an empty side (after normalization) scores 0.
pub fn fuzzy_ratio(a: &str, b: &str) -> u8 {
    let a = normalize_for_ratio(a);
    let b = normalize_for_ratio(b);

    if a.is_empty() || b.is_empty() {
        return 0;
    }

    (strsim::normalized_levenshtein(&a, &b) * 100.0).round() as u8
}

fn is_close(candidate: &str, target: &str) -> bool {
    fuzzy_ratio(candidate, target) >= FUZZY_THRESHOLD
}

/// Whether `brand` is mentioned anywhere in `text`, exactly or approximately.
pub fn is_mentioned(text: &str, brand: &str) -> bool {
    let text = text.to_lowercase();
    let brand = brand.to_lowercase();

    if text.contains(&brand) {
        return true;
    }

    let tokens: Vec<&str> = text.split_whitespace().collect();
    let cleaned: Vec<String> = tokens
        .iter()
        .map(|token| NON_WORD_RE.replace_all(token, "").into_owned())
        .collect();

    if cleaned.iter().any(|token| is_close(token, &brand)) {
        return true;
    }

    let brand_width = brand.split_whitespace().count();
    if brand_width > 1 && tokens.len() >= brand_width {
        let phrase_match = tokens.windows(brand_width).any(|window| {
            let phrase = window.join(" ");
            let phrase = NON_WORD_OR_SPACE_RE.replace_all(&phrase, "");
            is_close(&phrase, &brand)
        });
        if phrase_match {
            return true;
        }
    }

    // "mail chimp" written as "mailchimp"
    let brand_no_spaces: String = brand.split_whitespace().collect();
    cleaned.iter().any(|token| is_close(token, &brand_no_spaces))
}

/// Lines carrying a numeral-dot, hyphen or asterisk marker, ranked in
/// document order. The printed numeral is ignored.
pub fn list_items(text: &str) -> impl Iterator<Item = ListItem<'_>> {
    text.lines()
        .filter(|line| LIST_MARKER_RE.is_match(line))
        .zip(1u32..)
        .map(|(line, rank)| ListItem { rank, line })
}

/// Detects a mention of `brand` in `text` and estimates its list rank.
///
/// The rank is that of the first list item that itself mentions the brand.
/// A mention outside any detected list item is reported at position 1.
pub fn detect_mention(text: &str, brand: &str) -> DetectionResult {
    if !is_mentioned(text, brand) {
        tracing::debug!(brand, "brand not mentioned");
        return DetectionResult::not_found();
    }

    match list_items(text).find(|item| is_mentioned(item.line, brand)) {
        Some(item) => {
            tracing::debug!(brand, position = item.rank, "brand found in list item");
            DetectionResult::found_at(item.rank)
        }
        None => {
            tracing::debug!(brand, "brand mentioned outside any list, defaulting to position 1");
            DetectionResult::found_at(1)
        }
    }
}
