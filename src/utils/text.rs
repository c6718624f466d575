//! Text normalization and deduplication helpers shared by the searchers.

use std::collections::HashSet;
use std::hash::Hash;
use std::sync::LazyLock;

use regex::Regex;

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s]").unwrap());

/// Normalize text for robust matching.
///
/// Lowercases, collapses whitespace runs (newlines and tabs included) into a
/// single space, strips everything that is not a word character or
/// whitespace, then trims.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let collapsed = WHITESPACE_RUN.replace_all(&lowered, " ");
    let stripped = NON_WORD.replace_all(&collapsed, "");
    // Stripping can leave double spaces behind ("a - b" -> "a  b").
    WHITESPACE_RUN.replace_all(stripped.trim(), " ").into_owned()
}

/// Remove repeated items, keeping the first occurrence of each.
pub fn dedupe<T>(items: impl IntoIterator<Item = T>) -> Vec<T>
where
    T: Eq + Hash + Clone,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// Line-level cleanup for merged extraction output.
///
/// Each line is trimmed, blank lines are dropped and exact duplicate lines
/// are removed keeping the first.
pub fn clean_lines(text: &str) -> String {
    dedupe(text.lines().map(str::trim).filter(|line| !line.is_empty())).join("\n")
}

/// Truncate to at most `max_chars` characters without splitting a char.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_basic() {
        assert_eq!(normalize("Dog  Collar!!"), "dog collar");
        assert_eq!(normalize("  Red\tJacket\n(Men's) "), "red jacket mens");
    }

    #[test]
    fn test_normalize_punctuation_between_words() {
        assert_eq!(normalize("Size - XL"), "size xl");
        assert_eq!(normalize("!!!"), "");
    }

    #[test]
    fn test_normalize_idempotent() {
        for sample in [
            "Dog  Collar!!",
            "  A - B -- C ",
            "Ünïcode Wörds, with ümlauts.",
            "tab\tseparated\nlines",
            "",
        ] {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", sample);
        }
    }

    #[test]
    fn test_normalize_keeps_unicode_word_chars() {
        assert_eq!(normalize("Vikt: 1,2 KG"), "vikt 12 kg");
        assert_eq!(normalize("Färg: Blå"), "färg blå");
    }

    #[test]
    fn test_dedupe_preserves_first_seen_order() {
        assert_eq!(
            dedupe(vec!["a", "b", "a", "c", "b"]),
            vec!["a", "b", "c"]
        );
        assert!(dedupe(Vec::<String>::new()).is_empty());
    }

    #[test]
    fn test_clean_lines() {
        let merged = "pdftotext:\n  Model X200 \n\nWeight 2kg\ntesseract:\nModel X200\n\n";
        assert_eq!(
            clean_lines(merged),
            "pdftotext:\nModel X200\nWeight 2kg\ntesseract:"
        );
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("åäö", 2), "åä");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }
}
