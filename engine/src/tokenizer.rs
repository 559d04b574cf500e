use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{HashMap, HashSet};

lazy_static! {
    static ref TERM_RE: Regex = Regex::new(r"[A-Za-z0-9]+").expect("valid regex");
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &["and", "the", "is", "in", "of", "a", "to", "it"];
        words.iter().copied().collect()
    };
}

fn is_stopword(token: &str) -> bool { STOPWORDS.contains(token) }

/// Extract per-term frequencies from file content: alphanumeric runs,
/// lowercased, keeping only tokens longer than 2 characters that are not
/// stopwords.
pub fn term_frequencies(text: &str) -> HashMap<String, u64> {
    let mut counts: HashMap<String, u64> = HashMap::new();
    for mat in TERM_RE.find_iter(text) {
        let token = mat.as_str().to_lowercase();
        if token.len() <= 2 || is_stopword(&token) { continue; }
        *counts.entry(token).or_insert(0) += 1;
    }
    counts
}
