//! Inbound text cleanup applied to search terms and company numbers.

use regex::Regex;
use std::sync::OnceLock;

fn tag_regex() -> &'static Regex {
    static TAGS: OnceLock<Regex> = OnceLock::new();
    TAGS.get_or_init(|| Regex::new(r"(?s)<[^>]*>").expect("tag pattern is valid"))
}

fn octet_regex() -> &'static Regex {
    static OCTETS: OnceLock<Regex> = OnceLock::new();
    OCTETS.get_or_init(|| Regex::new(r"%[a-fA-F0-9]{2}").expect("octet pattern is valid"))
}

/// Cleans a single-line text field.
///
/// Strips HTML tags and percent-encoded octets, turns control characters
/// and whitespace runs into a single space, and trims both ends. Applying
/// it twice gives the same result as applying it once.
pub fn sanitize_text_field(input: &str) -> String {
    let without_tags = tag_regex().replace_all(input, "");

    // Removing one octet can expose another ("%%4141"), so repeat until stable
    let mut text = without_tags.into_owned();
    loop {
        let next = octet_regex().replace_all(&text, "");
        if next.len() == text.len() {
            break;
        }
        text = next.into_owned();
    }

    let mut cleaned = String::with_capacity(text.len());
    let mut pending_space = false;
    for c in text.chars() {
        if c.is_whitespace() || c.is_control() {
            pending_space = true;
            continue;
        }
        if pending_space && !cleaned.is_empty() {
            cleaned.push(' ');
        }
        pending_space = false;
        cleaned.push(c);
    }

    cleaned
}
