//! Rendering of the configured API key for display.

use crate::config::Credential;

/// Secrets shorter than this are masked completely.
pub const MIN_PARTIAL_MASK_LEN: usize = 12;

const MASK: &str = "****";

/// Masks a secret as its first 8 and last 4 characters around `****`.
///
/// Returns `None` for an empty secret. Secrets shorter than
/// [`MIN_PARTIAL_MASK_LEN`] characters would have the two visible parts
/// overlap, so they render as `****` alone.
pub fn mask_secret(secret: &str) -> Option<String> {
    if secret.is_empty() {
        return None;
    }

    let chars: Vec<char> = secret.chars().collect();
    if chars.len() < MIN_PARTIAL_MASK_LEN {
        return Some(MASK.to_string());
    }

    let head: String = chars[..8].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    Some(format!("{}{}{}", head, MASK, tail))
}

/// Markup for the setting display directive.
///
/// `label` is optional; an empty label is treated as absent.
pub fn render_setting_display(credential: &Credential, label: Option<&str>) -> String {
    let Some(masked) = mask_secret(credential.expose()) else {
        return "<p>No API key configured.</p>".to_string();
    };

    let mut output = String::from("<div class=\"chl-setting-display\">");
    if let Some(label) = label.filter(|l| !l.is_empty()) {
        output.push_str("<span class=\"chl-label\">");
        output.push_str(&escape_html(label));
        output.push_str("</span> ");
    }
    output.push_str("<span class=\"chl-value\">");
    output.push_str(&escape_html(&masked));
    output.push_str("</span></div>");
    output
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
