//! Message formatter.
//!
//! Messages are stored as raw text and rendered to an HTML fragment on
//! read. All user input is escaped before any markup is applied.
//!
//! Supported markup:
//! - `>text` at the start of a line: greentext quote
//! - `**text**`: bold
//! - `[spoiler]text[/spoiler]`: spoiler
//! - `>>123`: link to post 123

use once_cell::sync::Lazy;
use regex::Regex;

static REFERENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r">>(\d+)").expect("reference pattern"));

static ESCAPED_REFERENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&gt;&gt;(\d+)").expect("escaped reference pattern"));

static BOLD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("bold pattern"));

static SPOILER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\[spoiler\](.+?)\[/spoiler\]").expect("spoiler pattern")
});

/// Escape `& < > " '` for safe inclusion in HTML.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Whether a raw line is a greentext quote.
///
/// Lines opening with a post reference (`>>` followed by a digit) are not
/// quotes.
fn is_quote(line: &str) -> bool {
    if !line.starts_with('>') {
        return false;
    }
    !line
        .strip_prefix(">>")
        .is_some_and(|rest| rest.starts_with(|c: char| c.is_ascii_digit()))
}

fn embolden(text: &str) -> String {
    BOLD_RE.replace_all(text, "<strong>$1</strong>").into_owned()
}

/// Spoilers first, then bold inside and between them, so a bold span
/// never crosses a spoiler boundary.
fn format_spans(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for caps in SPOILER_RE.captures_iter(text) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        out.push_str(&embolden(&text[last..whole.start()]));
        out.push_str(r#"<span class="spoiler">"#);
        out.push_str(&embolden(inner.as_str()));
        out.push_str("</span>");
        last = whole.end();
    }
    out.push_str(&embolden(&text[last..]));
    out
}

fn format_line(line: &str) -> String {
    let escaped = escape_html(line);
    let linked = ESCAPED_REFERENCE_RE.replace_all(
        &escaped,
        r##"<a href="#p$1" class="ref">&gt;&gt;$1</a>"##,
    );
    let formatted = format_spans(&linked);

    if is_quote(line) {
        format!(r#"<span class="quote">{formatted}</span>"#)
    } else {
        formatted
    }
}

/// Render a raw message to an HTML fragment.
///
/// Lines are joined with `<br>`.
pub fn format_message(message: &str) -> String {
    message
        .lines()
        .map(format_line)
        .collect::<Vec<_>>()
        .join("<br>")
}

/// Post IDs referenced with `>>N`, in order of first appearance.
pub fn parse_references(message: &str) -> Vec<i64> {
    let mut ids = Vec::new();
    for caps in REFERENCE_RE.captures_iter(message) {
        if let Ok(id) = caps[1].parse::<i64>() {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
    }
    ids
}
