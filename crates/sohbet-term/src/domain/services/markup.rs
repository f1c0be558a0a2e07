//! Renders the backend's small markdown dialect into HTML fragments.
//!
//! Message text is escaped before any tag is produced, so the only markup in
//! the output is the fixed set of tags emitted here: `div`, `h3`, `strong`,
//! `em`, `code`, `del` and `li`.

use once_cell::sync::Lazy;
use regex::Regex;

#[cfg(test)]
#[path = "markup_test.rs"]
mod tests;

const CALLOUT_HEADING_PREFIX: &str = "---###";
const HEADING_FENCE: &str = "###";
const CALLOUT_FENCE: &str = "---";

static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());
static ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.*?)\*").unwrap());
static CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`(.*?)`").unwrap());
static STRIKE: Lazy<Regex> = Lazy::new(|| Regex::new(r"~~(.*?)~~").unwrap());

pub fn render(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let trimmed = text.trim();
    if let Some(rest) = trimmed.strip_prefix(CALLOUT_HEADING_PREFIX) {
        return format!(
            r#"<div class="callout"><h3 class="callout-heading">{}</h3></div>"#,
            escape_html(rest.trim())
        );
    }

    if let Some(inner) = fenced(trimmed, HEADING_FENCE) {
        return format!(r#"<h3 class="heading">{}</h3>"#, escape_html(inner.trim()));
    }

    if let Some(inner) = fenced(trimmed, CALLOUT_FENCE) {
        return format!(r#"<div class="callout">{}</div>"#, escape_html(inner.trim()));
    }

    return render_inline(&escape_html(text));
}

/// Text between a leading and trailing `fence`. A string made only of
/// overlapping fences yields an empty body.
fn fenced<'a>(text: &'a str, fence: &str) -> Option<&'a str> {
    if !text.starts_with(fence) || !text.ends_with(fence) {
        return None;
    }

    if text.len() < fence.len() * 2 {
        return Some("");
    }

    return Some(&text[fence.len()..text.len() - fence.len()]);
}

fn render_inline(text: &str) -> String {
    // Bold has to run before italic so `**` is not read as two empty `*x*`.
    let text = BOLD.replace_all(text, "<strong>${1}</strong>");
    let text = ITALIC.replace_all(&text, "<em>${1}</em>");
    let text = CODE.replace_all(&text, r#"<code class="inline-code">${1}</code>"#);
    let text = STRIKE.replace_all(&text, "<del>${1}</del>");

    return text
        .split('\n')
        .map(|line| match line.strip_prefix("* ") {
            Some(item) => format!("<li>{item}</li>"),
            None => line.to_string(),
        })
        .collect::<Vec<String>>()
        .join("\n");
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }

    return escaped;
}
