use scraper::{Html, Selector};
use std::sync::LazyLock;

static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("valid title selector"));

/// Replace every character outside `[A-Za-z0-9_.\- ]` with `_`.
/// One character in, one character out.
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .map(|c| match c {
            'A'..='Z' | 'a'..='z' | '0'..='9' | '_' | '.' | '-' | ' ' => c,
            _ => '_',
        })
        .collect()
}

/// Text of the document `<title>`, trimmed. `None` when missing or blank.
pub fn extract_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let title = document
        .select(&TITLE_SELECTOR)
        .next()?
        .text()
        .collect::<String>();
    let title = title.trim();
    (!title.is_empty()).then(|| title.to_string())
}

/// Decode JSON string escapes (`\/`, `\uXXXX`, ...) in a raw captured value.
/// Falls back to the raw text when it is not a valid JSON string body.
pub fn unescape_json_string(raw: &str) -> String {
    serde_json::from_str::<String>(&format!("\"{}\"", raw)).unwrap_or_else(|_| raw.to_string())
}
