use serde::Serialize;
use tracing::trace;

use crate::delimiters::Patterns;

/// One piece of scanned text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Token {
    /// Copied verbatim.
    Text { value: String },
    /// An interpolation span. `raw` keeps the span with its delimiters.
    Binding {
        value: String,
        html: bool,
        #[serde(rename = "oneTime")]
        one_time: bool,
        raw: String,
    },
}

impl Token {
    pub fn text(value: impl Into<String>) -> Self {
        Token::Text {
            value: value.into(),
        }
    }

    pub fn is_binding(&self) -> bool {
        matches!(self, Token::Binding { .. })
    }

    /// The exact source text this token was cut from.
    pub fn source(&self) -> &str {
        match self {
            Token::Text { value } => value,
            Token::Binding { raw, .. } => raw,
        }
    }
}

/// Splits `text` into literal and binding tokens, left to right.
///
/// Newlines are dropped first. Text without any interpolation comes back as a
/// single literal token.
pub fn scan_text(patterns: &Patterns, text: &str) -> Vec<Token> {
    let text = text.replace('\n', "");

    if !patterns.has_interpolation(&text) {
        return vec![Token::Text { value: text }];
    }

    let mut tokens = Vec::new();
    let mut last = 0usize;

    for caps in patterns.tag().captures_iter(&text) {
        let Some(span) = caps.get(0) else { continue };

        if span.start() > last {
            tokens.push(Token::text(&text[last..span.start()]));
        }

        let html = caps.get(1).is_some() && patterns.is_unsafe_span(span.as_str());
        let inner = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
        let (value, one_time) = match inner.strip_prefix('*') {
            Some(rest) => (rest, true),
            None => (inner, false),
        };

        tokens.push(Token::Binding {
            value: value.trim().to_string(),
            html,
            one_time,
            raw: span.as_str().to_string(),
        });
        last = span.end();
    }

    if last < text.len() {
        tokens.push(Token::text(&text[last..]));
    }

    trace!(tokens = tokens.len(), "scanned text");
    tokens
}
