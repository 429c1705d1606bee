use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// An `[open, close]` marker pair bounding an interpolation span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delimiters(pub String, pub String);

impl Delimiters {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self(open.into(), close.into())
    }

    pub fn open(&self) -> &str {
        &self.0
    }

    pub fn close(&self) -> &str {
        &self.1
    }

    pub(crate) fn check(&self, pair: &'static str) -> Result<(), ConfigError> {
        if self.0.is_empty() {
            return Err(ConfigError::EmptyDelimiter { pair, side: "open" });
        }
        if self.1.is_empty() {
            return Err(ConfigError::EmptyDelimiter { pair, side: "close" });
        }
        Ok(())
    }
}

/// The three patterns every scan relies on.
///
/// `Regex` keeps no scan position between calls, so one `Patterns` value can be
/// shared by any number of threads.
#[derive(Debug, Clone)]
pub struct Patterns {
    tag: Regex,
    unsafe_whole: Regex,
    any: Regex,
}

impl Patterns {
    /// Builds the patterns from a safe and an unsafe pair. Delimiter text is
    /// escaped so `{`, `|` or `$` in a marker match literally.
    pub fn build(safe: &Delimiters, raw: &Delimiters) -> Result<Self, ConfigError> {
        let open = regex::escape(safe.open());
        let close = regex::escape(safe.close());
        let unsafe_open = regex::escape(raw.open());
        let unsafe_close = regex::escape(raw.close());

        // unsafe alternative first: `{{{a}}}` must not be read as `{{` + `{a` + `}}`
        let tag = Regex::new(&format!(
            "{unsafe_open}(.+?){unsafe_close}|{open}(.+?){close}"
        ))?;
        let unsafe_whole = Regex::new(&format!("^{unsafe_open}.*{unsafe_close}$"))?;
        let any = Regex::new(&format!(
            "(?:{unsafe_open}.+?{unsafe_close}|{open}.+?{close})"
        ))?;

        Ok(Self {
            tag,
            unsafe_whole,
            any,
        })
    }

    /// Combined pattern: group 1 is the inner text of an unsafe span, group 2
    /// the inner text of a safe one.
    pub fn tag(&self) -> &Regex {
        &self.tag
    }

    /// True when the whole (trimmed) span is one unsafe interpolation.
    pub fn is_unsafe_span(&self, span: &str) -> bool {
        self.unsafe_whole.is_match(span.trim())
    }

    pub fn has_interpolation(&self, text: &str) -> bool {
        self.any.is_match(text)
    }
}
