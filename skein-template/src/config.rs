use serde::{Deserialize, Serialize};

use crate::delimiters::Delimiters;
use crate::error::ConfigError;

/// Settings shared by every compilation. Built once, validated by
/// [`Compiler::new`](crate::Compiler::new) and never changed afterwards.
///
/// ```json
/// { "prefix": "sk", "delimiters": ["{{", "}}"], "unsafeDelimiters": ["{{{", "}}}"] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct CompilerConfig {
    /// Directive attribute namespace, `sk` for `sk-bind`.
    pub prefix: String,
    /// Escaped interpolation markers.
    pub delimiters: Delimiters,
    /// Raw interpolation markers.
    pub unsafe_delimiters: Delimiters,
    /// Name of the scope object compiled identifiers are read from.
    pub scope: String,
    /// Function called for `expr | filter`.
    pub filter_fn: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            prefix: "sk".to_string(),
            delimiters: Delimiters::new("{{", "}}"),
            unsafe_delimiters: Delimiters::new("{{{", "}}}"),
            scope: "_scope".to_string(),
            filter_fn: "_that.applyFilter".to_string(),
        }
    }
}

impl CompilerConfig {
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_delimiters(mut self, safe: Delimiters, raw: Delimiters) -> Self {
        self.delimiters = safe;
        self.unsafe_delimiters = raw;
        self
    }

    /// Reads a JSON document; missing keys keep their defaults.
    pub fn from_json(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.prefix.is_empty() {
            return Err(ConfigError::EmptyPrefix);
        }
        if self
            .prefix
            .chars()
            .any(|c| c.is_whitespace() || c == '=')
        {
            return Err(ConfigError::InvalidPrefix(self.prefix.clone()));
        }
        self.delimiters.check("safe")?;
        self.unsafe_delimiters.check("unsafe")?;
        if self.delimiters == self.unsafe_delimiters {
            return Err(ConfigError::IndistinctDelimiters {
                open: self.delimiters.open().to_string(),
                close: self.delimiters.close().to_string(),
            });
        }
        if self.scope.trim().is_empty() {
            return Err(ConfigError::EmptyScope);
        }
        if self.filter_fn.trim().is_empty() {
            return Err(ConfigError::EmptyFilterFn);
        }
        Ok(())
    }
}
