use thiserror::Error;

/// Raised while validating a [`CompilerConfig`](crate::CompilerConfig).
/// A compiler is never built from a configuration that fails here.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("directive prefix must not be empty")]
    EmptyPrefix,
    #[error("directive prefix `{0}` must not contain whitespace or `=`")]
    InvalidPrefix(String),
    #[error("{pair} delimiters have an empty {side} marker")]
    EmptyDelimiter {
        pair: &'static str,
        side: &'static str,
    },
    #[error("safe and unsafe delimiters must differ, both are `{open}` ... `{close}`")]
    IndistinctDelimiters { open: String, close: String },
    #[error("scope name must not be empty")]
    EmptyScope,
    #[error("filter function must not be empty")]
    EmptyFilterFn,
    #[error("invalid config document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to build matching pattern: {0}")]
    Pattern(#[from] regex::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpressionError {
    #[error("expression is empty")]
    Empty,
    #[error("operator `{op}` is not allowed in `{expression}`")]
    Unsupported { op: String, expression: String },
    #[error("invalid expression `{expression}`:\n{message}")]
    Syntax { expression: String, message: String },
    #[error("invalid number literal `{0}`")]
    Number(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectiveError {
    #[error("attribute `{name}` is not a `{prefix}-` directive")]
    NamingMismatch { name: String, prefix: String },
    #[error("directive `{name}` must not contain interpolation, found `{value}`")]
    MixedDirective { name: String, value: String },
    #[error("attribute `{name}`: {source}")]
    Expression {
        name: String,
        #[source]
        source: ExpressionError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("template syntax error at byte {offset}: {message}")]
    Syntax { offset: usize, message: String },
    #[error("<{tag}> {source}")]
    Attribute {
        tag: String,
        #[source]
        source: DirectiveError,
    },
    #[error("text `{text}`: {source}")]
    Text {
        text: String,
        #[source]
        source: ExpressionError,
    },
}
